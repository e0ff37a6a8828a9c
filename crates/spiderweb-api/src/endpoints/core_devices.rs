// Core-device endpoints
//
// Devices are fetched per parent core site; as with sites, the parent id
// is not echoed back and must be tagged by the caller.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CoreDeviceDto, IdDto, NewCoreDevice};

impl ApiClient {
    /// List the core devices at one core site.
    ///
    /// `GET /coresite/{id}/coredevices`
    pub async fn list_core_devices(&self, core_site_id: &IdDto) -> Result<Vec<CoreDeviceDto>, Error> {
        let url = self.api_url(&format!("coresite/{core_site_id}/coredevices"));
        debug!(%core_site_id, "listing core devices");
        self.get(url).await
    }

    /// Create a core device at a site.
    ///
    /// `POST /coredevices`
    pub async fn add_core_device(&self, device: &NewCoreDevice) -> Result<(), Error> {
        let url = self.api_url("coredevices");
        debug!(name = %device.name, core_site_id = %device.core_site_id, "creating core device");
        let _: serde_json::Value = self.post(url, device).await?;
        Ok(())
    }

    /// Delete a core device.
    ///
    /// `DELETE /coredevice/{id}`
    pub async fn delete_core_device(&self, device_id: &IdDto) -> Result<(), Error> {
        let url = self.api_url(&format!("coredevice/{device_id}"));
        debug!(%device_id, "deleting core device");
        self.delete(url).await
    }
}
