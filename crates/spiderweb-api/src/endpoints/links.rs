// Link endpoints
//
// Links come from two per-device endpoints: device-to-device trunks and
// device-to-end-site access links. The backend does not distinguish them
// in the payload shape, so callers tag the kind from which endpoint
// produced each record.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{IdDto, LinkDto};

impl ApiClient {
    /// List links between this core device and other core devices.
    ///
    /// `GET /coreDevice/{id}/links`
    pub async fn core_to_core_links(&self, device_id: &IdDto) -> Result<Vec<LinkDto>, Error> {
        let url = self.api_url(&format!("coreDevice/{device_id}/links"));
        debug!(%device_id, "listing core-to-core links");
        self.get(url).await
    }

    /// List links between this core device and its end-sites.
    ///
    /// `GET /device/{id}/end-sites`
    pub async fn core_to_site_links(&self, device_id: &IdDto) -> Result<Vec<LinkDto>, Error> {
        let url = self.api_url(&format!("device/{device_id}/end-sites"));
        debug!(%device_id, "listing core-to-site links");
        self.get(url).await
    }
}
