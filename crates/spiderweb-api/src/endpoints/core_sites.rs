// Core-site endpoints
//
// Core sites are fetched per parent network; the response does not echo
// the network id back, so callers tag it from request context.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CoreSiteDto, IdDto, NewCoreSite};

impl ApiClient {
    /// List the core sites belonging to one network.
    ///
    /// `GET /network/{id}/coresites`
    pub async fn list_core_sites(&self, network_id: &IdDto) -> Result<Vec<CoreSiteDto>, Error> {
        let url = self.api_url(&format!("network/{network_id}/coresites"));
        debug!(%network_id, "listing core sites");
        self.get(url).await
    }

    /// Create a core site under a network.
    ///
    /// `POST /coresites`
    pub async fn add_core_site(&self, site: &NewCoreSite) -> Result<(), Error> {
        let url = self.api_url("coresites");
        debug!(name = %site.name, network_id = %site.network_id, "creating core site");
        let _: serde_json::Value = self.post(url, site).await?;
        Ok(())
    }

    /// Delete a core site.
    ///
    /// `DELETE /coresite/{id}`
    pub async fn delete_core_site(&self, site_id: &IdDto) -> Result<(), Error> {
        let url = self.api_url(&format!("coresite/{site_id}"));
        debug!(%site_id, "deleting core site");
        self.delete(url).await
    }
}
