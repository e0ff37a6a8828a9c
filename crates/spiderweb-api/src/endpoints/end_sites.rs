// End-site endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{EndSiteDto, IdDto};

impl ApiClient {
    /// List all end-sites (basic info). Independent of the topology
    /// waterfall -- end-sites are a flat, controller-scoped listing.
    ///
    /// `GET /endsites`
    pub async fn list_end_sites(&self) -> Result<Vec<EndSiteDto>, Error> {
        let url = self.api_url("endsites");
        debug!("listing end-sites");
        self.get(url).await
    }

    /// Fetch detailed metadata for a single end-site.
    ///
    /// `GET /endsites/{id}`
    pub async fn end_site_by_id(&self, end_site_id: &IdDto) -> Result<EndSiteDto, Error> {
        let url = self.api_url(&format!("endsites/{end_site_id}"));
        debug!(%end_site_id, "fetching end-site");
        self.get(url).await
    }
}
