// Network endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::NetworkDto;

impl ApiClient {
    /// List all networks (the root of the topology fetch chain).
    ///
    /// `GET /networks`
    pub async fn list_networks(&self) -> Result<Vec<NetworkDto>, Error> {
        let url = self.api_url("networks");
        debug!("listing networks");
        self.get(url).await
    }
}
