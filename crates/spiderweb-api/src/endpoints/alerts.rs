// Alert endpoints
//
// Alerts are independent of the topology entities and are re-fetched by a
// periodic poll task for the lifetime of an authenticated session.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::AlertDto;

impl ApiClient {
    /// List all current alerts.
    ///
    /// `GET /alerts`
    pub async fn list_alerts(&self) -> Result<Vec<AlertDto>, Error> {
        let url = self.api_url("alerts");
        debug!("listing alerts");
        self.get(url).await
    }
}
