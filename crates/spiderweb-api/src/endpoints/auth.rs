// Authentication endpoints
//
// Bearer-token auth: `POST /login` exchanges credentials for a token,
// which the client then injects into every request. There is no server-side
// logout -- sessions end when the client discards the token.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse};

impl ApiClient {
    /// Log in with username and password.
    ///
    /// `POST /login` -- on success the returned token is installed on this
    /// client and also handed back so the caller can persist it.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<SecretString, Error> {
        let url = self.api_url("login");
        debug!(username, "logging in");

        let resp: LoginResponse = self
            .post_unauthenticated(
                url,
                &LoginRequest {
                    username,
                    password: password.expose_secret(),
                },
            )
            .await
            .map_err(|e| match e {
                // The login endpoint reports bad credentials as 401, which
                // the generic path would misread as an expired session.
                Error::SessionExpired => Error::Authentication {
                    message: "invalid username or password".into(),
                },
                other => other,
            })?;

        let token = SecretString::from(resp.token);
        self.set_token(token.clone());
        Ok(token)
    }

    /// Forget the session token (client-side logout).
    pub fn logout(&self) {
        debug!("discarding session token");
        self.clear_token();
    }
}
