// ── Typed request structs for Command payloads ──

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use spiderweb_api::models::{NewCoreDevice, NewCoreSite};

use crate::model::EntityId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCoreSiteRequest {
    pub name: String,
    /// Parent network the site belongs to.
    pub network_id: EntityId,
}

impl From<&CreateCoreSiteRequest> for NewCoreSite {
    fn from(req: &CreateCoreSiteRequest) -> Self {
        Self {
            name: req.name.clone(),
            network_id: (&req.network_id).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCoreDeviceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<IpAddr>,
    /// Parent core site the device lives at.
    pub core_site_id: EntityId,
}

impl From<&CreateCoreDeviceRequest> for NewCoreDevice {
    fn from(req: &CreateCoreDeviceRequest) -> Self {
        Self {
            name: req.name.clone(),
            ip: req.ip_address.map(|ip| ip.to_string()),
            core_site_id: (&req.core_site_id).into(),
        }
    }
}
