// ── API → domain conversion ──
//
// Translates `spiderweb-api` wire DTOs into canonical domain types. This is
// also where the client-side foreign-key tagging happens: the backend does
// not echo parent ids in child listings (core sites, devices, links), so
// each conversion takes the parent id from the fetch context that produced
// the record.

use std::str::FromStr;

use tracing::debug;

use spiderweb_api::models::{AlertDto, CoreDeviceDto, CoreSiteDto, EndSiteDto, LinkDto, NetworkDto};

use crate::model::{
    Alert, AlertSeverity, CoreDevice, CoreSite, EndSite, EntityId, Link, LinkKind, LinkStatus,
    Network,
};

pub fn network(dto: NetworkDto) -> Network {
    Network {
        id: dto.id.into(),
        name: dto.name,
    }
}

pub fn core_site(dto: CoreSiteDto, network_id: &EntityId) -> CoreSite {
    CoreSite {
        id: dto.id.into(),
        name: dto.name,
        network_id: network_id.clone(),
    }
}

pub fn core_device(dto: CoreDeviceDto, core_site_id: &EntityId) -> CoreDevice {
    let ip_address = dto.ip.as_deref().and_then(|raw| {
        let parsed = raw.parse().ok();
        if parsed.is_none() {
            debug!(ip = raw, "discarding unparseable device address");
        }
        parsed
    });

    CoreDevice {
        id: dto.id.into(),
        name: dto.name,
        ip_address,
        core_site_id: core_site_id.clone(),
    }
}

pub fn link(dto: LinkDto, kind: LinkKind) -> Link {
    let status = dto
        .status
        .as_deref()
        .and_then(|raw| LinkStatus::from_str(raw).ok())
        // Anything unreported or unrecognized needs operator attention.
        .unwrap_or(LinkStatus::Issue);

    Link {
        id: dto.id.into(),
        source: dto.source.into(),
        target: dto.target.into(),
        status,
        bandwidth: dto.bandwidth,
        kind,
    }
}

pub fn end_site(dto: EndSiteDto) -> EndSite {
    EndSite {
        id: dto.id.into(),
        device_id: dto.device_id.into(),
        site_name_english: dto.site_name_english,
        site_name_hebrew: dto.site_name_hebrew,
        interface_id: dto.interface_id,
    }
}

pub fn alert(dto: AlertDto) -> Alert {
    let severity = AlertSeverity::from_str(&dto.alert_type).unwrap_or_else(|_| {
        debug!(alert_type = %dto.alert_type, "unknown alert type, downgrading to info");
        AlertSeverity::Info
    });

    Alert {
        id: dto.id.into(),
        severity,
        message: dto.message,
        timestamp: dto.timestamp,
        is_favorite: dto.is_favorite,
        source: dto.source,
        network_line: dto.network_line,
        severity_score: dto.severity_score,
        details: dto.details,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use spiderweb_api::models::IdDto;

    #[test]
    fn core_site_is_tagged_with_parent_network() {
        let dto = CoreSiteDto {
            id: IdDto::Num(10),
            name: "North DC".into(),
        };
        let site = core_site(dto, &EntityId::Num(1));
        assert_eq!(site.network_id, EntityId::Num(1));
    }

    #[test]
    fn core_device_drops_junk_addresses() {
        let dto = CoreDeviceDto {
            id: IdDto::Num(100),
            name: "rtr-north-1".into(),
            ip: Some("not-an-ip".into()),
        };
        assert!(core_device(dto, &EntityId::Num(10)).ip_address.is_none());

        let dto = CoreDeviceDto {
            id: IdDto::Num(100),
            name: "rtr-north-1".into(),
            ip: Some("10.0.0.1".into()),
        };
        assert!(core_device(dto, &EntityId::Num(10)).ip_address.is_some());
    }

    #[test]
    fn unknown_link_status_becomes_issue() {
        let dto = LinkDto {
            id: IdDto::Str("l-1".into()),
            source: IdDto::Num(1),
            target: IdDto::Num(2),
            status: Some("flapping".into()),
            bandwidth: None,
        };
        assert_eq!(link(dto, LinkKind::CoreToCore).status, LinkStatus::Issue);
    }
}
