//! Screen implementations. Each screen is a top-level Component.

pub mod alerts;
pub mod dashboard;
pub mod end_sites;
pub mod topology;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create all screens in tab-bar order.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()) as Box<dyn Component>,
        ),
        (
            ScreenId::Topology,
            Box::new(topology::TopologyScreen::new()),
        ),
        (
            ScreenId::EndSites,
            Box::new(end_sites::EndSitesScreen::new()),
        ),
        (ScreenId::Alerts, Box::new(alerts::AlertsScreen::new())),
    ]
}
