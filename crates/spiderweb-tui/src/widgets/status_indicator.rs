//! Status indicators — colored status and severity tags.

use ratatui::style::Style;
use ratatui::text::Span;

use spiderweb_core::{AlertSeverity, CollectionStatus};

use crate::theme;

/// Styled word for a collection load status.
pub fn collection_status_span(status: &CollectionStatus) -> Span<'static> {
    let (label, color) = match status {
        CollectionStatus::Idle => ("idle", theme::FG_DIM),
        CollectionStatus::Loading => ("loading", theme::STATUS_ISSUE),
        CollectionStatus::Succeeded => ("ok", theme::STATUS_UP),
        CollectionStatus::Failed(_) => ("failed", theme::STATUS_DOWN),
    };
    Span::styled(label, Style::default().fg(color))
}

/// Styled severity tag for an alert.
pub fn severity_span(severity: AlertSeverity) -> Span<'static> {
    let (label, color) = match severity {
        AlertSeverity::Error => ("ERROR", theme::STATUS_DOWN),
        AlertSeverity::Warning => ("WARN ", theme::STATUS_ISSUE),
        AlertSeverity::Info => ("INFO ", theme::ACCENT_BLUE),
    };
    Span::styled(label, Style::default().fg(color))
}
