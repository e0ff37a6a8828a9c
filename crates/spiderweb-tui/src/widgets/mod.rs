//! Small shared render helpers.

pub mod status_indicator;
