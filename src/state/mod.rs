pub mod curve;
pub mod dashboard_state;
