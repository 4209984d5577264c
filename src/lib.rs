//! Chart-ready earned-value curves and executive metrics from a project
//! dashboard's data blob.

pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod report;
pub mod state;

pub use data::blob::{BudgetRefs, DashboardBlob, Sample};
pub use processing::normalize::normalize;
pub use state::curve::{CurveChart, Granularity};
pub use state::dashboard_state::DashboardState;
