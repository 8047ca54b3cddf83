// =====================================================================================
// ALERT CELL - TODAY'S RISK ALERTS FOR THE STAFF DASHBOARD
// =====================================================================================

pub mod models;
pub mod services;

pub use models::{DashboardState, DashboardSummary, LevelCount, RiskAlert};
pub use services::{AlertPoller, AlertService, AlertSource, PollerHandle};
