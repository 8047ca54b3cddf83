pub mod alerts;
pub mod poller;

pub use alerts::{AlertService, AlertSource};
pub use poller::{AlertPoller, PollerHandle};
