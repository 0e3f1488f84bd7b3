pub mod catalog;
pub mod dispatcher;
pub mod types;

pub use catalog::EmergencyKind;
pub use dispatcher::{AlertDispatcher, AlertTiming, PendingConfirmation};
pub use types::{AlertStatus, EmergencyAlert, Severity};
