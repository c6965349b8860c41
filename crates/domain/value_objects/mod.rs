pub mod contents;
pub mod entitlements;
pub mod enums;
pub mod payments;
pub mod plans;
pub mod subscriptions;
pub mod validation;
pub mod watch_progress;
