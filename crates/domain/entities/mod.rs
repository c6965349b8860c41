pub mod contents;
pub mod favorites;
pub mod payments;
pub mod plans;
pub mod subscriptions;
pub mod users;
pub mod watch_progress;
