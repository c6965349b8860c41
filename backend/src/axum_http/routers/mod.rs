pub mod contents;
pub mod favorites;
pub mod payments;
pub mod progress;
pub mod subscriptions;
