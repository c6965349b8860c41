pub mod contents;
pub mod errors;
pub mod favorites;
pub mod payments;
pub mod progress;
pub mod subscriptions;
