pub mod content_types;
pub mod payment_methods;
pub mod payment_statuses;
pub mod video_qualities;
