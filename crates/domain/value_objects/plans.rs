use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;
use crate::domain::value_objects::enums::video_qualities::VideoQuality;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanDto {
    pub id: Uuid,
    pub name: String,
    pub price_minor: i32,
    pub currency: String,
    pub duration_days: i32,
    pub quality: VideoQuality,
    pub features: Vec<String>,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price_minor: value.price_minor,
            currency: value.currency,
            duration_days: value.duration_days,
            quality: VideoQuality::from_str(&value.quality),
            features: value.features,
        }
    }
}
