use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum VideoQuality {
    Sd,
    #[default]
    Hd,
    FullHd,
    UltraHd,
}

impl VideoQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::Sd => "sd",
            VideoQuality::Hd => "hd",
            VideoQuality::FullHd => "full_hd",
            VideoQuality::UltraHd => "ultra_hd",
        }
    }

    // Unknown values fall back to the default tier.
    pub fn from_str(value: &str) -> Self {
        match value {
            "sd" => VideoQuality::Sd,
            "hd" => VideoQuality::Hd,
            "full_hd" => VideoQuality::FullHd,
            "ultra_hd" => VideoQuality::UltraHd,
            _ => VideoQuality::default(),
        }
    }
}

impl Display for VideoQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
