use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Movie,
    Series,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "series",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "series" => ContentType::Series,
            _ => ContentType::Movie,
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
