use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canonical column header of the alert log.
pub const HEADER: [&str; 4] = ["Time", "Animal", "Confidence", "Image"];

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One detected dangerous-animal event. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(rename = "Time", with = "time_format")]
    pub time: NaiveDateTime,
    #[serde(rename = "Animal")]
    pub animal: String,
    #[serde(rename = "Confidence")]
    pub confidence: f32,
    #[serde(rename = "Image")]
    pub image: String,
}

impl AlertRecord {
    pub fn new(time: NaiveDateTime, animal: &str, confidence: f32, image: &Path) -> Self {
        Self {
            time: time.with_nanosecond(0).unwrap_or(time),
            animal: animal.to_string(),
            confidence,
            image: image.to_string_lossy().into_owned(),
        }
    }
}

/// The whole log, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertTable {
    pub rows: Vec<AlertRecord>,
}

impl AlertTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

mod time_format {
    use super::TIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
