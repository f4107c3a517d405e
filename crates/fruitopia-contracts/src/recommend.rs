use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::explore::sample_image_url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationQuery {
    pub disease: String,
    pub have: Vec<String>,
}

impl RecommendationQuery {
    /// A typed disease takes priority over the one picked from the list.
    pub fn new(selected: &str, typed: Option<&str>, have: Vec<String>) -> Self {
        let disease = typed
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(selected)
            .to_string();
        Self {
            disease,
            have: have
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "class", default)]
    pub class_name: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub sample: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recommendation {
    pub fn sample_image_url(&self, api_base: &str) -> Option<String> {
        let sample = self.sample.as_deref().filter(|value| !value.is_empty())?;
        Some(sample_image_url(api_base, &self.class_name, sample))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub disease: Option<String>,
}
