use std::sync::Arc;

use anyhow::{bail, Context, Result};
use fruitopia_contracts::chat::{ChatReply, ChatRequest};
use fruitopia_contracts::explore::{
    is_safe_sample_name, sample_image_url, samples_url, ClassGallery, FruitRecord,
};
use fruitopia_contracts::recommend::{RecommendationQuery, RecommendationResponse};
use fruitopia_contracts::resolve::{
    detail_key, detail_locators, FailedAttempt, ResolutionOutcome, ResourceLocator,
};
use fruitopia_contracts::vision::{normalize_response, ImageUpload, NormalizedPredictions};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::enrichment::{EnrichmentAggregator, ExploreView, PendingGallery};
use crate::resolver::CandidateResolver;
use crate::transport::{Body, HttpTransport, Transport};

#[derive(Debug)]
pub enum ExploreOutcome {
    Ready {
        view: ExploreView,
        pending: PendingGallery,
        source: ResourceLocator,
    },
    /// Every source was tried; an expected outcome for unknown names.
    NoData {
        key: String,
        tried: Vec<FailedAttempt>,
    },
}

impl ExploreOutcome {
    pub fn no_data_message(&self) -> Option<String> {
        match self {
            Self::Ready { .. } => None,
            Self::NoData { key, .. } => Some(format!("Could not load data for {key}")),
        }
    }
}

/// Explicitly constructed API client; clone it to share between consumers.
#[derive(Clone)]
pub struct FruitopiaClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl FruitopiaClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn resolver(&self) -> CandidateResolver {
        CandidateResolver::new(Arc::clone(&self.transport), self.config.origin.clone())
    }

    pub fn aggregator(&self) -> EnrichmentAggregator {
        EnrichmentAggregator::new(
            Arc::clone(&self.transport),
            self.config.api_base.clone(),
            self.config.sample_count,
        )
    }

    /// Resolves the detail record for `name`, then starts gallery enrichment.
    pub fn explore(&self, name: &str) -> Result<ExploreOutcome> {
        let key = detail_key(name)?;
        let locators = detail_locators(&key, &self.config.api_base, &self.config.static_roots)?;
        match self.resolver().resolve(&locators) {
            ResolutionOutcome::Found { payload, source } => {
                log::info!("explore {key}: loaded from {source}");
                let (view, pending) = self.aggregator().begin(FruitRecord::new(key, payload));
                Ok(ExploreOutcome::Ready {
                    view,
                    pending,
                    source,
                })
            }
            ResolutionOutcome::NotFound { tried } => Ok(ExploreOutcome::NoData { key, tried }),
        }
    }

    pub fn classify(&self, upload: &ImageUpload) -> Result<NormalizedPredictions> {
        let url = self.config.endpoint("/vision/predict");
        let payload = self
            .transport
            .post_file(&url, "file", upload)
            .and_then(|body| body.json())
            .with_context(|| format!("prediction request failed ({url})"))?;
        let normalized = normalize_response(&payload);
        if normalized.is_empty() {
            log::warn!("prediction response had no recognizable predictions");
        }
        Ok(normalized)
    }

    pub fn samples(&self, class_name: &str, count: u32) -> Result<Vec<String>> {
        let url = samples_url(&self.config.api_base, class_name, count);
        let payload = self.get_json(&url)?;
        Ok(string_list(&payload, "samples"))
    }

    pub fn sample_image(&self, class_name: &str, file: &str) -> Result<Body> {
        if !is_safe_sample_name(file) {
            bail!("invalid sample file name: {file}");
        }
        let url = sample_image_url(&self.config.api_base, class_name, file);
        self.transport
            .get(&url)
            .with_context(|| format!("sample image request failed ({url})"))
    }

    pub fn classes(&self) -> Result<Vec<String>> {
        let payload = self.get_json(&self.config.endpoint("/vision/classes"))?;
        Ok(string_list(&payload, "classes"))
    }

    /// Class -> sample names; a class whose listing fails maps to an empty list.
    pub fn class_gallery(&self) -> Result<ClassGallery> {
        let mut gallery = ClassGallery::new();
        for class_name in self.classes()? {
            let samples = self
                .samples(&class_name, self.config.sample_count)
                .unwrap_or_else(|err| {
                    log::warn!("samples for {class_name} unavailable: {err:#}");
                    Vec::new()
                });
            gallery.insert(class_name, samples);
        }
        Ok(gallery)
    }

    pub fn diseases(&self) -> Result<Vec<String>> {
        let payload = self.get_json(&self.config.endpoint("/recommend/diseases"))?;
        Ok(string_list(&payload, "diseases"))
    }

    pub fn recommend(&self, query: &RecommendationQuery) -> Result<RecommendationResponse> {
        if query.disease.trim().is_empty() {
            bail!("No disease specified");
        }
        let url = self.config.endpoint("/recommend");
        let payload = self.post_json(&url, &serde_json::to_value(query)?)?;
        serde_json::from_value(payload).context("invalid recommendation response")
    }

    /// Fruit catalog; `None`, empty, or `all` lists every category.
    pub fn fruits(&self, category: Option<&str>) -> Result<Value> {
        let mut url = self.config.endpoint("/fruits");
        if let Some(category) = category
            .map(str::trim)
            .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
        {
            url.push_str("?category=");
            url.push_str(&urlencoding::encode(category));
        }
        self.get_json(&url)
    }

    pub fn chat_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.config.endpoint("/chat");
        let payload = self.post_json(&url, &serde_json::to_value(request)?)?;
        serde_json::from_value(payload).context("invalid chat response")
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        self.transport
            .get(url)
            .and_then(|body| body.json())
            .with_context(|| format!("request failed ({url})"))
    }

    fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
        self.transport
            .post_json(url, payload)
            .and_then(|body| body.json())
            .with_context(|| format!("request failed ({url})"))
    }
}

fn string_list(payload: &Value, field: &str) -> Vec<String> {
    payload
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
