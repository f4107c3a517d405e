use std::env;

pub const DEFAULT_ORIGIN: &str = "http://localhost:4200";
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_STATIC_ROOTS: &[&str] = &["/data/explore", "/assets/explore"];
pub const DEFAULT_SAMPLE_COUNT: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base for same-origin routes and static assets.
    pub origin: String,
    /// Absolute backend URL.
    pub api_base: String,
    pub static_roots: Vec<String>,
    pub sample_count: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            static_roots: DEFAULT_STATIC_ROOTS
                .iter()
                .map(|root| (*root).to_string())
                .collect(),
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();
        Self {
            origin: value("FRUITOPIA_ORIGIN")
                .map(|value| normalize_base(&value))
                .unwrap_or(defaults.origin),
            api_base: value("FRUITOPIA_API_BASE")
                .map(|value| normalize_base(&value))
                .unwrap_or(defaults.api_base),
            static_roots: value("FRUITOPIA_STATIC_ROOTS")
                .map(|value| {
                    value
                        .split(',')
                        .map(normalize_base)
                        .filter(|root| !root.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|roots| !roots.is_empty())
                .unwrap_or(defaults.static_roots),
            sample_count: value("FRUITOPIA_SAMPLE_COUNT")
                .and_then(|value| value.parse::<u32>().ok())
                .filter(|count| *count > 0)
                .unwrap_or(defaults.sample_count),
        }
    }

    pub fn with_origin(mut self, origin: Option<&str>) -> Self {
        if let Some(origin) = origin.map(normalize_base).filter(|v| !v.is_empty()) {
            self.origin = origin;
        }
        self
    }

    pub fn with_api_base(mut self, api_base: Option<&str>) -> Self {
        if let Some(api_base) = api_base.map(normalize_base).filter(|v| !v.is_empty()) {
            self.api_base = api_base;
        }
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
