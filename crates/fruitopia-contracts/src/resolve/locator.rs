use std::fmt;

use anyhow::{bail, Result};

/// One place to look for a record. Position in the list is precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocator {
    /// Same-origin application route, resolved against the origin.
    Route(String),
    /// Absolute backend URL, used verbatim.
    Endpoint(String),
    /// Static JSON asset, resolved against the origin.
    Static(String),
}

impl ResourceLocator {
    pub fn url(&self, origin: &str) -> String {
        match self {
            Self::Route(path) | Self::Static(path) => join_origin(origin, path),
            Self::Endpoint(url) => url.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Route(_) => "route",
            Self::Endpoint(_) => "endpoint",
            Self::Static(_) => "static",
        }
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route(path) | Self::Static(path) => write!(f, "{}:{path}", self.kind()),
            Self::Endpoint(url) => write!(f, "{}:{url}", self.kind()),
        }
    }
}

/// Lowercased, trimmed lookup key for a record name.
pub fn detail_key(name: &str) -> Result<String> {
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        bail!("No fruit specified");
    }
    Ok(key)
}

/// Ordered detail-lookup candidates: same-origin route, backend endpoint,
/// then one static JSON asset per root.
pub fn detail_locators(
    name: &str,
    api_base: &str,
    static_roots: &[String],
) -> Result<Vec<ResourceLocator>> {
    let key = detail_key(name)?;
    let segment = urlencoding::encode(&key);
    let mut locators = vec![
        ResourceLocator::Route(format!("/explore/{segment}")),
        ResourceLocator::Endpoint(format!(
            "{}/explore/{segment}",
            api_base.trim_end_matches('/')
        )),
    ];
    for root in static_roots {
        let root = root.trim().trim_end_matches('/');
        if root.is_empty() {
            continue;
        }
        locators.push(ResourceLocator::Static(format!("{root}/{segment}.json")));
    }
    Ok(locators)
}

fn join_origin(origin: &str, path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    }
}
