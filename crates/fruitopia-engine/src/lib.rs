mod chat;
mod client;
mod config;
mod enrichment;
mod resolver;
mod transport;

#[cfg(test)]
mod test_support;

pub use chat::ChatSession;
pub use client::{ExploreOutcome, FruitopiaClient};
pub use config::ClientConfig;
pub use enrichment::{EnrichmentAggregator, ExploreView, PendingGallery};
pub use resolver::CandidateResolver;
pub use transport::{Body, FetchError, HttpTransport, Transport};
