use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use fruitopia_contracts::explore::{
    samples_url, ArcSegment, FruitRecord, GalleryState, Lightbox, MacroPercentages, MapPin,
    NutritionRecord,
};
use serde_json::Value;

use crate::transport::{FetchError, Transport};

/// Everything the explore screen renders for one resolved record. All of it
/// is available immediately except `gallery`, which arrives later through
/// [`PendingGallery`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreView {
    pub record: FruitRecord,
    pub nutrition: NutritionRecord,
    pub percentages: MacroPercentages,
    pub arcs: [ArcSegment; 3],
    pub gradient: String,
    pub map: Option<MapPin>,
    pub pairings: Vec<String>,
    pub propagation: Vec<String>,
    pub gallery: Option<GalleryState>,
    pub lightbox: Lightbox,
}

impl ExploreView {
    pub fn from_record(record: FruitRecord) -> Self {
        let nutrition = record.nutrition();
        let percentages = nutrition.percentages();
        Self {
            arcs: percentages.arcs(),
            gradient: percentages.conic_gradient(),
            map: record.map_pin(),
            pairings: record.pairings(),
            propagation: record.propagation_methods(),
            nutrition,
            percentages,
            record,
            gallery: None,
            lightbox: Lightbox::default(),
        }
    }

    pub fn merge_gallery(&mut self, gallery: GalleryState) {
        self.lightbox = Lightbox::default();
        self.gallery = Some(gallery);
    }

    pub fn gallery_len(&self) -> usize {
        self.gallery.as_ref().map_or(0, |gallery| gallery.images.len())
    }
}

/// Sample gallery still in flight. Dropping it discards the result; the
/// worker runs to completion either way.
#[derive(Debug)]
pub struct PendingGallery {
    rx: Option<Receiver<GalleryState>>,
    fallback: Vec<String>,
}

impl PendingGallery {
    /// Merges the gallery if it has arrived. Returns true once merged.
    pub fn try_merge(&mut self, view: &mut ExploreView) -> bool {
        let Some(rx) = self.rx.as_ref() else {
            return true;
        };
        let gallery = match rx.try_recv() {
            Ok(gallery) => gallery,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => self.fallback_gallery(),
        };
        self.rx = None;
        view.merge_gallery(gallery);
        true
    }

    /// Blocks until the gallery is known and merges it.
    pub fn wait(mut self, view: &mut ExploreView) {
        let Some(rx) = self.rx.take() else {
            return;
        };
        let gallery = rx.recv().unwrap_or_else(|_| self.fallback_gallery());
        view.merge_gallery(gallery);
    }

    fn fallback_gallery(&mut self) -> GalleryState {
        GalleryState::embedded(std::mem::take(&mut self.fallback))
    }
}

/// Builds the explore view for a resolved record and fetches its sample
/// gallery off the caller's thread.
#[derive(Clone)]
pub struct EnrichmentAggregator {
    transport: Arc<dyn Transport>,
    api_base: String,
    sample_count: u32,
}

impl EnrichmentAggregator {
    pub fn new(
        transport: Arc<dyn Transport>,
        api_base: impl Into<String>,
        sample_count: u32,
    ) -> Self {
        Self {
            transport,
            api_base: api_base.into(),
            sample_count,
        }
    }

    pub fn begin(&self, record: FruitRecord) -> (ExploreView, PendingGallery) {
        let embedded = record.embedded_images();
        let class_name = record.key.clone();
        let view = ExploreView::from_record(record);

        let (tx, rx) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        let api_base = self.api_base.clone();
        let url = samples_url(&api_base, &class_name, self.sample_count);
        let worker_embedded = embedded.clone();
        let spawned = thread::Builder::new()
            .name("fruitopia-samples".to_string())
            .spawn(move || {
                let samples = match fetch_samples(transport.as_ref(), &url) {
                    Ok(samples) => Some(samples),
                    Err(err) => {
                        log::warn!("sample fetch for {class_name} failed: {err}");
                        None
                    }
                };
                let gallery =
                    GalleryState::resolve(&api_base, &class_name, samples, worker_embedded);
                let _ = tx.send(gallery);
            });
        if let Err(err) = spawned {
            log::warn!("sample worker spawn failed: {err}");
        }

        let pending = PendingGallery {
            rx: Some(rx),
            fallback: embedded,
        };
        (view, pending)
    }
}

fn fetch_samples(transport: &dyn Transport, url: &str) -> Result<Vec<String>, FetchError> {
    let payload = transport.get(url)?.json()?;
    Ok(payload
        .get("samples")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}
