use indexmap::IndexMap;
use serde::Serialize;

/// Class name -> sample file names, in class-listing order.
pub type ClassGallery = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GallerySource {
    Samples,
    Embedded,
    Empty,
}

/// Exactly one source fills `images`: fetched samples, or the record's
/// embedded images when the sample fetch produced nothing. Never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryState {
    pub samples: Vec<String>,
    pub images: Vec<String>,
    pub source: GallerySource,
}

impl GalleryState {
    pub fn from_samples(api_base: &str, class_name: &str, samples: Vec<String>) -> Self {
        let images = samples
            .iter()
            .map(|file| sample_image_url(api_base, class_name, file))
            .collect();
        Self {
            samples,
            images,
            source: GallerySource::Samples,
        }
    }

    pub fn embedded(images: Vec<String>) -> Self {
        let source = if images.is_empty() {
            GallerySource::Empty
        } else {
            GallerySource::Embedded
        };
        Self {
            samples: Vec::new(),
            images,
            source,
        }
    }

    /// `samples` is `None` when the fetch failed; an empty listing is
    /// treated the same way.
    pub fn resolve(
        api_base: &str,
        class_name: &str,
        samples: Option<Vec<String>>,
        embedded: Vec<String>,
    ) -> Self {
        match samples {
            Some(samples) if !samples.is_empty() => {
                Self::from_samples(api_base, class_name, samples)
            }
            _ => Self::embedded(embedded),
        }
    }

    pub fn hero_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lightbox {
    pub open: bool,
    pub index: usize,
}

impl Lightbox {
    pub fn open_at(&mut self, index: usize) {
        self.index = index;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn next(&mut self, len: usize) {
        self.index = (self.index + 1) % len.max(1);
    }

    pub fn prev(&mut self, len: usize) {
        let len = len.max(1);
        self.index = (self.index % len + len - 1) % len;
    }
}

pub fn samples_url(api_base: &str, class_name: &str, count: u32) -> String {
    format!(
        "{}/vision/samples?cls={}&n={count}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(class_name)
    )
}

pub fn sample_image_url(api_base: &str, class_name: &str, file: &str) -> String {
    format!(
        "{}/vision/image?cls={}&file={}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(class_name),
        urlencoding::encode(file)
    )
}

pub fn is_safe_sample_name(file: &str) -> bool {
    !file.is_empty() && !file.contains("..") && !file.contains('/') && !file.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::{
        is_safe_sample_name, sample_image_url, samples_url, GallerySource, GalleryState, Lightbox,
    };

    #[test]
    fn samples_win_over_embedded_images() {
        let gallery = GalleryState::resolve(
            "http://api",
            "mango",
            Some(vec!["m1.jpg".to_string()]),
            vec!["/json/mango.jpg".to_string()],
        );
        assert_eq!(gallery.source, GallerySource::Samples);
        assert_eq!(gallery.images, vec!["http://api/vision/image?cls=mango&file=m1.jpg"]);
        assert_eq!(gallery.samples, vec!["m1.jpg"]);
    }

    #[test]
    fn failed_or_empty_samples_fall_back_to_embedded() {
        let embedded = vec!["/json/mango.jpg".to_string()];
        for samples in [None, Some(Vec::new())] {
            let gallery =
                GalleryState::resolve("http://api", "mango", samples, embedded.clone());
            assert_eq!(gallery.source, GallerySource::Embedded);
            assert_eq!(gallery.images, embedded);
            assert!(gallery.samples.is_empty());
            assert_eq!(gallery.hero_image(), Some("/json/mango.jpg"));
        }
        let bare = GalleryState::resolve("http://api", "mango", None, Vec::new());
        assert_eq!(bare.source, GallerySource::Empty);
        assert_eq!(bare.hero_image(), None);
    }

    #[test]
    fn urls_are_query_encoded() {
        assert_eq!(
            samples_url("http://api/", "passion fruit", 6),
            "http://api/vision/samples?cls=passion%20fruit&n=6"
        );
        assert_eq!(
            sample_image_url("http://api", "fig", "a&b.jpg"),
            "http://api/vision/image?cls=fig&file=a%26b.jpg"
        );
    }

    #[test]
    fn sample_names_with_path_parts_are_unsafe() {
        assert!(is_safe_sample_name("img_001.jpg"));
        assert!(!is_safe_sample_name("../secret"));
        assert!(!is_safe_sample_name("a/b.jpg"));
        assert!(!is_safe_sample_name("a\\b.jpg"));
        assert!(!is_safe_sample_name(""));
    }

    #[test]
    fn lightbox_wraps_in_both_directions() {
        let mut lightbox = Lightbox::default();
        lightbox.open_at(2);
        lightbox.next(3);
        assert_eq!(lightbox.index, 0);
        lightbox.prev(3);
        assert_eq!(lightbox.index, 2);
        lightbox.next(0);
        assert_eq!(lightbox.index, 0);
        lightbox.close();
        assert!(!lightbox.open);
    }
}
