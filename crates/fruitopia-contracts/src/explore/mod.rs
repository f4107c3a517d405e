mod gallery;
mod nutrients;
mod nutrition;
mod record;

pub use gallery::{
    is_safe_sample_name, sample_image_url, samples_url, ClassGallery, GallerySource,
    GalleryState, Lightbox,
};
pub use nutrients::{display_name, display_value, label_nutrients, NutrientEntry};
pub use nutrition::{
    ArcSegment, MacroComposition, MacroPercentages, NutritionRecord, MACRO_COLORS, MACRO_LABELS,
};
pub use record::{parse_coordinate, FruitRecord, MapPin, MAP_ZOOM};
