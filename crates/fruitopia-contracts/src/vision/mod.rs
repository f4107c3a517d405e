mod normalize;
mod upload;

pub use normalize::{
    classify_shape, normalize, normalize_response, CanonicalPrediction, Classification,
    NormalizedPredictions, PayloadShape, DEFAULT_SCORE, LOW_CONFIDENCE_THRESHOLD,
};
pub use upload::ImageUpload;
