use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Score assigned when the upstream omits a confidence field.
pub const DEFAULT_SCORE: f64 = 0.9;

/// Top predictions scoring below this are treated as "not a fruit".
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.45;

const ENTRY_CLASS_KEYS: &[&str] = &["class", "label", "fruit", "name"];
const SCORE_KEYS: &[&str] = &["score", "confidence", "probability"];
const SCALAR_CLASS_KEYS: &[&str] = &["fruit", "class", "label", "prediction", "predicted_label"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPrediction {
    pub class: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedPredictions {
    pub predictions: Vec<CanonicalPrediction>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Confident(Vec<CanonicalPrediction>),
    LowConfidence { top: CanonicalPrediction },
    NoPredictions,
}

impl NormalizedPredictions {
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Withholds the list when the first (top) prediction is below `threshold`.
    pub fn gate(&self, threshold: f64) -> Classification {
        let Some(top) = self.predictions.first() else {
            return Classification::NoPredictions;
        };
        if top.score < threshold {
            return Classification::LowConfidence { top: top.clone() };
        }
        Classification::Confident(self.predictions.clone())
    }
}

/// Recognized upstream encodings, checked in this order.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadShape<'a> {
    List(&'a [Value]),
    Wrapped {
        predictions: &'a [Value],
        source: Option<&'a str>,
    },
    Single {
        class: &'a str,
        score: f64,
    },
    Unrecognized,
}

pub fn classify_shape(raw: &Value) -> PayloadShape<'_> {
    if let Some(items) = raw.as_array() {
        return PayloadShape::List(items);
    }
    let Some(obj) = raw.as_object() else {
        return PayloadShape::Unrecognized;
    };
    if let Some(items) = obj.get("predictions").and_then(Value::as_array) {
        return PayloadShape::Wrapped {
            predictions: items,
            source: obj.get("source").and_then(Value::as_str),
        };
    }
    if let Some(class) = first_class(obj, SCALAR_CLASS_KEYS) {
        return PayloadShape::Single {
            class,
            score: score_of(obj),
        };
    }
    PayloadShape::Unrecognized
}

pub fn normalize(raw: &Value) -> Vec<CanonicalPrediction> {
    normalize_response(raw).predictions
}

/// Never fails: an unrecognized payload yields no predictions.
pub fn normalize_response(raw: &Value) -> NormalizedPredictions {
    match classify_shape(raw) {
        PayloadShape::List(items) => NormalizedPredictions {
            predictions: coerce_entries(items),
            source: None,
        },
        PayloadShape::Wrapped {
            predictions,
            source,
        } => NormalizedPredictions {
            predictions: coerce_entries(predictions),
            source: source.map(str::to_string),
        },
        PayloadShape::Single { class, score } => NormalizedPredictions {
            predictions: vec![prediction(class, score)],
            source: None,
        },
        PayloadShape::Unrecognized => {
            log::debug!("classification payload has no recognizable shape");
            NormalizedPredictions::default()
        }
    }
}

fn coerce_entries(items: &[Value]) -> Vec<CanonicalPrediction> {
    let out = items.iter().filter_map(coerce_entry).collect::<Vec<_>>();
    if out.len() < items.len() {
        log::debug!(
            "dropped {} malformed prediction entries",
            items.len() - out.len()
        );
    }
    out
}

fn coerce_entry(entry: &Value) -> Option<CanonicalPrediction> {
    match entry {
        Value::String(class) => non_empty(class).map(|class| prediction(class, DEFAULT_SCORE)),
        Value::Array(pair) if (1..=2).contains(&pair.len()) => {
            let class = pair[0].as_str().and_then(non_empty)?;
            let score = pair.get(1).and_then(parse_score).unwrap_or(DEFAULT_SCORE);
            Some(prediction(class, score))
        }
        Value::Object(obj) => {
            let class = first_class(obj, ENTRY_CLASS_KEYS)?;
            Some(prediction(class, score_of(obj)))
        }
        _ => None,
    }
}

fn first_class<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .find_map(non_empty)
}

fn score_of(obj: &Map<String, Value>) -> f64 {
    SCORE_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(parse_score))
        .unwrap_or(DEFAULT_SCORE)
}

fn parse_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    score.is_finite().then(|| score.clamp(0.0, 1.0))
}

fn non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn prediction(class: &str, score: f64) -> CanonicalPrediction {
    CanonicalPrediction {
        class: class.to_string(),
        score,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        classify_shape, normalize, normalize_response, CanonicalPrediction, Classification,
        PayloadShape, LOW_CONFIDENCE_THRESHOLD,
    };

    fn pred(class: &str, score: f64) -> CanonicalPrediction {
        CanonicalPrediction {
            class: class.to_string(),
            score,
        }
    }

    #[test]
    fn canonical_wrapped_input_is_unchanged() {
        let raw = json!({"predictions": [{"class": "mango", "score": 0.82}]});
        assert_eq!(normalize(&raw), vec![pred("mango", 0.82)]);
    }

    #[test]
    fn single_fruit_response_becomes_one_prediction() {
        let raw = json!({"fruit": "banana", "confidence": 0.65});
        assert_eq!(normalize(&raw), vec![pred("banana", 0.65)]);
    }

    #[test]
    fn string_array_gets_default_score() {
        let raw = json!(["apple", "pear"]);
        assert_eq!(normalize(&raw), vec![pred("apple", 0.9), pred("pear", 0.9)]);
    }

    #[test]
    fn mixed_list_drops_malformed_entries() {
        let raw = json!([
            "kiwi",
            ["lime", 0.4],
            ["fig"],
            {"label": "plum", "probability": 0.3},
            {"name": "date"},
            42,
            null,
            {"score": 0.5},
            ["", 0.7],
            [1, 2]
        ]);
        assert_eq!(
            normalize(&raw),
            vec![
                pred("kiwi", 0.9),
                pred("lime", 0.4),
                pred("fig", 0.9),
                pred("plum", 0.3),
                pred("date", 0.9),
            ]
        );
    }

    #[test]
    fn wrapped_predictions_propagate_source_tag() {
        let raw = json!({"predictions": ["cherry"], "source": "stub"});
        let normalized = normalize_response(&raw);
        assert_eq!(normalized.predictions, vec![pred("cherry", 0.9)]);
        assert_eq!(normalized.source.as_deref(), Some("stub"));
    }

    #[test]
    fn score_field_precedence_and_clamping() {
        let raw = json!([
            {"class": "a", "score": 0.2, "confidence": 0.8},
            {"class": "b", "confidence": "0.75"},
            {"class": "c", "score": 7}
        ]);
        assert_eq!(
            normalize(&raw),
            vec![pred("a", 0.2), pred("b", 0.75), pred("c", 1.0)]
        );
    }

    #[test]
    fn scalar_fields_follow_precedence() {
        let raw = json!({"predicted_label": "grape", "label": "lemon"});
        assert_eq!(normalize(&raw), vec![pred("lemon", 0.9)]);
        let raw = json!({"prediction": "peach", "probability": 0.55});
        assert_eq!(normalize(&raw), vec![pred("peach", 0.55)]);
    }

    #[test]
    fn unrecognized_shapes_are_empty_not_errors() {
        for raw in [
            json!({"error": "model not available in this environment"}),
            json!(null),
            json!("apple"),
            json!({"predictions": "apple"}),
            json!({"fruit": ""}),
        ] {
            assert_eq!(classify_shape(&raw), PayloadShape::Unrecognized);
            assert!(normalize(&raw).is_empty());
        }
    }

    #[test]
    fn gate_withholds_low_confidence_top_prediction() {
        let confident = normalize_response(&json!([["mango", 0.8], ["papaya", 0.1]]));
        assert_eq!(
            confident.gate(LOW_CONFIDENCE_THRESHOLD),
            Classification::Confident(vec![pred("mango", 0.8), pred("papaya", 0.1)])
        );

        let unsure = normalize_response(&json!([["rock", 0.3]]));
        assert_eq!(
            unsure.gate(LOW_CONFIDENCE_THRESHOLD),
            Classification::LowConfidence {
                top: pred("rock", 0.3)
            }
        );

        let empty = normalize_response(&json!({}));
        assert_eq!(
            empty.gate(LOW_CONFIDENCE_THRESHOLD),
            Classification::NoPredictions
        );
    }
}
