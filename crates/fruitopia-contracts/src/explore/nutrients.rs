use serde::Serialize;
use serde_json::{Map, Value};

/// Raw key -> (display name, unit).
const NUTRIENT_TABLE: &[(&str, &str, &str)] = &[
    ("vitaminA_IU_or_µg", "Vitamin A", "µg"),
    ("vitaminB1_mg", "Vitamin B1", "mg"),
    ("vitaminB2_mg", "Vitamin B2", "mg"),
    ("vitaminB3_mg", "Vitamin B3", "mg"),
    ("vitaminB5_mg", "Vitamin B5", "mg"),
    ("vitaminB6_mg", "Vitamin B6", "mg"),
    ("folate_µg", "Folate", "µg"),
    ("vitaminC_mg", "Vitamin C", "mg"),
    ("vitaminD_IU", "Vitamin D", "IU"),
    ("vitaminE_mg", "Vitamin E", "mg"),
    ("vitaminK_µg", "Vitamin K", "µg"),
    ("calcium_mg", "Calcium", "mg"),
    ("iron_mg", "Iron", "mg"),
    ("magnesium_mg", "Magnesium", "mg"),
    ("phosphorus_mg", "Phosphorus", "mg"),
    ("potassium_mg", "Potassium", "mg"),
    ("zinc_mg", "Zinc", "mg"),
    ("sodium_mg", "Sodium", "mg"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NutrientEntry {
    pub display_name: String,
    pub display_value: String,
}

fn lookup(key: &str) -> Option<(&'static str, &'static str)> {
    NUTRIENT_TABLE
        .iter()
        .find(|(raw, _, _)| *raw == key)
        .map(|(_, name, unit)| (*name, *unit))
}

/// Unknown keys are their own display name.
pub fn display_name(key: &str) -> &str {
    lookup(key).map(|(name, _)| name).unwrap_or(key)
}

pub fn display_value(key: &str, value: &Value) -> String {
    let text = value_text(value);
    match lookup(key) {
        Some((_, unit)) => format!("{text} {unit}"),
        None => text,
    }
}

/// Labels every entry in upstream order; nothing is dropped.
pub fn label_nutrients(raw: &Map<String, Value>) -> Vec<NutrientEntry> {
    raw.iter()
        .map(|(key, value)| NutrientEntry {
            display_name: display_name(key).to_string(),
            display_value: display_value(key, value),
        })
        .collect()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(uint) = number.as_u64() {
                uint.to_string()
            } else {
                number
                    .as_f64()
                    .map(|float| float.to_string())
                    .unwrap_or_else(|| number.to_string())
            }
        }
        other => other.to_string(),
    }
}
