use std::f64::consts::PI;

use serde::Serialize;
use serde_json::{Map, Value};

use super::nutrients::{label_nutrients, NutrientEntry};

/// Donut colors in bucket order: carbs, protein, fat.
pub const MACRO_COLORS: [&str; 3] = ["#2b9df4", "#7bd389", "#f4a261"];
pub const MACRO_LABELS: [&str; 3] = ["Carbs", "Protein", "Fat"];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MacroComposition {
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

impl MacroComposition {
    /// Reads `nutritionalFacts.macronutrients`; missing or junk values count as 0.
    pub fn from_record(record: &Value) -> Self {
        record
            .pointer("/nutritionalFacts/macronutrients")
            .and_then(Value::as_object)
            .map(Self::from)
            .unwrap_or_default()
    }

    pub fn percentages(&self) -> MacroPercentages {
        let sum = self.carbs + self.protein + self.fat;
        let total = if sum > 0.0 { sum } else { 1.0 };
        let carbs = share(self.carbs, total);
        let protein = share(self.protein, total).min(100 - carbs);
        MacroPercentages {
            carbs,
            protein,
            fat: 100 - carbs - protein,
        }
    }
}

fn grams(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() && parsed > 0.0 {
        parsed
    } else {
        0.0
    }
}

fn share(part: f64, total: f64) -> u32 {
    ((part / total) * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Integer shares that always sum to 100; fat absorbs the rounding residual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroPercentages {
    pub carbs: u32,
    pub protein: u32,
    pub fat: u32,
}

impl MacroPercentages {
    pub fn as_array(&self) -> [u32; 3] {
        [self.carbs, self.protein, self.fat]
    }

    /// Contiguous arcs over the full circle, in carbs/protein/fat order.
    pub fn arcs(&self) -> [ArcSegment; 3] {
        let pcts = self.as_array();
        let mut cumulative = 0u32;
        let mut start = 0.0;
        std::array::from_fn(|idx| {
            cumulative += pcts[idx];
            let end = f64::from(cumulative) / 100.0 * 360.0;
            let segment = ArcSegment {
                color: MACRO_COLORS[idx].to_string(),
                start_degrees: start,
                end_degrees: end,
                label: format!("{} {}%", MACRO_LABELS[idx], pcts[idx]),
            };
            start = end;
            segment
        })
    }

    pub fn conic_gradient(&self) -> String {
        let first = self.carbs;
        let second = self.carbs + self.protein;
        format!(
            "conic-gradient({} 0% {first}%, {} {first}% {second}%, {} {second}% 100%)",
            MACRO_COLORS[0], MACRO_COLORS[1], MACRO_COLORS[2]
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcSegment {
    pub color: String,
    pub start_degrees: f64,
    pub end_degrees: f64,
    pub label: String,
}

impl ArcSegment {
    pub fn sweep(&self) -> f64 {
        self.end_degrees - self.start_degrees
    }

    /// SVG path for this arc; angles run clockwise from 12 o'clock.
    pub fn describe_arc(&self, cx: f64, cy: f64, radius: f64) -> String {
        let (sx, sy) = polar_to_cartesian(cx, cy, radius, self.end_degrees);
        let (ex, ey) = polar_to_cartesian(cx, cy, radius, self.start_degrees);
        let large_arc = if self.sweep() <= 180.0 { 0 } else { 1 };
        format!("M {sx} {sy} A {radius} {radius} 0 {large_arc} 0 {ex} {ey}")
    }
}

fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = (degrees - 90.0) * PI / 180.0;
    (cx + radius * radians.cos(), cy + radius * radians.sin())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionRecord {
    pub macros: MacroComposition,
    pub vitamins: Vec<NutrientEntry>,
    pub minerals: Vec<NutrientEntry>,
}

impl NutritionRecord {
    pub fn from_record(record: &Value) -> Self {
        let labeled = |pointer: &str| {
            record
                .pointer(pointer)
                .and_then(Value::as_object)
                .map(label_nutrients)
                .unwrap_or_default()
        };
        Self {
            macros: MacroComposition::from_record(record),
            vitamins: labeled("/nutritionalFacts/vitamins"),
            minerals: labeled("/nutritionalFacts/minerals"),
        }
    }

    pub fn percentages(&self) -> MacroPercentages {
        self.macros.percentages()
    }
}

impl From<&Map<String, Value>> for MacroComposition {
    fn from(macros: &Map<String, Value>) -> Self {
        Self {
            carbs: grams(macros.get("carbohydrates_g")),
            protein: grams(macros.get("protein_g")),
            fat: grams(macros.get("fat_g")),
        }
    }
}
