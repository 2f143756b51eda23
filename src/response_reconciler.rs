//! # Response Reconciler
//!
//! Turns whatever the AI provider returned into one [`RecognitionResult`].
//! The payload is classified once into an [`AiPayload`] and each variant has
//! its own path:
//!
//! - **Structured**: the newer schema with a `backcompat` block. The AI already
//!   resolved the portion, so numbers are mapped without re-scaling.
//! - **Legacy**: the flat per-100g schema. A quantity written by the user
//!   overrides the AI estimate, then the values are normalized and scaled.
//! - **Unparseable**: missing, malformed or unrecognized JSON. Local keyword
//!   recognition takes over.
//!
//! Reconciliation never fails. Parse errors are logged and demoted to the
//! local path.

use crate::food_model::{NutritionProfile, RecognitionResult, ScaledNutrition, Source, Unit};
use crate::mock_recognition::recognize_locally;
use crate::nutrition_normalizer::{normalize, ProfileOrigin};
use crate::nutrition_scaler::scale;
use crate::quantity_parser::parse_quantity;
use crate::unit_converter::{convert, convert_parsed, parse_unit};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Confidence used when the AI omits one
pub const DEFAULT_AI_CONFIDENCE: u8 = 75;

/// Portion assumed when neither the user nor the AI gave a quantity
pub const DEFAULT_LEGACY_GRAMS: f64 = 100.0;

/// Unit reported for a structured reply that gives neither quantity nor unit
pub const DEFAULT_STRUCTURED_UNIT: &str = "serving";

/// Legacy-shaped summary, also embedded as `backcompat` in the newer schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyResponse {
    pub name: Option<String>,
    pub calories_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
    pub carbs_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub estimated_quantity: Option<f64>,
    pub unit: Option<String>,
    pub confidence: Option<f64>,
}

/// Absolute nutrition for the whole portion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub calories: Option<f64>,
    #[serde(alias = "protein_g")]
    pub protein: Option<f64>,
    #[serde(alias = "carbs_g")]
    pub carbs: Option<f64>,
    #[serde(alias = "fat_g")]
    pub fat: Option<f64>,
}

/// Newer response schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResponse {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub totals: Option<Totals>,
    #[serde(default)]
    pub per_100g: Option<Value>,
    pub backcompat: LegacyResponse,
}

/// AI payload after classification
#[derive(Debug, Clone, PartialEq)]
pub enum AiPayload {
    Structured(StructuredResponse),
    Legacy(LegacyResponse),
    Unparseable,
}

impl AiPayload {
    /// Classify a raw response body
    pub fn from_text(text: &str) -> Self {
        let json = extract_json(text);
        match serde_json::from_str::<Value>(&json) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!(error = %e, "AI response is not valid JSON");
                Self::Unparseable
            }
        }
    }

    /// Classify an already parsed response
    pub fn from_value(value: &Value) -> Self {
        if value.get("backcompat").is_some() {
            return match serde_json::from_value::<StructuredResponse>(value.clone()) {
                Ok(response) => Self::Structured(response),
                Err(e) => {
                    warn!(error = %e, "Structured AI response has an invalid shape");
                    Self::Unparseable
                }
            };
        }

        if value.get("calories_per_100g").is_some() {
            return match serde_json::from_value::<LegacyResponse>(value.clone()) {
                Ok(response) => Self::Legacy(response),
                Err(e) => {
                    warn!(error = %e, "Legacy AI response has an invalid shape");
                    Self::Unparseable
                }
            };
        }

        debug!("AI response matches no known schema");
        Self::Unparseable
    }
}

/// Strip markdown code fences and surrounding prose from an AI reply
pub fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    let body = match trimmed.strip_prefix("```") {
        Some(fenced) => {
            // Language tag, if any, sits right after the opening fence
            let fenced = fenced.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
            let fenced = fenced.trim_end();
            fenced.strip_suffix("```").unwrap_or(fenced).trim()
        }
        None => trimmed,
    };

    // Models sometimes wrap the object in a sentence
    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => body[start..=end].to_string(),
        _ => body.to_string(),
    }
}

/// Convert an AI confidence into a 0-100 integer
///
/// Values up to 1 are fractions; larger values are already percentages.
pub fn confidence_percent(confidence: Option<f64>) -> u8 {
    match confidence {
        Some(value) if value.is_finite() && value >= 0.0 => {
            let percent = if value <= 1.0 { value * 100.0 } else { value };
            percent.round().min(100.0) as u8
        }
        _ => DEFAULT_AI_CONFIDENCE,
    }
}

/// Reconcile a raw AI response body with the user's description
pub fn reconcile(description: &str, ai_response: Option<&str>) -> RecognitionResult {
    let payload = ai_response.map_or(AiPayload::Unparseable, AiPayload::from_text);
    reconcile_payload(description, payload)
}

/// Reconcile an already parsed AI response with the user's description
pub fn reconcile_value(description: &str, ai_response: Option<&Value>) -> RecognitionResult {
    let payload = ai_response.map_or(AiPayload::Unparseable, AiPayload::from_value);
    reconcile_payload(description, payload)
}

/// Reconcile a classified payload
pub fn reconcile_payload(description: &str, payload: AiPayload) -> RecognitionResult {
    let result = match payload {
        AiPayload::Structured(response) => from_structured(description, response),
        AiPayload::Legacy(response) => from_legacy(description, &response),
        AiPayload::Unparseable => None,
    };

    let result = result.unwrap_or_else(|| {
        warn!(description, "No usable AI nutrition, using local recognition");
        recognize_locally(description)
    });

    info!(
        description,
        name = %result.name,
        calories = result.calories,
        source = %result.source,
        confidence = result.confidence,
        "Reconciled food recognition"
    );

    result
}

fn display_name(name: Option<&str>, description: &str) -> String {
    name.map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| description.trim())
        .to_string()
}

fn from_structured(description: &str, response: StructuredResponse) -> Option<RecognitionResult> {
    let backcompat = response.backcompat;

    let nutrition = match response.totals {
        Some(totals) if totals.calories.is_some() => ScaledNutrition::new(
            totals.calories.unwrap_or_default(),
            totals.protein.unwrap_or_default(),
            totals.carbs.unwrap_or_default(),
            totals.fat.unwrap_or_default(),
        ),
        _ => {
            let calories = backcompat.calories_per_100g?;
            ScaledNutrition::new(
                calories,
                backcompat.protein_per_100g.unwrap_or_default(),
                backcompat.carbs_per_100g.unwrap_or_default(),
                backcompat.fat_per_100g.unwrap_or_default(),
            )
        }
    };

    debug!(items = response.items.len(), "Mapping structured AI response");

    // Totals cover the whole portion, so a reply without a quantity is one serving
    let default_unit = match backcompat.estimated_quantity {
        Some(_) => Unit::Grams.display_name(),
        None => DEFAULT_STRUCTURED_UNIT,
    };
    let unit = backcompat
        .unit
        .as_deref()
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
        .unwrap_or(default_unit);

    Some(
        RecognitionResult::new(
            &display_name(backcompat.name.as_deref(), description),
            nutrition,
            Source::StructuredAi,
        )
        .with_quantity(backcompat.estimated_quantity.unwrap_or(1.0), unit)
        .with_confidence(confidence_percent(backcompat.confidence)),
    )
}

fn from_legacy(description: &str, response: &LegacyResponse) -> Option<RecognitionResult> {
    let name = display_name(response.name.as_deref(), description);

    let raw = response.calories_per_100g.map(|calories| {
        NutritionProfile::per_100g(
            calories,
            response.protein_per_100g.unwrap_or_default(),
            response.carbs_per_100g.unwrap_or_default(),
            response.fat_per_100g.unwrap_or_default(),
        )
    });
    let normalized = normalize(&name, raw.as_ref())?;

    let parsed = parse_quantity(description);
    let conversion = if parsed.explicit {
        debug!(
            description,
            quantity = parsed.quantity,
            "User quantity overrides AI estimate"
        );
        convert_parsed(&parsed)
    } else {
        let ai_unit = response.unit.as_deref().and_then(parse_unit);
        match response.estimated_quantity {
            Some(quantity) => convert(quantity, &name, ai_unit),
            None => convert(DEFAULT_LEGACY_GRAMS, &name, Some(Unit::Grams)),
        }
    };

    let nutrition = scale(&normalized.profile, &conversion.portion);
    if let ProfileOrigin::Canonical(canonical) = normalized.origin {
        debug!(name = %name, canonical, "AI values replaced by canonical profile");
    }

    Some(
        RecognitionResult::new(&name, nutrition, Source::LegacyAi)
            .with_quantity(conversion.quantity, conversion.unit.display_name())
            .with_confidence(confidence_percent(response.confidence)),
    )
}
