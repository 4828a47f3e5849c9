//! WebAssembly bindings for mixmax.
//!
//! This module provides JavaScript-accessible functions for the recipe search.
//! Every function takes and returns JSON strings; failures are reported in the
//! payload (`success: false`) rather than thrown.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::data::embedded_ruleset;
use crate::error::MixResult;
use crate::mixer::mix_sequence;
use crate::models::{step_bound, Objective, Replacement, Ruleset, SearchRequest, SearchResult};
use crate::optimizer::search;

fn default_top() -> usize {
    10
}

/// JavaScript-friendly search input.
#[derive(Debug, Clone, Deserialize)]
pub struct JsSearchInput {
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(default)]
    pub objective: Objective,
    pub max_steps: i64,
    #[serde(default)]
    pub min_steps: i64,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub allow_partial: bool,
    #[serde(default = "default_top")]
    pub top: usize,
}

/// JavaScript-friendly search result.
#[derive(Debug, Clone, Serialize)]
pub struct JsSearchResult {
    pub sequence: Vec<String>,
    pub effects: Vec<String>,
    pub total_cost: f64,
    pub product: Option<String>,
    pub sell_price: f64,
    pub profit: f64,
    pub objective_value: f64,
    pub exact: bool,
}

impl From<&SearchResult> for JsSearchResult {
    fn from(result: &SearchResult) -> Self {
        JsSearchResult {
            sequence: result.sequence.clone(),
            effects: result.effects.iter().map(str::to_string).collect(),
            total_cost: result.total_cost,
            product: result.product.clone(),
            sell_price: result.sell_price,
            profit: result.profit,
            objective_value: result.objective_value,
            exact: result.exact,
        }
    }
}

/// JavaScript-friendly search output.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsSearchOutput {
    pub success: bool,
    pub error: Option<String>,
    pub ruleset_version: String,
    pub results: Vec<JsSearchResult>,
    pub total_results: usize,
    pub states_explored: u64,
    pub elapsed_ms: f64,
}

/// JavaScript-friendly forward mix input.
#[derive(Debug, Clone, Deserialize)]
pub struct JsMixInput {
    #[serde(default)]
    pub product: Option<String>,
    pub sequence: Vec<String>,
}

/// JavaScript-friendly forward mix output.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsMixOutput {
    pub success: bool,
    pub error: Option<String>,
    pub effects: Vec<String>,
    pub total_cost: f64,
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
fn report_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn report_error(message: &str) {
    tracing::warn!(error = message, "Rejected request");
}

fn build_request(input: JsSearchInput) -> MixResult<SearchRequest> {
    let max_steps = step_bound(input.max_steps)?;
    let mut request = SearchRequest::new(input.effects, input.objective, max_steps)
        .with_min_steps(step_bound(input.min_steps)?)
        .with_partial_matches(input.allow_partial);
    if let Some(product) = input.product.filter(|p| !p.is_empty()) {
        request = request.with_product(product);
    }
    if let Some(allowed) = input.ingredients {
        request = request.with_allowed_ingredients(allowed);
    }
    Ok(request)
}

fn run_search(ruleset: &Ruleset, input: JsSearchInput) -> MixResult<JsSearchOutput> {
    let top = input.top;
    let request = build_request(input)?;
    let started = now_ms();
    let ranking = search(ruleset, &request)?;
    Ok(JsSearchOutput {
        success: true,
        error: None,
        ruleset_version: ruleset.version().to_string(),
        results: ranking.top(top).map(JsSearchResult::from).collect(),
        total_results: ranking.len(),
        states_explored: ranking.stats().states_explored,
        elapsed_ms: now_ms() - started,
    })
}

/// Main search function callable from JavaScript.
///
/// Takes a JSON string with the search options and returns a JSON string
/// with the ranked recipes. An empty `results` list with `success: true`
/// means no recipe reaches the target within `max_steps`.
#[wasm_bindgen]
pub fn find_recipes(input_json: &str) -> String {
    let output = serde_json::from_str::<JsSearchInput>(input_json)
        .map_err(|e| format!("Invalid input: {}", e))
        .and_then(|input| {
            let ruleset = embedded_ruleset().map_err(|e| e.to_string())?;
            run_search(&ruleset, input).map_err(|e| e.to_string())
        });

    let output = output.unwrap_or_else(|message| {
        report_error(&message);
        JsSearchOutput {
            success: false,
            error: Some(message),
            ..Default::default()
        }
    });
    serde_json::to_string(&output).unwrap_or_default()
}

/// Computes the effects of an explicit ingredient sequence.
#[wasm_bindgen]
pub fn mix(input_json: &str) -> String {
    let output = serde_json::from_str::<JsMixInput>(input_json)
        .map_err(|e| format!("Invalid input: {}", e))
        .and_then(|input| {
            let ruleset = embedded_ruleset().map_err(|e| e.to_string())?;
            let effects = mix_sequence(&ruleset, input.product.as_deref(), &input.sequence)
                .map_err(|e| e.to_string())?;
            let total_cost: f64 = input
                .sequence
                .iter()
                .filter_map(|name| ruleset.ingredient(name))
                .map(|i| i.cost)
                .sum();
            Ok(JsMixOutput {
                success: true,
                error: None,
                effects: effects.iter().map(str::to_string).collect(),
                total_cost,
            })
        });

    let output = output.unwrap_or_else(|message| {
        report_error(&message);
        JsMixOutput {
            success: false,
            error: Some(message),
            ..Default::default()
        }
    });
    serde_json::to_string(&output).unwrap_or_default()
}

/// Get the version of the tool.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the effect vocabulary with price multipliers.
/// Returns a JSON array of `{ name, multiplier }`, sorted by name.
#[wasm_bindgen]
pub fn get_effects() -> String {
    #[derive(Serialize)]
    struct EffectInfo<'a> {
        name: &'a str,
        multiplier: f64,
    }

    match embedded_ruleset() {
        Ok(ruleset) => {
            let effects: Vec<EffectInfo> = ruleset
                .effects()
                .iter()
                .map(|(name, &multiplier)| EffectInfo {
                    name: name.as_str(),
                    multiplier,
                })
                .collect();
            serde_json::to_string(&effects).unwrap_or_default()
        }
        Err(e) => {
            report_error(&e.to_string());
            "[]".to_string()
        }
    }
}

/// Get the ingredients and products of the embedded ruleset.
/// Returns a JSON object `{ version, ingredients, products }`; each ingredient
/// carries its base effect and its `{ replaces, with }` rules.
#[wasm_bindgen]
pub fn get_rule_data() -> String {
    #[derive(Serialize)]
    struct IngredientInfo<'a> {
        name: &'a str,
        cost: f64,
        base_effect: &'a str,
        replacements: &'a [Replacement],
    }

    #[derive(Serialize)]
    struct ProductInfo<'a> {
        name: &'a str,
        base_price: f64,
        default_effects: Vec<&'a str>,
    }

    #[derive(Serialize)]
    struct RuleData<'a> {
        version: &'a str,
        ingredients: Vec<IngredientInfo<'a>>,
        products: Vec<ProductInfo<'a>>,
    }

    match embedded_ruleset() {
        Ok(ruleset) => {
            let data = RuleData {
                version: ruleset.version(),
                ingredients: ruleset
                    .ingredients()
                    .iter()
                    .map(|i| IngredientInfo {
                        name: &i.name,
                        cost: i.cost,
                        base_effect: &i.base_effect,
                        replacements: &i.replacements,
                    })
                    .collect(),
                products: ruleset
                    .products()
                    .iter()
                    .map(|p| ProductInfo {
                        name: &p.name,
                        base_price: p.base_price,
                        default_effects: p.default_effects.iter().collect(),
                    })
                    .collect(),
            };
            serde_json::to_string(&data).unwrap_or_default()
        }
        Err(e) => {
            report_error(&e.to_string());
            "{}".to_string()
        }
    }
}
