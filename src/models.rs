//! Data models and structures for mixmax.
//!
//! This module contains the rule data (ingredients, effects, products), the
//! effect sets produced by mixing, and the request/result types exchanged
//! with the search engine.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MixError, MixResult};

/// An unordered set of effect names.
///
/// Backed by a sorted set so that iteration, display and hashing are
/// deterministic. Mixing never edits a set in place; every application of
/// an ingredient produces a new one.
///
/// # Example
///
/// ```
/// use mixmax::models::EffectSet;
///
/// let effects: EffectSet = ["Energizing", "Calming"].into_iter().collect();
/// assert_eq!(effects.len(), 2);
/// assert_eq!(effects.to_string(), "Calming, Energizing");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectSet(BTreeSet<String>);

impl EffectSet {
    /// Creates an empty effect set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, effect: &str) -> bool {
        self.0.contains(effect)
    }

    /// Iterates effect names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of effects of `other` that are also present in `self`.
    pub fn overlap(&self, other: &EffectSet) -> usize {
        other.iter().filter(|e| self.contains(e)).count()
    }

    /// Returns `true` if every effect of `other` is present in `self`.
    pub fn covers(&self, other: &EffectSet) -> bool {
        self.0.is_superset(&other.0)
    }

    pub(crate) fn insert(&mut self, effect: &str) -> bool {
        self.0.insert(effect.to_string())
    }

    pub(crate) fn remove(&mut self, effect: &str) -> bool {
        self.0.remove(effect)
    }
}

impl<S: Into<String>> FromIterator<S> for EffectSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a EffectSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for EffectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(none)");
        }
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{}", names.join(", "))
    }
}

/// One `replaces -> with` rule of an ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Effect that must be present for the rule to fire
    pub replaces: String,
    /// Effect that takes its place
    pub with: String,
}

/// An ingredient that can be mixed into a product.
///
/// The transformation rule is data: the effect the ingredient always
/// contributes plus an ordered list of replacements.
///
/// # Example
///
/// ```
/// use mixmax::models::{Ingredient, Replacement};
///
/// let cuke = Ingredient {
///     name: "Cuke".to_string(),
///     cost: 2.0,
///     base_effect: "Energizing".to_string(),
///     replacements: vec![Replacement {
///         replaces: "Toxic".to_string(),
///         with: "Euphoric".to_string(),
///     }],
/// };
/// assert_eq!(cuke.cost, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// The name of the ingredient (e.g., "Cuke", "Mega Bean")
    pub name: String,
    /// Purchase price of one unit
    pub cost: f64,
    /// Effect added by the ingredient itself
    pub base_effect: String,
    /// Replacement rules, at most one per `replaces` effect
    pub replacements: Vec<Replacement>,
}

/// A base product that ingredients are mixed into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product name (e.g., "OG Kush", "Meth")
    pub name: String,
    /// Sell price with no effect multipliers applied
    pub base_price: f64,
    /// Effects the product carries before any mixing
    pub default_effects: EffectSet,
}

/// What happens when an ingredient's base effect would exceed the
/// ruleset's effect capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// The capacity is not enforced.
    Unbounded,
    /// A full set does not gain the base effect; replacements still apply.
    #[default]
    SkipBaseEffect,
}

/// Ruleset-wide parameters, read from `ruleset.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesetMeta {
    /// Game version the tables were taken from
    pub version: String,
    /// Maximum number of simultaneous effects
    pub max_effects: usize,
    /// Policy applied when `max_effects` is reached
    #[serde(default)]
    pub capacity_policy: CapacityPolicy,
}

/// The complete, validated rule data of one game version.
///
/// A `Ruleset` is immutable once built; swapping game versions means
/// loading a different set of tables.
#[derive(Debug, Clone)]
pub struct Ruleset {
    meta: RulesetMeta,
    ingredients: Vec<Ingredient>,
    effects: BTreeMap<String, f64>,
    products: Vec<Product>,
}

impl Ruleset {
    /// Validates and assembles rule tables into a ruleset.
    ///
    /// Ingredients are stored sorted by name so that enumeration order is
    /// lexical regardless of the order of the source tables.
    ///
    /// # Errors
    ///
    /// Returns [`MixError::InvalidRuleData`] if a name is duplicated, a cost,
    /// price or multiplier is negative or not finite, a rule references an
    /// unknown effect, an ingredient has two rules for the same effect, or the
    /// effect capacity is zero.
    pub fn new(
        meta: RulesetMeta,
        mut ingredients: Vec<Ingredient>,
        effects: Vec<(String, f64)>,
        products: Vec<Product>,
    ) -> MixResult<Self> {
        if meta.max_effects == 0 {
            return Err(MixError::rule_data("max_effects must be at least 1"));
        }

        let mut effect_map = BTreeMap::new();
        for (name, multiplier) in effects {
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(MixError::rule_data(format!(
                    "effect '{}' has invalid multiplier {}",
                    name, multiplier
                )));
            }
            if effect_map.insert(name.clone(), multiplier).is_some() {
                return Err(MixError::rule_data(format!("duplicate effect '{}'", name)));
            }
        }

        let known = |effect: &str, owner: &str| -> MixResult<()> {
            if effect_map.contains_key(effect) {
                Ok(())
            } else {
                Err(MixError::rule_data(format!(
                    "'{}' references unknown effect '{}'",
                    owner, effect
                )))
            }
        };

        let mut seen = HashSet::new();
        for ingredient in &ingredients {
            if !seen.insert(ingredient.name.as_str()) {
                return Err(MixError::rule_data(format!(
                    "duplicate ingredient '{}'",
                    ingredient.name
                )));
            }
            if !ingredient.cost.is_finite() || ingredient.cost < 0.0 {
                return Err(MixError::rule_data(format!(
                    "ingredient '{}' has invalid cost {}",
                    ingredient.name, ingredient.cost
                )));
            }
            known(ingredient.base_effect.as_str(), ingredient.name.as_str())?;
            let mut consumed = HashSet::new();
            for rule in &ingredient.replacements {
                if !consumed.insert(rule.replaces.as_str()) {
                    return Err(MixError::rule_data(format!(
                        "ingredient '{}' has more than one rule for '{}'",
                        ingredient.name, rule.replaces
                    )));
                }
                known(rule.replaces.as_str(), ingredient.name.as_str())?;
                known(rule.with.as_str(), ingredient.name.as_str())?;
            }
        }

        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.name.as_str()) {
                return Err(MixError::rule_data(format!(
                    "duplicate product '{}'",
                    product.name
                )));
            }
            if !product.base_price.is_finite() || product.base_price < 0.0 {
                return Err(MixError::rule_data(format!(
                    "product '{}' has invalid base price {}",
                    product.name, product.base_price
                )));
            }
            if product.default_effects.len() > meta.max_effects {
                return Err(MixError::rule_data(format!(
                    "product '{}' starts with more than {} effects",
                    product.name, meta.max_effects
                )));
            }
            for effect in &product.default_effects {
                known(effect.as_str(), product.name.as_str())?;
            }
        }

        ingredients.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            meta,
            ingredients,
            effects: effect_map,
            products,
        })
    }

    pub fn version(&self) -> &str {
        &self.meta.version
    }

    pub fn max_effects(&self) -> usize {
        self.meta.max_effects
    }

    pub fn capacity_policy(&self) -> CapacityPolicy {
        self.meta.capacity_policy
    }

    /// All ingredients, sorted by name.
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.name == name)
    }

    /// Effect names mapped to their sell price multipliers.
    pub fn effects(&self) -> &BTreeMap<String, f64> {
        &self.effects
    }

    pub fn knows_effect(&self, effect: &str) -> bool {
        self.effects.contains_key(effect)
    }

    /// Products in table order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Sell price of `product` carrying `effects`.
    ///
    /// The price is `base_price * (1 + sum of effect multipliers)`.
    pub fn sell_price(&self, product: &Product, effects: &EffectSet) -> f64 {
        let multiplier: f64 = effects
            .iter()
            .filter_map(|e| self.effects.get(e))
            .sum();
        product.base_price * (1.0 + multiplier)
    }

    /// The product that sells highest with `effects`, with its price.
    ///
    /// Ties go to the product listed first. Returns `None` for a ruleset
    /// without products.
    pub fn best_product(&self, effects: &EffectSet) -> Option<(&Product, f64)> {
        let mut best: Option<(&Product, f64)> = None;
        for product in &self.products {
            let price = self.sell_price(product, effects);
            match best {
                Some((_, best_price)) if price <= best_price => {}
                _ => best = Some((product, price)),
            }
        }
        best
    }
}

/// Optimization criterion used to rank candidate sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Cheapest total ingredient cost first
    #[default]
    Cost,
    /// Highest sell price minus ingredient cost first
    Profit,
}

impl FromStr for Objective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cost" | "cost-minimize" => Ok(Self::Cost),
            "profit" | "profit-maximize" => Ok(Self::Profit),
            other => Err(format!(
                "unknown objective '{}' (expected 'cost' or 'profit')",
                other
            )),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cost => write!(f, "cost"),
            Self::Profit => write!(f, "profit"),
        }
    }
}

/// Converts a caller-supplied step count into a search bound.
///
/// # Errors
///
/// Returns [`MixError::InvalidBound`] for negative values.
///
/// # Example
///
/// ```
/// use mixmax::models::step_bound;
///
/// assert_eq!(step_bound(4).unwrap(), 4);
/// assert!(step_bound(-1).is_err());
/// ```
pub fn step_bound(value: i64) -> MixResult<usize> {
    usize::try_from(value)
        .map_err(|_| MixError::bound(format!("step count must not be negative, got {}", value)))
}

/// What the caller is looking for.
///
/// Built with [`SearchRequest::new`] and refined with the `with_*` methods.
///
/// # Example
///
/// ```
/// use mixmax::models::{Objective, SearchRequest};
///
/// let request = SearchRequest::new(["Energizing"], Objective::Profit, 3)
///     .with_product("OG Kush")
///     .with_min_steps(1);
/// assert_eq!(request.max_steps, 3);
/// assert_eq!(request.product.as_deref(), Some("OG Kush"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Effects the mix must carry
    pub target: EffectSet,
    /// Ranking criterion
    pub objective: Objective,
    /// Maximum number of ingredients in a sequence
    pub max_steps: usize,
    /// Minimum number of ingredients in a sequence
    pub min_steps: usize,
    /// Product to mix into; `None` starts from no effects and prices each
    /// result against its most valuable product
    pub product: Option<String>,
    /// Ingredients the search may use; `None` allows all of them
    pub allowed_ingredients: Option<Vec<String>>,
    /// Fall back to the closest partial matches when nothing covers the target
    pub allow_partial: bool,
}

impl SearchRequest {
    pub fn new<I, S>(target: I, objective: Objective, max_steps: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target: target.into_iter().collect(),
            objective,
            max_steps,
            min_steps: 0,
            product: None,
            allowed_ingredients: None,
            allow_partial: false,
        }
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_min_steps(mut self, min_steps: usize) -> Self {
        self.min_steps = min_steps;
        self
    }

    pub fn with_allowed_ingredients<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_ingredients = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_partial_matches(mut self, allow_partial: bool) -> Self {
        self.allow_partial = allow_partial;
        self
    }
}

/// One ranked candidate: a sequence and what it produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Ingredient names in mixing order
    pub sequence: Vec<String>,
    /// Effects after the last ingredient
    pub effects: EffectSet,
    /// Sum of ingredient costs
    pub total_cost: f64,
    /// Product the price was computed for
    pub product: Option<String>,
    /// Sell price of the mixed product
    pub sell_price: f64,
    /// `sell_price - total_cost`
    pub profit: f64,
    /// `total_cost` when minimizing cost, `profit` when maximizing profit
    pub objective_value: f64,
    /// Number of target effects present
    pub matched: usize,
    /// Whether every target effect is present
    pub exact: bool,
}

impl SearchResult {
    /// Number of mixing steps.
    pub fn steps(&self) -> usize {
        self.sequence.len()
    }
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Ingredient applications performed
    pub states_explored: u64,
    /// Distinct effect sets reached, across all depths
    pub distinct_states: usize,
    /// Deepest layer expanded
    pub depth_reached: usize,
}

/// Progress snapshot handed to a progress callback after each depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProgress {
    /// Depth just completed
    pub depth: usize,
    /// Requested maximum depth
    pub max_depth: usize,
    /// Ingredient applications so far
    pub states_explored: u64,
    /// Distinct effect sets at this depth
    pub frontier: usize,
}

/// Ranked search results, best first.
///
/// The ranking is finite and can be iterated any number of times; callers
/// wanting only the best few use [`Ranking::top`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    results: Vec<SearchResult>,
    stats: SearchStats,
}

impl Ranking {
    pub fn new(results: Vec<SearchResult>, stats: SearchStats) -> Self {
        Self { results, stats }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// An empty ranking means no sequence within the bound fits the target.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn best(&self) -> Option<&SearchResult> {
        self.results.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }

    /// The `k` best results.
    pub fn top(&self, k: usize) -> impl Iterator<Item = &SearchResult> {
        self.results.iter().take(k)
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl IntoIterator for Ranking {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

// ============================================================================
// CSV Row Structures
// ============================================================================

/// CSV row structure for `ingredients.csv`.
#[derive(Debug, Deserialize)]
pub struct IngredientRow {
    /// Ingredient name
    pub name: String,
    /// Purchase price
    pub cost: f64,
    /// Effect the ingredient adds
    pub base_effect: String,
}

/// CSV row structure for `replacements.csv`.
#[derive(Debug, Deserialize)]
pub struct ReplacementRow {
    /// Ingredient owning the rule
    pub ingredient: String,
    /// Effect being replaced
    pub replaces: String,
    /// Effect replacing it
    pub with: String,
}

/// CSV row structure for `effects.csv`.
#[derive(Debug, Deserialize)]
pub struct EffectRow {
    /// Effect name
    pub name: String,
    /// Sell price multiplier contribution
    pub multiplier: f64,
}

/// CSV row structure for `products.csv`.
#[derive(Debug, Deserialize)]
pub struct ProductRow {
    /// Product name
    pub name: String,
    /// Unmixed sell price
    pub base_price: f64,
    /// Semicolon-separated default effects (may be empty)
    pub default_effects: Option<String>,
}
