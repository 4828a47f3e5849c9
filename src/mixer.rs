//! Effect transformation: what one ingredient does to a mix.
//!
//! Mixing an ingredient into a product:
//!
//! 1. adds the ingredient's base effect, unless the mix is already at the
//!    ruleset's effect capacity and the capacity policy forbids it;
//! 2. fires every replacement whose `replaces` effect was in the mix before
//!    the ingredient went in, swapping it for the `with` effect.
//!
//! Replacements react once per ingredient: they are matched against the
//! effects the mix had before this ingredient, never against effects another
//! replacement of the same ingredient has just produced. The base effect the
//! ingredient adds is therefore never consumed by its own replacements, and
//! the order rules are listed in does not matter.

use crate::error::{MixError, MixResult};
use crate::models::{CapacityPolicy, EffectSet, Ingredient, Replacement, Ruleset};

/// Effect capacity parameters of a ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub max_effects: usize,
    pub policy: CapacityPolicy,
}

impl Capacity {
    pub fn of(ruleset: &Ruleset) -> Self {
        Self {
            max_effects: ruleset.max_effects(),
            policy: ruleset.capacity_policy(),
        }
    }

    /// No limit on simultaneous effects.
    pub fn unbounded() -> Self {
        Self {
            max_effects: usize::MAX,
            policy: CapacityPolicy::Unbounded,
        }
    }

    fn admits_new_effect(&self, current: usize) -> bool {
        match self.policy {
            CapacityPolicy::Unbounded => true,
            CapacityPolicy::SkipBaseEffect => current < self.max_effects,
        }
    }
}

/// Returns the effects of `effects` after mixing in `ingredient`.
///
/// # Example
///
/// ```
/// use mixmax::mixer::{apply, Capacity};
/// use mixmax::models::{EffectSet, Ingredient, Replacement};
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
/// let before: EffectSet = ["Toxic"].into_iter().collect();
/// let after = apply(&before, &cuke, Capacity::unbounded());
/// assert_eq!(after, ["Energizing", "Euphoric"].into_iter().collect::<EffectSet>());
/// ```
pub fn apply(effects: &EffectSet, ingredient: &Ingredient, capacity: Capacity) -> EffectSet {
    let mut next = effects.clone();
    let base = ingredient.base_effect.as_str();

    if !effects.contains(base) && capacity.admits_new_effect(next.len()) {
        next.insert(base);
    }

    let fired: Vec<&Replacement> = ingredient
        .replacements
        .iter()
        .filter(|rule| effects.contains(&rule.replaces))
        .collect();
    for rule in &fired {
        next.remove(&rule.replaces);
    }
    for rule in &fired {
        next.insert(&rule.with);
    }

    next
}

/// Effects a mix starts from: the product's defaults, or nothing.
///
/// # Errors
///
/// Returns [`MixError::UnknownProduct`] for a product not in the ruleset.
pub fn start_effects(ruleset: &Ruleset, product: Option<&str>) -> MixResult<EffectSet> {
    match product {
        None => Ok(EffectSet::new()),
        Some(name) => ruleset
            .product(name)
            .map(|p| p.default_effects.clone())
            .ok_or_else(|| MixError::UnknownProduct {
                name: name.to_string(),
            }),
    }
}

/// Mixes a named sequence of ingredients, in order, into a product.
///
/// # Errors
///
/// Returns [`MixError::UnknownProduct`] or [`MixError::UnknownIngredient`]
/// for names the ruleset does not know.
///
/// # Example
///
/// ```
/// use mixmax::data::embedded_ruleset;
/// use mixmax::mixer::mix_sequence;
///
/// let ruleset = embedded_ruleset().unwrap();
/// let effects = mix_sequence(&ruleset, None, &["Cuke", "Banana"]).unwrap();
/// assert!(effects.contains("Gingeritis"));
/// ```
pub fn mix_sequence<S: AsRef<str>>(
    ruleset: &Ruleset,
    product: Option<&str>,
    sequence: &[S],
) -> MixResult<EffectSet> {
    let capacity = Capacity::of(ruleset);
    let mut effects = start_effects(ruleset, product)?;
    for name in sequence {
        let name = name.as_ref();
        let ingredient = ruleset
            .ingredient(name)
            .ok_or_else(|| MixError::UnknownIngredient {
                name: name.to_string(),
            })?;
        effects = apply(&effects, ingredient, capacity);
    }
    Ok(effects)
}
