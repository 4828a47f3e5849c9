//! Reverse recipe search.
//!
//! This module enumerates ingredient sequences up to a step bound, mixes
//! each one with [`crate::mixer::apply`], and ranks the effect sets that
//! satisfy the caller's target.
//!
//! Enumeration is breadth-first by sequence length. What happens after a
//! prefix depends only on the effects it produced, and every ranking
//! criterion prefers the cheaper, then lexically smaller, of two equally
//! long prefixes reaching the same effects. Each depth therefore keeps only
//! the best prefix per effect set, which returns the same ranking as
//! expanding every sequence without paying for all of them.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use crate::error::{MixError, MixResult};
use crate::mixer::{apply, Capacity};
use crate::models::{
    EffectSet, Ingredient, Objective, Product, Ranking, Ruleset, SearchProgress, SearchRequest,
    SearchResult, SearchStats,
};

/// Step bounds above this are searched but logged as expensive.
pub const LARGE_STEP_BOUND: usize = 8;

/// Best known prefix for one effect set.
#[derive(Debug, Clone)]
struct Candidate {
    cost: f64,
    /// Indices into the allowed ingredient list, which is sorted by name.
    path: Vec<usize>,
}

impl Candidate {
    fn root() -> Self {
        Self {
            cost: 0.0,
            path: Vec::new(),
        }
    }

    fn extend(&self, index: usize, ingredient: &Ingredient) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(index);
        Self {
            cost: self.cost + ingredient.cost,
            path,
        }
    }

    /// Cheaper first, then shorter, then lexically smaller.
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.path.len().cmp(&other.path.len()))
            .then_with(|| self.path.cmp(&other.path))
    }
}

/// Records `candidate` for `effects` if it beats the current holder.
fn offer(best: &mut BTreeMap<EffectSet, Candidate>, effects: EffectSet, candidate: Candidate) {
    match best.entry(effects) {
        Entry::Vacant(slot) => {
            slot.insert(candidate);
        }
        Entry::Occupied(mut slot) => {
            if candidate.cmp_key(slot.get()) == Ordering::Less {
                slot.insert(candidate);
            }
        }
    }
}

/// Checks the request against the ruleset before any work is done.
fn validate_request<'r>(
    ruleset: &'r Ruleset,
    request: &SearchRequest,
) -> MixResult<(Option<&'r Product>, Vec<&'r Ingredient>)> {
    if let Some(effect) = request.target.iter().find(|e| !ruleset.knows_effect(e)) {
        return Err(MixError::InvalidTarget {
            effect: effect.to_string(),
        });
    }

    if request.min_steps > request.max_steps {
        return Err(MixError::InvalidBound {
            message: format!(
                "minimum steps ({}) exceed maximum steps ({})",
                request.min_steps, request.max_steps
            ),
        });
    }

    let product = match request.product.as_deref() {
        Some(name) => Some(ruleset.product(name).ok_or_else(|| MixError::UnknownProduct {
            name: name.to_string(),
        })?),
        None => None,
    };

    let ingredients: Vec<&Ingredient> = match &request.allowed_ingredients {
        None => ruleset.ingredients().iter().collect(),
        Some(names) => {
            if let Some(unknown) = names.iter().find(|n| ruleset.ingredient(n).is_none()) {
                return Err(MixError::UnknownIngredient {
                    name: unknown.clone(),
                });
            }
            ruleset
                .ingredients()
                .iter()
                .filter(|i| names.contains(&i.name))
                .collect()
        }
    };

    Ok((product, ingredients))
}

/// Compares two results under `objective`, best first.
///
/// Exact matches come before partial ones, partial matches with more target
/// effects before fewer. Then the objective decides, then the shorter
/// sequence, then the lexically smaller one.
pub fn compare_results(a: &SearchResult, b: &SearchResult, objective: Objective) -> Ordering {
    b.exact
        .cmp(&a.exact)
        .then_with(|| b.matched.cmp(&a.matched))
        .then_with(|| match objective {
            Objective::Cost => a.total_cost.total_cmp(&b.total_cost),
            Objective::Profit => b.profit.total_cmp(&a.profit),
        })
        .then_with(|| a.steps().cmp(&b.steps()))
        .then_with(|| a.sequence.cmp(&b.sequence))
}

/// Sorts results best first. The sort is stable, so ranking an already
/// ranked list leaves it unchanged.
pub fn rank(results: &mut [SearchResult], objective: Objective) {
    results.sort_by(|a, b| compare_results(a, b, objective));
}

fn score(
    ruleset: &Ruleset,
    request: &SearchRequest,
    product: Option<&Product>,
    ingredients: &[&Ingredient],
    effects: EffectSet,
    candidate: Candidate,
) -> SearchResult {
    let sequence: Vec<String> = candidate
        .path
        .iter()
        .map(|&i| ingredients[i].name.clone())
        .collect();

    let (product_name, sell_price) = match product {
        Some(p) => (Some(p.name.clone()), ruleset.sell_price(p, &effects)),
        None => ruleset
            .best_product(&effects)
            .map(|(p, price)| (Some(p.name.clone()), price))
            .unwrap_or((None, 0.0)),
    };
    let profit = sell_price - candidate.cost;
    let matched = effects.overlap(&request.target);

    SearchResult {
        sequence,
        exact: matched == request.target.len(),
        matched,
        total_cost: candidate.cost,
        product: product_name,
        sell_price,
        profit,
        objective_value: match request.objective {
            Objective::Cost => candidate.cost,
            Objective::Profit => profit,
        },
        effects,
    }
}

/// Searches for the ingredient sequences that best produce the target.
///
/// Returns every distinct effect set that covers the target, each with the
/// best sequence reaching it, ranked by the request's objective. When no
/// sequence covers the target and `allow_partial` is set, the effect sets
/// sharing the most effects with the target are returned instead. An empty
/// ranking means the target is out of reach within `max_steps`.
///
/// # Errors
///
/// - [`MixError::InvalidTarget`] if the target names an unknown effect
/// - [`MixError::InvalidBound`] if `min_steps > max_steps`
/// - [`MixError::UnknownProduct`] / [`MixError::UnknownIngredient`] for
///   names the ruleset does not know
///
/// # Example
///
/// ```
/// use mixmax::data::embedded_ruleset;
/// use mixmax::models::{Objective, SearchRequest};
/// use mixmax::optimizer::search;
///
/// let ruleset = embedded_ruleset().unwrap();
/// let request = SearchRequest::new(["Energizing"], Objective::Cost, 1);
/// let ranking = search(&ruleset, &request).unwrap();
/// assert_eq!(ranking.best().unwrap().sequence, vec!["Cuke".to_string()]);
/// ```
pub fn search(ruleset: &Ruleset, request: &SearchRequest) -> MixResult<Ranking> {
    search_with_progress(ruleset, request, |_| {})
}

/// Like [`search`], calling `on_progress` once per completed depth.
pub fn search_with_progress<F>(
    ruleset: &Ruleset,
    request: &SearchRequest,
    mut on_progress: F,
) -> MixResult<Ranking>
where
    F: FnMut(&SearchProgress),
{
    let (product, ingredients) = validate_request(ruleset, request)?;
    let capacity = Capacity::of(ruleset);

    if request.max_steps > LARGE_STEP_BOUND {
        warn!(
            max_steps = request.max_steps,
            "Large step bound, search may take a while"
        );
    }

    let start = product
        .map(|p| p.default_effects.clone())
        .unwrap_or_default();

    let mut stats = SearchStats::default();
    let mut visited: HashSet<EffectSet> = HashSet::new();
    let mut best: BTreeMap<EffectSet, Candidate> = BTreeMap::new();
    let mut layer: BTreeMap<EffectSet, Candidate> = BTreeMap::new();
    layer.insert(start, Candidate::root());

    for depth in 0..=request.max_steps {
        visited.extend(layer.keys().cloned());
        if depth >= request.min_steps {
            for (effects, candidate) in &layer {
                offer(&mut best, effects.clone(), candidate.clone());
            }
        }

        stats.depth_reached = depth;
        let progress = SearchProgress {
            depth,
            max_depth: request.max_steps,
            states_explored: stats.states_explored,
            frontier: layer.len(),
        };
        debug!(
            depth,
            frontier = progress.frontier,
            states_explored = progress.states_explored,
            "Depth complete"
        );
        on_progress(&progress);

        if depth == request.max_steps || ingredients.is_empty() {
            break;
        }

        let mut next: BTreeMap<EffectSet, Candidate> = BTreeMap::new();
        for (effects, candidate) in &layer {
            for (index, ingredient) in ingredients.iter().enumerate() {
                let mixed = apply(effects, ingredient, capacity);
                stats.states_explored += 1;
                offer(&mut next, mixed, candidate.extend(index, ingredient));
            }
        }
        layer = next;
    }
    stats.distinct_states = visited.len();

    let scored: Vec<SearchResult> = best
        .into_iter()
        .map(|(effects, candidate)| {
            score(ruleset, request, product, &ingredients, effects, candidate)
        })
        .collect();

    let mut results: Vec<SearchResult> = if scored.iter().any(|r| r.exact) {
        scored.into_iter().filter(|r| r.exact).collect()
    } else if request.allow_partial {
        let closest = scored.iter().map(|r| r.matched).max().unwrap_or(0);
        if closest == 0 {
            Vec::new()
        } else {
            scored.into_iter().filter(|r| r.matched == closest).collect()
        }
    } else {
        Vec::new()
    };
    rank(&mut results, request.objective);

    info!(
        results = results.len(),
        states_explored = stats.states_explored,
        distinct_states = stats.distinct_states,
        objective = %request.objective,
        "Search complete"
    );

    Ok(Ranking::new(results, stats))
}
