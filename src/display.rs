//! Display and formatting utilities for mixmax.
//!
//! This module provides functions for formatting output and displaying
//! search results to the user in a readable format.

use crate::models::{Ranking, Replacement, Ruleset, SearchRequest, SearchResult};

/// Factor of the in-game 1.6x pricing rule.
pub const MARKUP: f64 = 1.6;

/// Formats an amount of money with two decimals.
///
/// # Example
///
/// ```
/// use mixmax::display::format_money;
///
/// assert_eq!(format_money(7.0), "$7.00");
/// assert_eq!(format_money(-3.5), "-$3.50");
/// ```
pub fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${:.2}", value)
    }
}

/// Formats an ingredient sequence as `A -> B -> C`.
///
/// An empty sequence is the unmixed product.
///
/// # Example
///
/// ```
/// use mixmax::display::format_sequence;
///
/// let seq = vec!["Cuke".to_string(), "Banana".to_string()];
/// assert_eq!(format_sequence(&seq), "Cuke -> Banana");
/// assert_eq!(format_sequence(&[]), "(no mixing)");
/// ```
pub fn format_sequence(sequence: &[String]) -> String {
    if sequence.is_empty() {
        "(no mixing)".to_string()
    } else {
        sequence.join(" -> ")
    }
}

/// Formats an ingredient's replacement rules as `A -> B, C -> D`.
///
/// # Example
///
/// ```
/// use mixmax::display::format_replacements;
/// use mixmax::models::Replacement;
///
/// let rules = vec![Replacement {
///     replaces: "Toxic".to_string(),
///     with: "Euphoric".to_string(),
/// }];
/// assert_eq!(format_replacements(&rules), "Toxic -> Euphoric");
/// assert_eq!(format_replacements(&[]), "(none)");
/// ```
pub fn format_replacements(rules: &[Replacement]) -> String {
    if rules.is_empty() {
        return "(none)".to_string();
    }
    rules
        .iter()
        .map(|r| format!("{} -> {}", r.replaces, r.with))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Applies the 1.6x pricing rule, truncated to whole dollars.
pub fn with_markup(value: f64) -> f64 {
    (value * MARKUP).trunc()
}

/// Displays the search results to stdout.
///
/// This function prints:
/// - The recipe of the best result, step by step with prices
/// - Its effects and the price it fetches on every product
/// - A ranked list of the `top` best candidates
pub fn display_results(ranking: &Ranking, ruleset: &Ruleset, request: &SearchRequest, top: usize) {
    println!();
    println!("+================================================================+");
    println!("|              SCHEDULE I REVERSE RECIPE SEARCH                  |");
    println!("+================================================================+");
    println!();

    let Some(best) = ranking.best() else {
        display_no_solution(request);
        return;
    };

    if !best.exact {
        println!("[PARTIAL MATCH] No recipe produces every requested effect.");
        println!(
            "  Closest recipes give {} of {} effects.",
            best.matched,
            request.target.len()
        );
        println!();
    }

    display_recipe(best, ruleset);

    println!();
    println!("[ALL CANDIDATES RANKED] (by {})", request.objective);
    println!("----------------------------------------------------------------");
    println!(
        "{:<4} {:>10} {:>10} {:>6}  {}",
        "#", "Cost", "Profit", "Steps", "Recipe"
    );
    println!("----------------------------------------------------------------");
    for (i, result) in ranking.top(top).enumerate() {
        println!(
            "{:<4} {:>10} {:>10} {:>6}  {}",
            i + 1,
            format_money(result.total_cost),
            format_money(result.profit),
            result.steps(),
            format_sequence(&result.sequence)
        );
    }
    if ranking.len() > top {
        println!("  ... and {} more", ranking.len() - top);
    }

    let stats = ranking.stats();
    println!();
    println!(
        "Explored {} mixes ({} distinct effect sets, depth {}).",
        stats.states_explored, stats.distinct_states, stats.depth_reached
    );
    println!();
}

fn display_recipe(result: &SearchResult, ruleset: &Ruleset) {
    println!("[BEST RECIPE]");
    println!("----------------------------------------------------------------");
    if result.sequence.is_empty() {
        println!("  No mixing needed.");
    }
    for (i, name) in result.sequence.iter().enumerate() {
        let Some(ingredient) = ruleset.ingredient(name) else {
            println!("  Step {}: {}", i + 1, name);
            continue;
        };
        println!("  Step {}: {} ({})", i + 1, name, format_money(ingredient.cost));
        println!("          Base effect:  {}", ingredient.base_effect);
        println!(
            "          Replaces:     {}",
            format_replacements(&ingredient.replacements)
        );
    }

    println!();
    println!("[SUMMARY]");
    println!("----------------------------------------------------------------");
    println!("  Ingredient Cost:  {}", format_money(result.total_cost));
    println!("  Final Effects:    {}", result.effects);
    if let Some(ref product) = result.product {
        println!("  Best Product:     {}", product);
        println!("  Sell Price:       {}", format_money(result.sell_price));
        println!("  Profit:           {}", format_money(result.profit));
        println!("  1.6x Sell Price:  {}", format_money(with_markup(result.sell_price)));
        println!("  1.6x Profit:      {}", format_money(with_markup(result.profit)));
    }

    if !ruleset.products().is_empty() {
        println!();
        println!("[PRICE PER PRODUCT]");
        println!("----------------------------------------------------------------");
        println!(
            "{:<22} {:>12} {:>12} {:>12} {:>12}",
            "Product", "Sell Price", "Profit", "1.6x Price", "1.6x Profit"
        );
        for product in ruleset.products() {
            let price = ruleset.sell_price(product, &result.effects);
            let profit = price - result.total_cost;
            println!(
                "{:<22} {:>12} {:>12} {:>12} {:>12}",
                product.name,
                format_money(price),
                format_money(profit),
                format_money(with_markup(price)),
                format_money(with_markup(profit))
            );
        }
    }
}

/// Explains an empty ranking.
pub fn display_no_solution(request: &SearchRequest) {
    println!(
        "[WARNING] No recipe within {} steps produces: {}",
        request.max_steps, request.target
    );
    println!("Try increasing the maximum number of steps or allowing partial matches.");
    if request.product.is_none() {
        println!("Starting from a base product's default effects may also help.");
    }
}

/// Lists every effect of the ruleset with its price multiplier.
pub fn display_effects(ruleset: &Ruleset) {
    println!("Effects in ruleset {}:", ruleset.version());
    println!("----------------------------------------------------------------");
    println!("{:<22} {:>12}", "Effect", "Multiplier");
    for (name, multiplier) in ruleset.effects() {
        println!("{:<22} {:>12.2}", name, multiplier);
    }
}
