//! Rule data loading for mixmax.
//!
//! A ruleset is stored as one JSON file of ruleset-wide parameters and four
//! CSV tables in the `data/` directory. The same tables are compiled into the
//! library so that [`embedded_ruleset`] works without any files on disk.

use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{MixError, MixResult};
use crate::models::{
    EffectRow, EffectSet, Ingredient, IngredientRow, Product, ProductRow, Replacement,
    ReplacementRow, Ruleset, RulesetMeta,
};

pub const RULESET_FILE: &str = "ruleset.json";
pub const INGREDIENTS_FILE: &str = "ingredients.csv";
pub const REPLACEMENTS_FILE: &str = "replacements.csv";
pub const EFFECTS_FILE: &str = "effects.csv";
pub const PRODUCTS_FILE: &str = "products.csv";

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader)
}

/// Parses a semicolon-separated effect list (e.g., "Calming;Sneaky").
///
/// Blank entries are ignored, so an empty string yields an empty set.
fn parse_effect_list(s: &str) -> EffectSet {
    s.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Reads ruleset-wide parameters from JSON.
pub fn read_meta<R: Read>(reader: R) -> MixResult<RulesetMeta> {
    Ok(serde_json::from_reader(reader)?)
}

/// Reads ingredient rows.
///
/// # CSV Format
///
/// Expected columns: `name, cost, base_effect`
pub fn read_ingredients<R: Read>(reader: R) -> MixResult<Vec<IngredientRow>> {
    let mut rdr = csv_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: IngredientRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Reads replacement rows. Rows keep their file order within each ingredient.
///
/// # CSV Format
///
/// Expected columns: `ingredient, replaces, with`
pub fn read_replacements<R: Read>(reader: R) -> MixResult<Vec<ReplacementRow>> {
    let mut rdr = csv_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: ReplacementRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Reads effect multipliers.
///
/// # CSV Format
///
/// Expected columns: `name, multiplier`
pub fn read_effects<R: Read>(reader: R) -> MixResult<Vec<(String, f64)>> {
    let mut rdr = csv_reader(reader);
    let mut effects = Vec::new();
    for result in rdr.deserialize() {
        let row: EffectRow = result?;
        effects.push((row.name, row.multiplier));
    }
    Ok(effects)
}

/// Reads base products.
///
/// # CSV Format
///
/// Expected columns: `name, base_price, default_effects`
///
/// `default_effects` is semicolon-separated and may be left empty.
pub fn read_products<R: Read>(reader: R) -> MixResult<Vec<Product>> {
    let mut rdr = csv_reader(reader);
    let mut products = Vec::new();
    for result in rdr.deserialize() {
        let row: ProductRow = result?;
        products.push(Product {
            name: row.name,
            base_price: row.base_price,
            default_effects: row
                .default_effects
                .as_deref()
                .map(parse_effect_list)
                .unwrap_or_default(),
        });
    }
    Ok(products)
}

/// Joins ingredient and replacement rows and validates the result.
///
/// # Errors
///
/// Returns [`MixError::InvalidRuleData`] when a replacement names an
/// ingredient that is not listed, plus everything [`Ruleset::new`] rejects.
pub fn assemble(
    meta: RulesetMeta,
    ingredient_rows: Vec<IngredientRow>,
    replacement_rows: Vec<ReplacementRow>,
    effects: Vec<(String, f64)>,
    products: Vec<Product>,
) -> MixResult<Ruleset> {
    let mut rules: HashMap<String, Vec<Replacement>> = HashMap::new();
    for row in replacement_rows {
        if !ingredient_rows.iter().any(|i| i.name == row.ingredient) {
            return Err(MixError::rule_data(format!(
                "replacement listed for unknown ingredient '{}'",
                row.ingredient
            )));
        }
        rules.entry(row.ingredient).or_default().push(Replacement {
            replaces: row.replaces,
            with: row.with,
        });
    }

    let ingredients: Vec<Ingredient> = ingredient_rows
        .into_iter()
        .map(|row| Ingredient {
            replacements: rules.remove(&row.name).unwrap_or_default(),
            name: row.name,
            cost: row.cost,
            base_effect: row.base_effect,
        })
        .collect();

    let ruleset = Ruleset::new(meta, ingredients, effects, products)?;
    info!(
        version = ruleset.version(),
        ingredients = ruleset.ingredients().len(),
        effects = ruleset.effects().len(),
        products = ruleset.products().len(),
        "Loaded ruleset"
    );
    Ok(ruleset)
}

/// Loads a complete ruleset from a data directory.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use mixmax::data::load_all_data;
///
/// let ruleset = load_all_data(Path::new("data")).unwrap();
/// println!("Loaded ruleset {}", ruleset.version());
/// ```
pub fn load_all_data(data_dir: &Path) -> MixResult<Ruleset> {
    debug!(path = %data_dir.display(), "Loading rule data");
    assemble(
        read_meta(File::open(data_dir.join(RULESET_FILE))?)?,
        read_ingredients(File::open(data_dir.join(INGREDIENTS_FILE))?)?,
        read_replacements(File::open(data_dir.join(REPLACEMENTS_FILE))?)?,
        read_effects(File::open(data_dir.join(EFFECTS_FILE))?)?,
        read_products(File::open(data_dir.join(PRODUCTS_FILE))?)?,
    )
}

/// Loads the ruleset compiled into the library.
pub fn embedded_ruleset() -> MixResult<Ruleset> {
    assemble(
        read_meta(include_str!("../data/ruleset.json").as_bytes())?,
        read_ingredients(include_str!("../data/ingredients.csv").as_bytes())?,
        read_replacements(include_str!("../data/replacements.csv").as_bytes())?,
        read_effects(include_str!("../data/effects.csv").as_bytes())?,
        read_products(include_str!("../data/products.csv").as_bytes())?,
    )
}
