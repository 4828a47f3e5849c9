//! Tests for rule data loading.

use mixmax::data::{
    assemble, embedded_ruleset, load_all_data, read_effects, read_ingredients, read_meta,
    read_products, read_replacements,
};
use mixmax::error::MixError;
use mixmax::models::{CapacityPolicy, RulesetMeta};
use std::path::Path;

const META: &str = r#"{ "version": "test", "max_effects": 4 }"#;
const EFFECTS: &str = "name,multiplier\nX,0.5\nY,0.25\n";
const PRODUCTS: &str = "name,base_price,default_effects\nBase,10,\n";

fn assemble_from(ingredients: &str, replacements: &str) -> Result<mixmax::models::Ruleset, MixError> {
    assemble(
        read_meta(META.as_bytes())?,
        read_ingredients(ingredients.as_bytes())?,
        read_replacements(replacements.as_bytes())?,
        read_effects(EFFECTS.as_bytes())?,
        read_products(PRODUCTS.as_bytes())?,
    )
}

#[test]
fn test_embedded_ruleset_loads() {
    let ruleset = embedded_ruleset().expect("Embedded rule data should be valid");

    assert_eq!(ruleset.version(), "0.3.4f4");
    assert_eq!(ruleset.max_effects(), 8);
    assert_eq!(ruleset.capacity_policy(), CapacityPolicy::SkipBaseEffect);
    assert_eq!(ruleset.ingredients().len(), 16);
    assert_eq!(ruleset.effects().len(), 34);
    assert_eq!(ruleset.products().len(), 8);
}

#[test]
fn test_load_all_data_matches_embedded() {
    let data_dir = Path::new("data");
    if !data_dir.exists() {
        return;
    }

    let loaded = load_all_data(data_dir).expect("Failed to load data");
    let embedded = embedded_ruleset().expect("Embedded rule data should be valid");

    assert_eq!(loaded.version(), embedded.version());
    assert_eq!(loaded.ingredients(), embedded.ingredients());
    assert_eq!(loaded.effects(), embedded.effects());
    assert_eq!(loaded.products(), embedded.products());
}

#[test]
fn test_ingredients_sorted_with_valid_costs() {
    let ruleset = embedded_ruleset().unwrap();

    let names: Vec<&str> = ruleset.ingredients().iter().map(|i| i.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted, "Ingredients should be sorted by name");

    for ingredient in ruleset.ingredients() {
        assert!(ingredient.cost >= 0.0, "Cost should be non-negative");
        assert!(ruleset.knows_effect(&ingredient.base_effect));
    }
}

#[test]
fn test_replacement_order_preserved() {
    let ruleset = embedded_ruleset().unwrap();
    let cuke = ruleset.ingredient("Cuke").expect("Cuke should exist");

    assert_eq!(cuke.base_effect, "Energizing");
    assert_eq!(cuke.cost, 2.0);
    assert_eq!(cuke.replacements.len(), 7);
    assert_eq!(cuke.replacements[0].replaces, "Euphoric");
    assert_eq!(cuke.replacements[0].with, "Laxative");
    assert_eq!(cuke.replacements[6].replaces, "Toxic");
    assert_eq!(cuke.replacements[6].with, "Euphoric");
}

#[test]
fn test_product_default_effects() {
    let ruleset = embedded_ruleset().unwrap();

    let og_kush = ruleset.product("OG Kush").unwrap();
    assert_eq!(og_kush.base_price, 30.0);
    assert!(og_kush.default_effects.contains("Calming"));
    assert_eq!(og_kush.default_effects.len(), 1);

    let meth = ruleset.product("Meth").unwrap();
    assert!(meth.default_effects.is_empty());
}

#[test]
fn test_meta_defaults_capacity_policy() {
    let meta: RulesetMeta = read_meta(META.as_bytes()).unwrap();
    assert_eq!(meta.capacity_policy, CapacityPolicy::SkipBaseEffect);

    let meta = read_meta(
        r#"{ "version": "v", "max_effects": 3, "capacity_policy": "unbounded" }"#.as_bytes(),
    )
    .unwrap();
    assert_eq!(meta.capacity_policy, CapacityPolicy::Unbounded);
}

#[test]
fn test_assemble_groups_replacements() {
    let ruleset = assemble_from(
        "name,cost,base_effect\nB,5,Y\nA,2,X\n",
        "ingredient,replaces,with\nA,Y,X\nB,X,Y\nA,X,Y\n",
    )
    .unwrap();

    let a = ruleset.ingredient("A").unwrap();
    assert_eq!(a.replacements.len(), 2);
    assert_eq!(a.replacements[0].replaces, "Y");
    assert_eq!(a.replacements[1].replaces, "X");
    assert_eq!(ruleset.ingredients()[0].name, "A");
}

#[test]
fn test_unknown_effect_rejected() {
    let result = assemble_from(
        "name,cost,base_effect\nA,2,X\n",
        "ingredient,replaces,with\nA,X,Nowhere\n",
    );
    assert!(matches!(result, Err(MixError::InvalidRuleData { .. })));
}

#[test]
fn test_replacement_for_unknown_ingredient_rejected() {
    let result = assemble_from(
        "name,cost,base_effect\nA,2,X\n",
        "ingredient,replaces,with\nGhost,X,Y\n",
    );
    assert!(matches!(result, Err(MixError::InvalidRuleData { .. })));
}

#[test]
fn test_negative_cost_rejected() {
    let result = assemble_from("name,cost,base_effect\nA,-1,X\n", "ingredient,replaces,with\n");
    assert!(matches!(result, Err(MixError::InvalidRuleData { .. })));
}

#[test]
fn test_malformed_csv_is_csv_error() {
    let result = read_ingredients("name,cost,base_effect\nA,cheap,X\n".as_bytes());
    assert!(matches!(result, Err(MixError::Csv(_))));
}

#[test]
fn test_malformed_meta_is_json_error() {
    let result = read_meta("{ not json".as_bytes());
    assert!(matches!(result, Err(MixError::Json(_))));
}
