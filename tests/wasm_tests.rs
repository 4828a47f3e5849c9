//! Tests for the JSON entry points used by the web frontend.

use mixmax::wasm::{find_recipes, get_effects, get_rule_data, get_version, mix};
use serde_json::Value;

fn parse(json: &str) -> Value {
    serde_json::from_str(json).expect("Output should be valid JSON")
}

#[test]
fn test_find_recipes() {
    let output = parse(&find_recipes(
        r#"{ "effects": ["Energizing"], "objective": "cost", "max_steps": 1 }"#,
    ));

    assert_eq!(output["success"], true);
    assert_eq!(output["ruleset_version"], "0.3.4f4");
    assert_eq!(output["results"][0]["sequence"][0], "Cuke");
    assert_eq!(output["results"][0]["total_cost"], 2.0);
    assert_eq!(output["results"][0]["product"], "Cocaine");
    assert!(output["states_explored"].as_u64().unwrap() > 0);
}

#[test]
fn test_find_recipes_limits_results() {
    let output = parse(&find_recipes(
        r#"{ "effects": ["Zombifying"], "max_steps": 3, "top": 2 }"#,
    ));

    assert_eq!(output["success"], true);
    assert_eq!(output["total_results"], 4);
    assert_eq!(output["results"].as_array().unwrap().len(), 2);
}

#[test]
fn test_find_recipes_unreachable() {
    let output = parse(&find_recipes(
        r#"{ "effects": ["Zombifying"], "max_steps": 1 }"#,
    ));

    assert_eq!(output["success"], true);
    assert_eq!(output["total_results"], 0);
    assert!(output["results"].as_array().unwrap().is_empty());
}

#[test]
fn test_find_recipes_with_product() {
    let output = parse(&find_recipes(
        r#"{ "effects": ["Calming"], "objective": "profit", "max_steps": 0, "product": "OG Kush" }"#,
    ));

    assert_eq!(output["success"], true);
    assert_eq!(output["results"][0]["product"], "OG Kush");
    assert!(output["results"][0]["sequence"].as_array().unwrap().is_empty());
}

#[test]
fn test_find_recipes_restricts_ingredients() {
    let output = parse(&find_recipes(
        r#"{ "effects": ["Energizing"], "max_steps": 2, "ingredients": ["Banana", "Cuke"], "product": "" }"#,
    ));

    assert_eq!(output["success"], true);
    let results = output["results"].as_array().unwrap();
    assert!(!results.is_empty());
    for result in results {
        for step in result["sequence"].as_array().unwrap() {
            assert!(step == "Banana" || step == "Cuke", "Unexpected step {}", step);
        }
    }
    assert_eq!(output["results"][0]["product"], "Cocaine");
}

#[test]
fn test_find_recipes_rejects_negative_bound() {
    let output = parse(&find_recipes(r#"{ "effects": ["Calming"], "max_steps": -1 }"#));

    assert_eq!(output["success"], false);
    assert!(output["error"].as_str().unwrap().contains("-1"));
}

#[test]
fn test_find_recipes_rejects_unknown_effect() {
    let output = parse(&find_recipes(r#"{ "effects": ["Glittering"], "max_steps": 2 }"#));

    assert_eq!(output["success"], false);
    assert!(output["error"].as_str().unwrap().contains("Glittering"));
}

#[test]
fn test_find_recipes_rejects_bad_json() {
    let output = parse(&find_recipes("{ effects"));

    assert_eq!(output["success"], false);
    assert!(output["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[test]
fn test_mix() {
    let output = parse(&mix(r#"{ "sequence": ["Cuke", "Banana"] }"#));

    assert_eq!(output["success"], true);
    assert_eq!(output["effects"][0], "Gingeritis");
    assert_eq!(output["effects"][1], "Thought-Provoking");
    assert_eq!(output["total_cost"], 4.0);
}

#[test]
fn test_mix_unknown_ingredient() {
    let output = parse(&mix(r#"{ "sequence": ["Unobtainium"] }"#));

    assert_eq!(output["success"], false);
    assert!(output["error"].as_str().unwrap().contains("Unobtainium"));
}

#[test]
fn test_get_effects() {
    let effects = parse(&get_effects());
    let effects = effects.as_array().unwrap();

    assert_eq!(effects.len(), 34);
    assert!(effects
        .iter()
        .any(|e| e["name"] == "Energizing" && e["multiplier"] == 0.22));
}

#[test]
fn test_get_rule_data() {
    let data = parse(&get_rule_data());

    assert_eq!(data["version"], "0.3.4f4");
    assert_eq!(data["ingredients"].as_array().unwrap().len(), 16);
    assert_eq!(data["products"].as_array().unwrap().len(), 8);
}

#[test]
fn test_get_rule_data_lists_replacements() {
    let data = parse(&get_rule_data());
    let cuke = data["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["name"] == "Cuke")
        .expect("Cuke should be listed");

    assert_eq!(cuke["base_effect"], "Energizing");
    let rules = cuke["replacements"].as_array().unwrap();
    assert_eq!(rules.len(), 7);
    assert_eq!(rules[0]["replaces"], "Euphoric");
    assert_eq!(rules[0]["with"], "Laxative");
}

#[test]
fn test_get_version() {
    assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
}
