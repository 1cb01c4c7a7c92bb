//! End-to-end planner runs over page files on disk.

use std::fs;
use std::path::Path;

use clap::Parser;
use repricer_cli::{Cli, CliError};
use tempfile::TempDir;

const VARIANT_PAGES: &str = r#"[
  {
    "data": {
      "productVariants": {
        "pageInfo": { "hasNextPage": true, "endCursor": "c1" },
        "edges": [
          { "node": { "id": "gid://shopify/ProductVariant/1", "price": "34.13",
                      "compareAtPrice": "68.26", "product": { "id": "gid://shopify/Product/1" } } },
          { "node": { "id": "gid://shopify/ProductVariant/2", "price": "377.95",
                      "compareAtPrice": null, "product": { "id": "gid://shopify/Product/2" } } }
        ]
      }
    }
  },
  {
    "data": {
      "productVariants": {
        "pageInfo": { "hasNextPage": false, "endCursor": null },
        "edges": [
          { "node": { "id": "gid://shopify/ProductVariant/3", "price": "39.95",
                      "compareAtPrice": null, "product": { "id": "gid://shopify/Product/3" } } },
          { "node": { "id": "gid://shopify/ProductVariant/4", "price": "0.00",
                      "compareAtPrice": null, "product": { "id": "gid://shopify/Product/4" } } }
        ]
      }
    }
  }
]"#;

const COLLECTION_PAGE: &str = r#"{
  "data": {
    "collection": {
      "id": "gid://shopify/Collection/7",
      "products": {
        "pageInfo": { "hasNextPage": false, "endCursor": null },
        "edges": [
          { "node": { "id": "gid://shopify/Product/1", "variants": { "edges": [
              { "node": { "id": "gid://shopify/ProductVariant/1", "price": "34.95", "compareAtPrice": null } },
              { "node": { "id": "gid://shopify/ProductVariant/2", "price": "10.00", "compareAtPrice": "20.00" } }
          ] } } }
        ]
      }
    }
  }
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn read_plan(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_round_tiers_plan_written_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "pages.json", VARIANT_PAGES);
    let config = write(&dir, "repricer.toml", "[pass]\nmode = \"round-tiers\"\n");
    let output = dir.path().join("plan.json");

    let cli = Cli::try_parse_from([
        "repricer",
        "--input",
        input.as_str(),
        "--config",
        config.as_str(),
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let envelope = repricer_cli::run(&cli).unwrap();
    assert_eq!(envelope.report.updated, 2);
    assert_eq!(envelope.report.skipped, 2);

    let plan = read_plan(&output);
    assert_eq!(plan["report"]["mode"], "round-tiers");
    assert_eq!(plan["report"]["blockSize"], 5);
    assert_eq!(
        plan["mutations"][0]["variants"][0],
        serde_json::json!({
            "id": "gid://shopify/ProductVariant/1",
            "price": "34.95",
            "compareAtPrice": "69.95"
        })
    );
    assert_eq!(plan["mutations"][1]["variants"][0]["price"], "399.95");
    assert_eq!(plan["runId"], envelope.run_id.to_string());
}

#[test]
fn test_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "pages.json", VARIANT_PAGES);
    let config = write(
        &dir,
        "repricer.toml",
        "[pass]\nmode = \"round-tiers\"\nending = \"0.95\"\n",
    );
    let output = dir.path().join("plan.json");

    let cli = Cli::try_parse_from([
        "repricer",
        "-i",
        input.as_str(),
        "-c",
        config.as_str(),
        "-o",
        output.to_str().unwrap(),
        "--mode",
        "force-cents",
        "--ending",
        "no-cents",
    ])
    .unwrap();

    let envelope = repricer_cli::run(&cli).unwrap();
    assert_eq!(envelope.report.mode.as_str(), "force-cents");

    let plan = read_plan(&output);
    assert_eq!(plan["report"]["ending"], "no-cents");
    assert_eq!(plan["mutations"][0]["variants"][0]["price"], "34.00");
    assert_eq!(plan["mutations"][0]["variants"][0]["compareAtPrice"], "68.00");
}

#[test]
fn test_collection_discount_plan() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "collection.json", COLLECTION_PAGE);
    let config = write(
        &dir,
        "repricer.toml",
        r#"
[pass]
mode = "collection-discount"
collection_id = "gid://shopify/Collection/7"
discount_percent = 50

[output]
pretty = true
"#,
    );
    let output = dir.path().join("plan.json");

    let cli = Cli::try_parse_from([
        "repricer",
        "-i",
        input.as_str(),
        "-c",
        config.as_str(),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let envelope = repricer_cli::run(&cli).unwrap();
    // 10.00 at 50% already shows 20.00
    assert_eq!(envelope.report.updated, 1);
    assert_eq!(envelope.report.skipped, 1);

    let raw = fs::read_to_string(&output).unwrap();
    assert!(raw.contains("\n  \"report\": {"));
    let plan: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(plan["report"]["collectionId"], "gid://shopify/Collection/7");
    assert_eq!(plan["report"]["discountPercent"], 50.0);
    assert_eq!(plan["mutations"][0]["productId"], "gid://shopify/Product/1");
    assert_eq!(plan["mutations"][0]["variants"][0]["compareAtPrice"], "69.90");
}

#[test]
fn test_discount_without_collection_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "collection.json", COLLECTION_PAGE);
    let config = write(&dir, "repricer.toml", "[pass]\nmode = \"collection-discount\"\n");

    let cli = Cli::try_parse_from(["repricer", "-i", input.as_str(), "-c", config.as_str()]).unwrap();
    let err = repricer_cli::run(&cli).unwrap_err();
    assert!(matches!(err, CliError::Validation(_)), "{err}");
}

#[test]
fn test_missing_input_is_read_error() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "repricer.toml", "[pass]\nmode = \"force-cents\"\n");
    let missing = dir.path().join("nope.json");

    let cli = Cli::try_parse_from([
        "repricer",
        "-i",
        missing.to_str().unwrap(),
        "-c",
        config.as_str(),
    ])
    .unwrap();
    let err = repricer_cli::run(&cli).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }), "{err}");
}
