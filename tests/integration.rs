use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn fridge_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("fridge");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/fridge.sqlite"

[server]
bind = "127.0.0.1:7331"

[pantry]
default_shelf_life_days = 5

[logging]
filter = "warn"
"#,
        root.display()
    );

    let config_path = config_dir.join("fridge.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_fridge(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = fridge_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run fridge binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn run_ok(config_path: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_fridge(config_path, args);
    assert!(
        success,
        "fridge {:?} failed: stdout={}, stderr={}",
        args, stdout, stderr
    );
    stdout
}

/// Extracts the id from "Created ... recipe <id> (...)".
fn created_recipe_id(stdout: &str) -> String {
    stdout
        .split_whitespace()
        .nth(3)
        .expect("recipe id in output")
        .to_string()
}

/// init + egg, flour, milk + one user owning egg and flour.
fn seed_kitchen(config_path: &Path) {
    run_ok(config_path, &["init"]);
    run_ok(config_path, &["ingredient", "add", "egg", "--shelf-life", "14"]);
    run_ok(config_path, &["ingredient", "add", "flour", "--shelf-life", "180"]);
    run_ok(config_path, &["ingredient", "add", "milk", "--shelf-life", "5"]);
    run_ok(config_path, &["user", "add", "cook@example.com"]);
    run_ok(config_path, &["pantry", "add", "1", "1"]);
    run_ok(config_path, &["pantry", "add", "1", "2"]);
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let stdout = run_ok(&config_path, &["init"]);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/fridge.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_fridge(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_fridge(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_fridge(&tmp.path().join("nope.toml"), &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}

#[test]
fn test_ingredient_lifecycle() {
    let (_tmp, config_path) = setup_test_env();
    run_ok(&config_path, &["init"]);

    let stdout = run_ok(&config_path, &["ingredient", "add", "butter"]);
    assert!(
        stdout.contains("Created ingredient 1 (butter, keeps 5 days)"),
        "shelf life should come from [pantry]: {}",
        stdout
    );

    let stdout = run_ok(
        &config_path,
        &["ingredient", "update", "1", "--name", "salted butter"],
    );
    assert!(stdout.contains("salted butter, keeps 5 days"));

    let stdout = run_ok(&config_path, &["ingredient", "list"]);
    assert!(stdout.contains("salted butter"));

    run_ok(&config_path, &["ingredient", "remove", "1"]);
    let stdout = run_ok(&config_path, &["ingredient", "list"]);
    assert!(stdout.contains("No ingredients."));
}

#[test]
fn test_duplicate_ingredient_rejected() {
    let (_tmp, config_path) = setup_test_env();
    run_ok(&config_path, &["init"]);
    run_ok(&config_path, &["ingredient", "add", "egg"]);

    let (_, stderr, success) = run_fridge(&config_path, &["ingredient", "add", "egg"]);
    assert!(!success);
    assert!(stderr.contains("ingredient already exists: egg"), "{}", stderr);
}

#[test]
fn test_pantry_defaults() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    let expected = chrono::Local::now().date_naive() + chrono::Days::new(5);
    let stdout = run_ok(&config_path, &["pantry", "add", "1", "3"]);
    assert!(
        stdout.contains(&format!("Added milk x1 to pantry of user 1 (expires {})", expected)),
        "unexpected output: {}",
        stdout
    );
}

#[test]
fn test_pantry_explicit_values_and_update() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    run_ok(
        &config_path,
        &["pantry", "add", "1", "3", "--quantity", "2", "--expires", "2030-01-31"],
    );
    let stdout = run_ok(
        &config_path,
        &["pantry", "update", "1", "3", "--quantity", "4"],
    );
    assert!(stdout.contains("Updated milk x4 (expires 2030-01-31)"), "{}", stdout);

    let stdout = run_ok(&config_path, &["pantry", "list", "1"]);
    assert!(stdout.contains("milk"));
    assert!(stdout.contains("2030-01-31"));
}

#[test]
fn test_pantry_zero_quantity_rejected() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    let (_, stderr, success) =
        run_fridge(&config_path, &["pantry", "add", "1", "3", "--quantity", "0"]);
    assert!(!success);
    assert!(stderr.contains("quantity must be a positive integer"), "{}", stderr);
}

#[test]
fn test_pantry_duplicate_rejected() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    let (_, stderr, success) = run_fridge(&config_path, &["pantry", "add", "1", "1"]);
    assert!(!success);
    assert!(stderr.contains("already in the pantry"), "{}", stderr);
}

#[test]
fn test_suggest_pancakes_and_omelette() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    run_ok(
        &config_path,
        &[
            "recipe", "add", "Pancakes", "--kind", "internal",
            "--instructions", "Mix and fry.",
            "--ingredient", "1:2", "--ingredient", "2:200 g", "--ingredient", "3:300 ml",
        ],
    );
    run_ok(
        &config_path,
        &[
            "recipe", "add", "Omelette", "--kind", "external",
            "--link", "https://example.com/omelette",
            "--ingredient", "1",
        ],
    );

    let stdout = run_ok(&config_path, &["suggest", "1", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let report = report.as_array().unwrap();
    assert_eq!(report.len(), 2);

    assert_eq!(report[0]["name"], "Omelette");
    assert_eq!(report[0]["can_make"], true);
    assert_eq!(report[0]["missing_ingredients"], serde_json::json!([]));
    assert_eq!(report[0]["used_ingredients"], serde_json::json!(["egg"]));

    assert_eq!(report[1]["name"], "Pancakes");
    assert_eq!(report[1]["can_make"], false);
    assert_eq!(report[1]["missing_ingredients"], serde_json::json!(["milk"]));
    assert_eq!(
        report[1]["used_ingredients"],
        serde_json::json!(["egg", "flour", "milk"])
    );

    let stdout = run_ok(&config_path, &["suggest", "1", "--makeable"]);
    assert!(stdout.contains("Omelette"));
    assert!(!stdout.contains("Pancakes"));

    let stdout = run_ok(&config_path, &["suggest", "1"]);
    assert!(stdout.contains("missing: milk"));
}

#[test]
fn test_suggest_unknown_user_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_ok(&config_path, &["init"]);

    let (_, stderr, success) = run_fridge(&config_path, &["suggest", "99"]);
    assert!(!success);
    assert!(stderr.contains("user not found: 99"), "{}", stderr);
}

#[test]
fn test_suggest_no_recipes() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    let stdout = run_ok(&config_path, &["suggest", "1"]);
    assert!(stdout.contains("No recipes."));

    let stdout = run_ok(&config_path, &["suggest", "1", "--json"]);
    assert_eq!(stdout.trim(), "[]");
}

#[test]
fn test_recipe_show_and_remove() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    let stdout = run_ok(
        &config_path,
        &[
            "recipe", "add", "Crepes", "--kind", "internal",
            "--instructions", "Thin batter, hot pan.",
            "--ingredient", "1:2", "--ingredient", "3",
        ],
    );
    let id = created_recipe_id(&stdout);

    let stdout = run_ok(&config_path, &["recipe", "show", &id]);
    assert!(stdout.contains("Crepes (internal)"));
    assert!(stdout.contains("- egg (2)"));
    assert!(stdout.contains("- milk"));
    assert!(stdout.contains("Thin batter, hot pan."));

    run_ok(&config_path, &["recipe", "remove", &id]);
    let stdout = run_ok(&config_path, &["recipe", "list"]);
    assert!(stdout.contains("No recipes."));
}

#[test]
fn test_recipe_kind_rules() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    let (_, stderr, success) = run_fridge(
        &config_path,
        &["recipe", "add", "Toast", "--kind", "external", "--ingredient", "2"],
    );
    assert!(!success);
    assert!(stderr.contains("external recipes require a link"), "{}", stderr);

    let (_, stderr, success) = run_fridge(
        &config_path,
        &[
            "recipe", "add", "Toast", "--kind", "internal",
            "--instructions", "Toast it.", "--link", "https://example.com",
        ],
    );
    assert!(!success);
    assert!(stderr.contains("internal recipes must not have a link"), "{}", stderr);

    let (_, _, success) = run_fridge(
        &config_path,
        &["recipe", "add", "Toast", "--kind", "baked"],
    );
    assert!(!success, "unknown kind should be rejected by the parser");
}

#[test]
fn test_recipe_duplicate_ingredient_rejected() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    let (_, stderr, success) = run_fridge(
        &config_path,
        &[
            "recipe", "add", "Eggnog", "--kind", "internal",
            "--instructions", "Whisk.", "--ingredient", "1", "--ingredient", "1:3",
        ],
    );
    assert!(!success);
    assert!(stderr.contains("ingredient 1 already in recipe"), "{}", stderr);
}

#[test]
fn test_ingredient_in_use_cannot_be_removed() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    let (_, stderr, success) = run_fridge(&config_path, &["ingredient", "remove", "1"]);
    assert!(!success);
    assert!(stderr.contains("in use"), "{}", stderr);
}

#[test]
fn test_user_remove_drops_pantry() {
    let (_tmp, config_path) = setup_test_env();
    seed_kitchen(&config_path);

    run_ok(&config_path, &["user", "remove", "1"]);

    let (_, stderr, success) = run_fridge(&config_path, &["pantry", "list", "1"]);
    assert!(!success);
    assert!(stderr.contains("user not found: 1"));

    // The pantry rows are gone, so egg is free to delete.
    run_ok(&config_path, &["ingredient", "remove", "1"]);
}
