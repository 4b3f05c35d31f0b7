mod support;

use support::TestList;

#[test]
fn default_database_lives_in_working_directory() {
    let list = TestList::new();
    list.bare_cmd()
        .args(["add", "Milk", "--by", "sam", "--category", "Dairy"])
        .assert()
        .success();
    assert!(list.path().join("groceryshoppingapp.sqlite").exists());
}

#[test]
fn config_file_sets_database_and_author() -> Result<(), Box<dyn std::error::Error>> {
    let list = TestList::new();
    list.write_file(
        "groceries.toml",
        r#"
database = "home.sqlite"

[author]
default = "alex"
"#,
    )?;

    list.bare_cmd()
        .args(["add", "Milk", "--category", "Dairy"])
        .assert()
        .success();
    assert!(list.path().join("home.sqlite").exists());

    let output = list.bare_cmd().args(["--json", "list"]).output()?;
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["data"]["tasks"][0]["created_by"], "alex");
    Ok(())
}

#[test]
fn db_flag_overrides_config() -> Result<(), Box<dyn std::error::Error>> {
    let list = TestList::new();
    list.write_file("groceries.toml", "database = \"home.sqlite\"\n")?;

    list.add("Milk", "Dairy");
    assert!(list.db_path().exists());
    assert!(!list.path().join("home.sqlite").exists());
    Ok(())
}

#[test]
fn db_env_is_used_when_flag_missing() {
    let list = TestList::new();
    list.bare_cmd()
        .env("GROCERIES_DB", list.db_path())
        .args(["add", "Milk", "--by", "sam", "--category", "Dairy"])
        .assert()
        .success();
    assert!(list.db_path().exists());
}

#[test]
fn author_env_beats_config() -> Result<(), Box<dyn std::error::Error>> {
    let list = TestList::new();
    list.write_file("groceries.toml", "[author]\ndefault = \"alex\"\n")?;

    list.cmd()
        .env("GROCERIES_AUTHOR", "robin")
        .args(["add", "Milk", "--category", "Dairy"])
        .assert()
        .success();
    let listed = list.list_json(&[]);
    assert_eq!(listed["data"]["tasks"][0]["created_by"], "robin");
    Ok(())
}

#[test]
fn case_sensitive_search_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let list = TestList::new();
    list.write_file("groceries.toml", "[search]\ncase_sensitive = true\n")?;
    list.add("Milk", "Dairy");

    assert!(list.items(&["--search", "milk"]).is_empty());
    assert_eq!(list.items(&["--search", "Mil"]), vec!["Milk"]);
    Ok(())
}

#[test]
fn invalid_config_is_user_error() -> Result<(), Box<dyn std::error::Error>> {
    let list = TestList::new();
    list.write_file("groceries.toml", "database = \"\"\n")?;
    list.bare_cmd()
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicates::str::contains("database cannot be empty"));
    Ok(())
}
