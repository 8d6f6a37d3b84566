use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCENARIO_CSV: &str = "\
Date,Amount,Kind,Cat,Memo
2023-01-15,\"1,200.00\",income,Salary,Jan pay
bad-date,50,expense,Food,oops
2023-01-20,-10,expense,Food,negative
";

fn tally(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// A fresh HOME with an initialized data directory inside it.
fn setup() -> TempDir {
    let home = tempfile::tempdir().unwrap();
    let data = home.path().join("data");
    tally(home.path())
        .args(["init", "--data-dir", data.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tally at"));
    home
}

fn write_csv(home: &Path, name: &str, body: &str) -> String {
    let path = home.join(name);
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().to_string()
}

fn import(home: &Path, body: &str) -> assert_cmd::assert::Assert {
    let file = write_csv(home, "bank.csv", body);
    tally(home).args(["import", &file, "--yes"]).assert()
}

#[test]
fn init_creates_database_and_settings() {
    let home = setup();
    assert!(home.path().join("data").join("tally.db").exists());
    assert!(home.path().join("data").join("exports").is_dir());
    assert!(home.path().join(".config/tally/settings.json").exists());
}

#[test]
fn import_accepts_valid_rows_and_skips_the_rest() {
    let home = setup();
    import(home.path(), SCENARIO_CSV)
        .success()
        .stdout(predicate::str::contains("1 valid, 2 skipped"))
        .stdout(predicate::str::contains("Imported 1 transactions."));

    tally(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-01-15"))
        .stdout(predicate::str::contains("1200.00"))
        .stdout(predicate::str::contains("Jan pay"))
        .stdout(predicate::str::contains("bad-date").not());
}

#[test]
fn import_reports_new_categories() {
    let home = setup();
    import(
        home.path(),
        "Date,Type,Category,Amount\n2023-02-01,expense,Pet Food,20\n2023-02-02,expense,Pet Food,5\n",
    )
    .success()
    .stdout(predicate::str::contains("Imported 2 transactions."))
    .stdout(predicate::str::contains("new expense category: Pet Food"));

    tally(home.path())
        .args(["categories", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pet Food"))
        .stdout(predicate::str::contains("in use (2)"));
}

#[test]
fn import_with_column_overrides() {
    let home = setup();
    import(home.path(), "Posted,Value,Direction\n05/03/2023,42.5,in\n")
        .failure()
        .stderr(predicate::str::contains("Please map the required fields"));

    let file = write_csv(home.path(), "odd.csv", "Posted,Value,Direction\n05/03/2023,42.5,in\n");
    tally(home.path())
        .args(["import", &file, "--date", "Posted", "--type", "2", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 transactions."));

    tally(home.path())
        .args(["list", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-03-05"))
        .stdout(predicate::str::contains("42.50"));
}

#[test]
fn import_empty_file_fails() {
    let home = setup();
    import(home.path(), "\n\n")
        .failure()
        .stderr(predicate::str::contains("No rows found"));
}

#[test]
fn import_with_no_valid_rows_fails() {
    let home = setup();
    import(home.path(), "Date,Type,Amount\nnope,expense,0\n")
        .failure()
        .stderr(predicate::str::contains("No valid rows found to import"));

    tally(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions"));
}

#[test]
fn summary_totals() {
    let home = setup();
    import(
        home.path(),
        "Date,Type,Category,Amount\n2023-01-01,income,Salary,1000\n2023-01-02,expense,Rent,400.5\n",
    )
    .success();

    tally(home.path())
        .args(["summary", "--range", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000.00"))
        .stdout(predicate::str::contains("400.50"))
        .stdout(predicate::str::contains("599.50"))
        .stdout(predicate::str::contains("Last 12 months"));

    tally(home.path())
        .args(["summary", "--range", "week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range"));
}

#[test]
fn export_writes_quoted_csv() {
    let home = setup();
    import(home.path(), SCENARIO_CSV).success();

    let out = home.path().join("out.csv");
    tally(home.path())
        .args(["export", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 transactions"));

    let text = std::fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "\"id\",\"date\",\"type\",\"category\",\"amount\",\"note\",\"createdAt\""
    );
    let row = lines.next().unwrap();
    assert!(row.contains("\"2023-01-15\",\"income\",\"Salary\",\"1200.0\",\"Jan pay\""));
    assert!(lines.next().is_none());
}

#[test]
fn categories_add_and_delete() {
    let home = setup();
    tally(home.path())
        .args(["categories", "add", "Side Gig", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added income category: Side Gig"));

    tally(home.path())
        .args(["categories", "add", "Side Gig", "--type", "income"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Category already exists"));

    tally(home.path())
        .args(["categories", "delete", "Salary", "--type", "income"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Default categories cannot be deleted"));

    tally(home.path())
        .args(["categories", "delete", "Side Gig", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted income category: Side Gig"));
}

#[test]
fn summary_respects_filters() {
    let home = setup();
    import(
        home.path(),
        "Date,Type,Category,Amount\n2023-01-01,income,Salary,1000\n2023-01-02,expense,Rent,400.5\n",
    )
    .success();

    tally(home.path())
        .args(["summary", "--type", "expense", "--range", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Income:   0.00 (0 transactions)"))
        .stdout(predicate::str::contains("Expenses: 400.50 (1 transactions)"))
        .stdout(predicate::str::contains("1000.00").not());
}

#[test]
fn import_without_terminal_needs_yes() {
    let home = setup();
    import_file_without_yes(home.path())
        .failure()
        .stderr(predicate::str::contains("pass --yes"));

    tally(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions"));
}

fn import_file_without_yes(home: &Path) -> assert_cmd::assert::Assert {
    let file = write_csv(home, "ok.csv", "Date,Type,Amount\n2023-01-01,income,5\n");
    tally(home).args(["import", &file]).assert()
}
