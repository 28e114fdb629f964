use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db_with_day, rti, setup_test_db, temp_out};

fn with_payroll(name: &str) -> String {
    let db_path = setup_test_db(name);
    init_db_with_day(&db_path, "ana");
    rti()
        .args(["--db", &db_path, "payroll", "ana", "--month", "2025-03", "--rate", "20"])
        .assert()
        .success();
    db_path
}

#[test]
fn test_export_csv_one_row_per_day() {
    let db_path = with_payroll("export_csv");
    let out = temp_out("export_csv", "csv");

    rti()
        .args(["--db", &db_path, "export", "ana", "--format", "csv", "--file", &out, "--force"])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read csv");
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("employee_id,period_start,period_end,date"));
    let row = lines.next().expect("one day row");
    assert!(row.starts_with("ana,2025-03-01,2025-03-31,2025-03-10,08:00,12:00,13:00,17:40,8.6667"));
    assert!(row.ends_with(",20.00,173.33"));
    assert!(lines.next().is_none());
}

#[test]
fn test_export_json_full_periods() {
    let db_path = with_payroll("export_json");
    let out = temp_out("export_json", "json");

    rti()
        .args(["--db", &db_path, "export", "ana", "--format", "json", "--file", &out, "--force"])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read json");
    let v: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let periods = v.as_array().expect("array of periods");
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0]["employee_id"], "ana");
    assert_eq!(periods[0]["daily_breakdown"].as_array().unwrap().len(), 1);
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = with_payroll("export_relative");

    rti()
        .args(["--db", &db_path, "export", "ana", "--format", "csv", "--file", "out.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_export_without_periods_writes_nothing() {
    let db_path = setup_test_db("export_empty");
    let out = temp_out("export_empty", "csv");

    rti()
        .args(["--db", &db_path, "export", "bruno", "--format", "csv", "--file", &out])
        .assert()
        .success()
        .stdout(contains("nothing to export"));

    assert!(!std::path::Path::new(&out).exists());
}
