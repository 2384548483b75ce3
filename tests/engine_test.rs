//! Integration tests for the engine facade

use sqlsim::{Engine, Value};

#[test]
fn test_create_insert_select_roundtrip() {
    let mut engine = Engine::new();
    engine.execute_query("CREATE DATABASE d");
    engine.execute_query("USE d");
    engine.execute_query("CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR(50))");

    let result = engine.execute_query("INSERT INTO t VALUES (1, 'Ann')");
    assert!(result.success, "{:?}", result.error);

    let result = engine.execute_query("SELECT * FROM t");
    assert!(result.success);
    assert_eq!(result.data.len(), 1);
    assert_eq!(result.columns, vec!["id", "name"]);
    assert_eq!(result.data[0].get("id"), Some(&Value::Int(1)));
    assert_eq!(result.data[0].get("name"), Some(&Value::Text("Ann".to_string())));
}

#[test]
fn test_group_by_having_on_seeded_employees() {
    let mut engine = Engine::with_sample_data();
    let result = engine.execute_query(
        "SELECT department, COUNT(*) as c FROM employees GROUP BY department HAVING c > 3",
    );
    assert!(result.success, "{:?}", result.error);

    // Engineering has 5 employees and Sales 4; Marketing and HR sit at 3.
    assert_eq!(result.data.len(), 2);
    let mut departments: Vec<String> = result
        .data
        .iter()
        .map(|row| row.get("department").map(|v| v.to_string()).unwrap_or_default())
        .collect();
    departments.sort();
    assert_eq!(departments, vec!["Engineering", "Sales"]);

    let engineering = result
        .data
        .iter()
        .find(|row| row.get("department") == Some(&Value::Text("Engineering".to_string())))
        .unwrap();
    assert_eq!(engineering.get("c"), Some(&Value::Int(5)));
}

#[test]
fn test_having_equality_accepts_decimal_literal() {
    let mut engine = Engine::with_sample_data();

    // A count of 5 matches whether the literal is written 5 or 5.0.
    for literal in ["5", "5.0"] {
        let result = engine.execute_query(&format!(
            "SELECT department, COUNT(*) AS c FROM employees GROUP BY department HAVING c = {literal}",
        ));
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.data.len(), 1, "HAVING c = {literal}");
        assert_eq!(
            result.data[0].get("department"),
            Some(&Value::Text("Engineering".to_string()))
        );
        assert_eq!(result.data[0].get("c"), Some(&Value::Int(5)));
    }
}

#[test]
fn test_scalar_subquery_reports_unsupported() {
    let mut engine = Engine::with_sample_data();
    let result = engine
        .execute_query("SELECT name FROM employees WHERE salary > (SELECT AVG(salary) FROM employees)");
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Subqueries are not supported"));
    assert!(result.data.is_empty());
}

#[test]
fn test_insert_update_delete_restores_count() {
    let mut engine = Engine::with_sample_data();

    let before = engine.execute_query("SELECT COUNT(*) FROM employees");
    assert_eq!(before.data[0].get("count_all"), Some(&Value::Int(15)));

    engine.execute_query(
        "INSERT INTO employees VALUES (16, 'Test User', 'test.user@company.com', 'Engineering', 70000, '2023-06-01', 'Active')",
    );
    let update = engine.execute_query("UPDATE employees SET salary = 76000 WHERE name = 'Test User'");
    assert_eq!(update.affected_rows, 1);

    let delete = engine.execute_query("DELETE FROM employees WHERE name = 'Test User'");
    assert_eq!(delete.affected_rows, 1);
    assert_eq!(
        delete.message.as_deref(),
        Some("1 row(s) deleted from 'employees'")
    );

    let after = engine.execute_query("SELECT COUNT(*) FROM employees");
    assert_eq!(after.data[0].get("count_all"), Some(&Value::Int(15)));
}

#[test]
fn test_update_stores_typed_value() {
    let mut engine = Engine::with_sample_data();
    engine.execute_query(
        "INSERT INTO employees VALUES (16, 'Test User', 'test.user@company.com', 'Sales', 70000, '2023-06-01', 'Active')",
    );
    engine.execute_query("UPDATE employees SET salary = 76000 WHERE name = 'Test User'");

    let result = engine.execute_query("SELECT salary FROM employees WHERE name = 'Test User'");
    // SET values pass through the declared column type, so the stored salary
    // is a number, not text.
    assert_eq!(result.data[0].get("salary"), Some(&Value::Int(76000)));
}

#[test]
fn test_failure_envelope_shape() {
    let mut engine = Engine::new();
    let result = engine.execute_query("SELECT * FROM anywhere;");
    assert!(!result.success);
    assert!(result.error.is_some());
    assert!(result.message.is_none());
    assert!(result.data.is_empty());
    assert!(result.columns.is_empty());
    assert_eq!(result.affected_rows, 0);
    assert_eq!(result.query, "SELECT * FROM anywhere");
}

#[test]
fn test_exact_error_messages() {
    let mut engine = Engine::new();
    engine.execute_query("CREATE DATABASE d");
    assert_eq!(
        engine.execute_query("CREATE DATABASE d").error.as_deref(),
        Some("Database 'd' already exists")
    );
    assert_eq!(
        engine.execute_query("USE ghost").error.as_deref(),
        Some("Database 'ghost' does not exist")
    );

    engine.execute_query("USE d");
    assert_eq!(
        engine.execute_query("SELECT * FROM ghosts").error.as_deref(),
        Some("Table 'ghosts' does not exist")
    );

    engine.execute_query("CREATE TABLE t (a INT, b INT)");
    assert_eq!(
        engine.execute_query("INSERT INTO t VALUES (1)").error.as_deref(),
        Some("Column count doesn't match. Expected 2, got 1")
    );
    assert_eq!(
        engine.execute_query("INSERT INTO t VALUES (1, 'x')").error.as_deref(),
        Some("Cannot convert 'x' to INT")
    );
}

#[test]
fn test_history_caps_at_fifty() {
    let mut engine = Engine::new();
    for i in 0..55 {
        engine.execute_query(&format!("CREATE DATABASE db{i}"));
    }
    let entries: Vec<_> = engine.history().collect();
    assert_eq!(entries.len(), 50);
    assert_eq!(entries[0].query, "CREATE DATABASE db54");
    // The five oldest fell off the end.
    assert_eq!(entries[49].query, "CREATE DATABASE db5");
}

#[test]
fn test_history_truncates_long_queries() {
    let mut engine = Engine::new();
    let long = format!("CREATE DATABASE {}", "x".repeat(1200));
    engine.execute_query(&long);

    let entry = engine.history().next().unwrap();
    assert_eq!(entry.query.chars().count(), 1003);
    assert!(entry.query.ends_with("..."));
}

#[test]
fn test_history_summarizes_without_row_data() {
    let mut engine = Engine::with_sample_data();
    engine.execute_query("SELECT * FROM employees");

    let entry = engine.history().next().unwrap();
    assert!(entry.success);
    assert_eq!(entry.data_length, 15);
    assert_eq!(entry.columns.len(), 7);
}

#[test]
fn test_envelope_serializes_camel_case() {
    let mut engine = Engine::new();
    engine.execute_query("CREATE DATABASE d");
    engine.execute_query("USE d");
    engine.execute_query("CREATE TABLE t (id INT, name VARCHAR(50))");
    engine.execute_query("INSERT INTO t VALUES (1, 'Ann')");
    let result = engine.execute_query("SELECT * FROM t");

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], serde_json::json!(true));
    assert_eq!(json["affectedRows"], serde_json::json!(0));
    assert_eq!(json["data"][0], serde_json::json!({"id": 1, "name": "Ann"}));
    assert_eq!(json["columns"], serde_json::json!(["id", "name"]));
    assert!(json.get("executionTime").is_some());
    assert!(json.get("timestamp").is_some());
    // None fields are omitted entirely.
    assert!(json.get("message").is_none());
    assert!(json.get("error").is_none());
}

#[test]
fn test_null_round_trip_serialization() {
    let mut engine = Engine::new();
    engine.execute_query("CREATE DATABASE d");
    engine.execute_query("USE d");
    engine.execute_query("CREATE TABLE t (id INT, note TEXT)");
    engine.execute_query("INSERT INTO t VALUES (1, NULL)");
    let result = engine.execute_query("SELECT * FROM t");

    assert_eq!(result.data[0].get("note"), Some(&Value::Null));
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["data"][0]["note"], serde_json::Value::Null);
}

#[test]
fn test_dropping_current_database_deselects_it() {
    let mut engine = Engine::new();
    engine.execute_query("CREATE DATABASE d");
    engine.execute_query("USE d");
    assert_eq!(engine.current_database(), Some("d"));

    let result = engine.execute_query("DROP DATABASE d");
    assert_eq!(
        result.message.as_deref(),
        Some("Database 'd' dropped successfully")
    );
    assert_eq!(engine.current_database(), None);

    let result = engine.execute_query("SHOW TABLES");
    assert_eq!(
        result.error.as_deref(),
        Some("No database selected. Use \"USE database_name\" first.")
    );
}

#[test]
fn test_drop_table_message_and_removal() {
    let mut engine = Engine::new();
    engine.execute_query("CREATE DATABASE d");
    engine.execute_query("USE d");
    engine.execute_query("CREATE TABLE t (id INT)");

    let result = engine.execute_query("DROP TABLE t");
    assert_eq!(result.message.as_deref(), Some("Table 't' dropped successfully"));
    assert!(engine.table_names().is_empty());
}

#[test]
fn test_not_null_violation_message() {
    let mut engine = Engine::new();
    engine.execute_query("CREATE DATABASE d");
    engine.execute_query("USE d");
    engine.execute_query("CREATE TABLE t (id INT, name VARCHAR(50) NOT NULL)");

    let result = engine.execute_query("INSERT INTO t VALUES (1, NULL)");
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Column 'name' cannot be NULL"));

    // The failed insert left nothing behind.
    let count = engine.execute_query("SELECT COUNT(*) FROM t");
    assert_eq!(count.data[0].get("count_all"), Some(&Value::Int(0)));
}
