//! Integration tests for query evaluation over the sample data

use rand::Rng;
use sqlsim::{Engine, Value};

#[test]
fn test_count_star_matches_select_star() {
    let mut engine = Engine::with_sample_data();
    let all = engine.execute_query("SELECT * FROM employees");
    let count = engine.execute_query("SELECT COUNT(*) FROM employees");
    assert_eq!(
        count.data[0].get("count_all"),
        Some(&Value::Int(all.data.len() as i64))
    );
}

#[test]
fn test_join_cardinality_and_key_equality() {
    let mut engine = Engine::with_sample_data();
    let left = engine.execute_query("SELECT * FROM employees").data.len();
    let right = engine.execute_query("SELECT * FROM departments").data.len();

    let result = engine.execute_query(
        "SELECT e.name, e.department, d.name FROM employees e JOIN departments d ON e.department = d.name",
    );
    assert!(result.success, "{:?}", result.error);
    assert!(result.data.len() <= left * right);
    // Every employee's department exists, so nobody drops out.
    assert_eq!(result.data.len(), 15);
    for row in &result.data {
        assert_eq!(row.get("e.department"), row.get("d.name"));
    }
}

#[test]
fn test_join_star_projects_left_columns() {
    let mut engine = Engine::with_sample_data();
    let result = engine.execute_query(
        "SELECT * FROM employees e JOIN departments d ON e.department = d.name",
    );
    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        result.columns,
        vec!["id", "name", "email", "department", "salary", "hire_date", "status"]
    );
    assert_eq!(result.data.len(), 15);
}

#[test]
fn test_group_by_covers_every_row() {
    let mut engine = Engine::with_sample_data();
    let result =
        engine.execute_query("SELECT department, COUNT(*) as c FROM employees GROUP BY department");
    assert_eq!(result.data.len(), 4);

    let total: i64 = result
        .data
        .iter()
        .map(|row| match row.get("c") {
            Some(Value::Int(n)) => *n,
            other => panic!("Expected integer count, got {other:?}"),
        })
        .sum();
    assert_eq!(total, 15);
}

#[test]
fn test_delete_conserves_row_count() {
    let mut engine = Engine::with_sample_data();
    engine.execute_query("CREATE DATABASE scratch");
    engine.execute_query("USE scratch");
    engine.execute_query("CREATE TABLE points (id INT, val INT)");

    let mut rng = rand::thread_rng();
    let n = rng.gen_range(20..40);
    for i in 0..n {
        let val: i32 = rng.gen_range(0..100);
        engine.execute_query(&format!("INSERT INTO points VALUES ({i}, {val})"));
    }

    let threshold: i32 = rng.gen_range(0..100);
    let before = engine.execute_query("SELECT COUNT(*) FROM points");
    let deleted = engine.execute_query(&format!("DELETE FROM points WHERE val > {threshold}"));
    let after = engine.execute_query("SELECT COUNT(*) FROM points");

    let count = |result: &sqlsim::QueryResult| match result.data[0].get("count_all") {
        Some(Value::Int(n)) => *n,
        other => panic!("Expected integer count, got {other:?}"),
    };
    assert_eq!(
        count(&before) - count(&after),
        deleted.affected_rows as i64
    );
}

#[test]
fn test_order_by_desc_with_limit() {
    let mut engine = Engine::with_sample_data();
    let result =
        engine.execute_query("SELECT name, salary FROM employees ORDER BY salary DESC LIMIT 3");
    assert_eq!(result.data.len(), 3);

    let salaries: Vec<&Value> = result
        .data
        .iter()
        .map(|row| row.get("salary").unwrap())
        .collect();
    assert_eq!(
        salaries,
        vec![&Value::Int(95000), &Value::Int(92000), &Value::Int(90000)]
    );
}

#[test]
fn test_like_is_case_insensitive() {
    let mut engine = Engine::with_sample_data();
    let result = engine.execute_query("SELECT name FROM employees WHERE name LIKE '%AN%'");
    assert!(result.success, "{:?}", result.error);

    let mut names: Vec<String> = result
        .data
        .iter()
        .map(|row| row.get("name").unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Ahmed Hassan", "Hiroshi Tanaka", "Isabella Santos"]);
}

#[test]
fn test_date_comparison_is_lexicographic() {
    let mut engine = Engine::with_sample_data();
    let result = engine.execute_query("SELECT name FROM employees WHERE hire_date > '2021-12-31'");
    // Exactly the four 2022 hires qualify.
    assert_eq!(result.data.len(), 4);
    for row in &result.data {
        let name = row.get("name").unwrap().to_string();
        assert!(
            ["Maria Rodriguez", "Ahmed Hassan", "Robert Williams", "Carlos Mendoza"]
                .contains(&name.as_str()),
            "unexpected row: {name}"
        );
    }
}

#[test]
fn test_column_alias_renames_output() {
    let mut engine = Engine::with_sample_data();
    let result = engine.execute_query("SELECT name AS employee_name FROM employees LIMIT 1");
    assert_eq!(result.columns, vec!["employee_name"]);
    assert!(result.data[0].contains("employee_name"));
}

#[test]
fn test_whole_table_aggregates() {
    let mut engine = Engine::with_sample_data();
    let result = engine
        .execute_query("SELECT SUM(salary), MIN(salary), MAX(salary) FROM employees");
    assert_eq!(result.data.len(), 1);

    let row = &result.data[0];
    assert_eq!(row.get("sum_salary"), Some(&Value::Float(1_168_000.0)));
    assert_eq!(row.get("min_salary"), Some(&Value::Float(62_000.0)));
    assert_eq!(row.get("max_salary"), Some(&Value::Float(95_000.0)));
    assert_eq!(result.columns, vec!["sum_salary", "min_salary", "max_salary"]);
}

#[test]
fn test_group_by_average_salary() {
    let mut engine = Engine::with_sample_data();
    let result = engine.execute_query(
        "SELECT department, AVG(salary) AS avg_salary FROM employees GROUP BY department",
    );
    assert_eq!(result.data.len(), 4);

    let engineering = result
        .data
        .iter()
        .find(|row| row.get("department") == Some(&Value::Text("Engineering".to_string())))
        .unwrap();
    // (85000 + 92000 + 88000 + 95000 + 90000) / 5
    assert_eq!(engineering.get("avg_salary"), Some(&Value::Float(90_000.0)));
}

#[test]
fn test_databases_are_isolated() {
    let mut engine = Engine::with_sample_data();

    // Seeding leaves employee_db selected; products lives in ecommerce_db.
    let result = engine.execute_query("SELECT * FROM products");
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Table 'products' does not exist"));

    engine.execute_query("USE ecommerce_db");
    let result = engine.execute_query("SELECT name, price FROM products WHERE name = 'Laptop Pro'");
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.data.len(), 1);
    // INT columns truncate the seeded decimal prices.
    assert_eq!(result.data[0].get("price"), Some(&Value::Int(1299)));
}

#[test]
fn test_where_and_order_compose() {
    let mut engine = Engine::with_sample_data();
    let result = engine.execute_query(
        "SELECT name, salary FROM employees WHERE department = 'Sales' ORDER BY salary",
    );
    assert_eq!(result.data.len(), 4);

    let salaries: Vec<&Value> = result
        .data
        .iter()
        .map(|row| row.get("salary").unwrap())
        .collect();
    assert_eq!(
        salaries,
        vec![
            &Value::Int(75_000),
            &Value::Int(76_000),
            &Value::Int(79_000),
            &Value::Int(82_000)
        ]
    );
}

#[test]
fn test_not_equal_filters_status() {
    let mut engine = Engine::with_sample_data();
    let result = engine.execute_query("SELECT name FROM employees WHERE status != 'Active'");
    assert_eq!(result.data.len(), 1);
    assert_eq!(
        result.data[0].get("name"),
        Some(&Value::Text("Carlos Mendoza".to_string()))
    );
}

#[test]
fn test_limit_zero_returns_everything() {
    let mut engine = Engine::with_sample_data();
    let result = engine.execute_query("SELECT * FROM employees LIMIT 0");
    assert_eq!(result.data.len(), 15);
}
