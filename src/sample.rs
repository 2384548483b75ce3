//! Demo data.
//!
//! Seeds two showcase databases by running the same statements a user could
//! type: `employee_db` with employees and departments, `ecommerce_db` with
//! products. Leaves `employee_db` selected.

use crate::engine::Engine;

const EMPLOYEES: [(u32, &str, &str, &str, u32, &str, &str); 15] = [
    (1, "Amara Okafor", "amara.okafor@company.com", "Engineering", 85000, "2021-03-15", "Active"),
    (2, "Li Wei Chen", "li.chen@company.com", "Engineering", 92000, "2020-11-08", "Active"),
    (3, "Maria Rodriguez", "maria.rodriguez@company.com", "Marketing", 68000, "2022-01-20", "Active"),
    (4, "James Mitchell", "james.mitchell@company.com", "Sales", 75000, "2021-08-12", "Active"),
    (5, "Priya Sharma", "priya.sharma@company.com", "Engineering", 88000, "2021-05-03", "Active"),
    (6, "Ahmed Hassan", "ahmed.hassan@company.com", "HR", 62000, "2022-04-15", "Active"),
    (7, "Sarah Johnson", "sarah.johnson@company.com", "Marketing", 71000, "2021-09-22", "Active"),
    (8, "Hiroshi Tanaka", "hiroshi.tanaka@company.com", "Engineering", 95000, "2020-07-14", "Active"),
    (9, "Isabella Santos", "isabella.santos@company.com", "Sales", 79000, "2021-12-05", "Active"),
    (10, "Robert Williams", "robert.williams@company.com", "HR", 65000, "2022-02-28", "Active"),
    (11, "Fatima Al-Zahra", "fatima.alzahra@company.com", "Marketing", 73000, "2021-10-18", "Active"),
    (12, "David Kim", "david.kim@company.com", "Sales", 82000, "2020-12-02", "Active"),
    (13, "Elena Petrov", "elena.petrov@company.com", "Engineering", 90000, "2021-06-30", "Active"),
    (14, "Carlos Mendoza", "carlos.mendoza@company.com", "HR", 67000, "2022-03-10", "On Leave"),
    (15, "Aisha Patel", "aisha.patel@company.com", "Sales", 76000, "2021-11-25", "Active"),
];

const DEPARTMENTS: [(u32, &str, u32, u32, &str); 4] = [
    (1, "Engineering", 8, 750000, "San Francisco"),
    (2, "Marketing", 7, 250000, "New York"),
    (3, "HR", 10, 180000, "Chicago"),
    (4, "Sales", 12, 400000, "Austin"),
];

const PRODUCTS: [(u32, &str, &str, &str, u32, &str); 5] = [
    (1, "Laptop Pro", "Electronics", "1299.99", 50, "High-performance laptop"),
    (2, "Wireless Mouse", "Electronics", "29.99", 200, "Ergonomic wireless mouse"),
    (3, "Coffee Mug", "Home & Garden", "12.99", 100, "Ceramic coffee mug"),
    (4, "Desk Chair", "Furniture", "199.99", 25, "Ergonomic office chair"),
    (5, "Smartphone", "Electronics", "699.99", 75, "Latest smartphone model"),
];

/// Load the demo databases into `engine`.
pub fn seed(engine: &mut Engine) {
    engine.execute_query("CREATE DATABASE employee_db");
    engine.execute_query("USE employee_db");

    engine.execute_query(
        "CREATE TABLE employees (
            id INT PRIMARY KEY,
            name VARCHAR(100),
            email VARCHAR(100),
            department VARCHAR(50),
            salary INT,
            hire_date DATE,
            status VARCHAR(20)
        )",
    );
    for (id, name, email, department, salary, hire_date, status) in EMPLOYEES {
        engine.execute_query(&format!(
            "INSERT INTO employees VALUES ({id}, '{name}', '{email}', '{department}', {salary}, '{hire_date}', '{status}')"
        ));
    }

    engine.execute_query(
        "CREATE TABLE departments (
            id INT PRIMARY KEY,
            name VARCHAR(50),
            manager_id INT,
            budget INT,
            location VARCHAR(50)
        )",
    );
    for (id, name, manager_id, budget, location) in DEPARTMENTS {
        engine.execute_query(&format!(
            "INSERT INTO departments VALUES ({id}, '{name}', {manager_id}, {budget}, '{location}')"
        ));
    }

    engine.execute_query("CREATE DATABASE ecommerce_db");
    engine.execute_query("USE ecommerce_db");

    engine.execute_query(
        "CREATE TABLE products (
            id INT PRIMARY KEY,
            name VARCHAR(100),
            category VARCHAR(50),
            price INT,
            stock INT,
            description TEXT
        )",
    );
    for (id, name, category, price, stock, description) in PRODUCTS {
        engine.execute_query(&format!(
            "INSERT INTO products VALUES ({id}, '{name}', '{category}', {price}, {stock}, '{description}')"
        ));
    }

    engine.execute_query("USE employee_db");
}
