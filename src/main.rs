//! SqlSim - interactive shell for the in-memory SQL database simulator.

use std::io::{self, Write};

use sqlsim::Engine;

fn main() {
    print_welcome();

    let mut engine = Engine::with_sample_data();

    loop {
        match engine.current_database() {
            Some(db) => print!("sqlsim [{db}]> "),
            None => print!("sqlsim> "),
        }
        io::stdout().flush().unwrap();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        // Handle both "help" and ".help", "quit" and ".quit", etc.
        let cmd = input.strip_prefix('.').unwrap_or(input);

        match cmd {
            "help" | "?" => {
                print_help();
                continue;
            }
            "quit" | "exit" | "q" => break,
            "databases" => {
                println!("{}", engine.execute_query("SHOW DATABASES"));
                continue;
            }
            "tables" => {
                println!("{}", engine.execute_query("SHOW TABLES"));
                continue;
            }
            "history" => {
                print_history(&engine);
                continue;
            }
            "clear" | "cls" => {
                print!("\x1B[2J\x1B[1;1H"); // ANSI clear screen
                continue;
            }
            _ => {}
        }

        // If input started with . but wasn't recognized
        if input.starts_with('.') {
            println!("Unknown command: {input}");
            println!("Type 'help' for available commands.");
            continue;
        }

        // Execute SQL
        println!("{}", engine.execute_query(input));
    }
    println!("Goodbye!");
}

fn print_history(engine: &Engine) {
    if engine.history().next().is_none() {
        println!("History is empty.");
        return;
    }
    for entry in engine.history() {
        let marker = if entry.success { " ok" } else { "ERR" };
        println!(
            "  [{:>3}] {} {:>5}ms  {}",
            entry.id, marker, entry.execution_time_ms, entry.query
        );
    }
}

fn print_welcome() {
    println!(
        r#"
╔═══════════════════════════════════════════════════════════════╗
║                         SqlSim REPL                           ║
║               In-Memory SQL Database Simulator                ║
╚═══════════════════════════════════════════════════════════════╝

Demo data is preloaded: employee_db (employees, departments) and
ecommerce_db (products). employee_db is selected.

Quick Start:
  SHOW TABLES;
  SELECT * FROM employees LIMIT 5;
  SELECT department, COUNT(*) FROM employees GROUP BY department;

Type 'help' for all commands, 'quit' to exit.
"#
    );
}

fn print_help() {
    println!(
        r#"
┌─────────────────────────────────────────────────────────────────┐
│                       SqlSim Commands                           │
├─────────────────────────────────────────────────────────────────┤
│ INFORMATION                                                     │
│   .databases        List all databases                          │
│   .tables           List tables in the current database         │
│   .history          Show executed queries, newest first         │
│   help              Show this help message                      │
│                                                                 │
│ OTHER                                                           │
│   .clear            Clear screen                                │
│   quit / exit       Exit REPL                                   │
├─────────────────────────────────────────────────────────────────┤
│ SQL COMMANDS                                                    │
├─────────────────────────────────────────────────────────────────┤
│ CREATE DATABASE <name>;   DROP DATABASE <name>;   USE <name>;   │
│ SHOW DATABASES;           SHOW TABLES;                          │
│                                                                 │
│ CREATE TABLE <name> (<column> <type> [constraints], ...);       │
│   Types: INT, DECIMAL(p,s), VARCHAR(n), TEXT, BOOLEAN, DATE     │
│   Constraints: PRIMARY KEY, NOT NULL, AUTO_INCREMENT,           │
│                DEFAULT <value>                                  │
│ DROP TABLE <name>;        DESCRIBE <name>;                      │
│ ALTER TABLE <name> ADD COLUMN <col> <type> [DEFAULT <value>];   │
│                                                                 │
│ INSERT INTO <table> VALUES (<values>);                          │
│ SELECT <columns> FROM <table>                                   │
│     [JOIN <table2> ON <t1.col> = <t2.col>]                      │
│     [WHERE <col> <op> <value>]                                  │
│     [GROUP BY <cols>] [HAVING <cond>]                           │
│     [ORDER BY <col> [ASC|DESC]] [LIMIT <n>];                    │
│   Aggregates: COUNT, SUM, AVG, MIN, MAX                         │
│   Operators: = != <> < > <= >= LIKE ('%' and '_' wildcards)     │
│ UPDATE <table> SET <col> = <val>, ... [WHERE ...];              │
│ DELETE FROM <table> [WHERE ...];                                │
└─────────────────────────────────────────────────────────────────┘
"#
    );
}
