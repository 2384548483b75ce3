//! Statement parsing.
//!
//! `parse` dispatches on the leading keywords and hands each statement off to
//! a fixed-shape parser:
//! - catalog statements: CREATE/DROP DATABASE, USE, SHOW DATABASES/TABLES
//! - table statements: CREATE/DROP TABLE, ALTER TABLE ADD COLUMN, DESCRIBE
//! - row statements: INSERT, SELECT (JOIN, GROUP BY, HAVING, ORDER BY,
//!   LIMIT), UPDATE, DELETE
//!
//! SELECT and UPDATE tails are sliced into clause substrings with a
//! quote-aware keyword scan; the substrings then go through the parsers in
//! [`crate::clause`]. Clauses must appear in canonical order.

use crate::clause::{self, OrderSpec, SelectColumn, is_word_byte};
use crate::condition::{CompareOp, Condition};
use crate::error::{EngineError, Result};
use crate::schema::Column;

// ==================== STATEMENTS ====================

/// A parsed SQL statement.
#[derive(Clone, Debug)]
pub enum Statement {
    CreateDatabase {
        name: String,
    },
    DropDatabase {
        name: String,
    },
    UseDatabase {
        name: String,
    },
    ShowDatabases,
    ShowTables,
    CreateTable {
        name: String,
        columns: Vec<Column>,
    },
    DropTable {
        name: String,
    },
    AlterTableAddColumn {
        table: String,
        column: Column,
    },
    Describe {
        table: String,
    },
    Insert {
        table: String,
        values: Vec<String>,
    },
    Select(SelectStatement),
    Update {
        table: String,
        assignments: Vec<(String, String)>,
        where_clause: Option<Condition>,
    },
    Delete {
        table: String,
        where_clause: Option<Condition>,
    },
}

/// The pieces of a SELECT statement.
#[derive(Clone, Debug)]
pub struct SelectStatement {
    pub columns: Vec<SelectColumn>,
    pub table: String,
    pub join: Option<JoinClause>,
    pub where_clause: Option<Condition>,
    pub group_by: Vec<String>,
    pub having: Option<Condition>,
    pub order_by: Option<OrderSpec>,
    pub limit: Option<i64>,
}

/// An equi-join: `FROM left [a] JOIN right [b] ON a.col = b.col`.
///
/// Aliases default to the table names. `left_column`/`right_column` are
/// already oriented against the left and right tables regardless of which
/// side of the ON condition named them.
#[derive(Clone, Debug)]
pub struct JoinClause {
    pub table: String,
    pub left_alias: String,
    pub right_alias: String,
    pub left_column: String,
    pub right_column: String,
}

// ==================== DISPATCH ====================

/// Parse one cleaned SQL statement.
///
/// The engine trims input and strips trailing semicolons before calling; a
/// single trailing semicolon is still tolerated for direct use.
pub fn parse(sql: &str) -> Result<Statement> {
    let sql = match sql.trim_end().strip_suffix(';') {
        Some(stripped) => stripped.trim_end(),
        None => sql,
    };
    let mut parser = Parser::new(sql);
    let keyword = match parser.read_word() {
        Some(word) => word.to_uppercase(),
        None => return Err(EngineError::EmptyQuery),
    };

    match keyword.as_str() {
        "CREATE" => match parser.peek_word_upper().as_str() {
            "DATABASE" => {
                parser.read_word();
                let name = parser.parse_database_name()?;
                Ok(Statement::CreateDatabase { name })
            }
            "TABLE" => {
                parser.read_word();
                parser.parse_create_table()
            }
            _ => Err(unsupported(sql)),
        },
        "DROP" => match parser.peek_word_upper().as_str() {
            "DATABASE" => {
                parser.read_word();
                let name = parser.parse_database_name()?;
                Ok(Statement::DropDatabase { name })
            }
            "TABLE" => {
                parser.read_word();
                parser.parse_drop_table()
            }
            _ => Err(unsupported(sql)),
        },
        "USE" => {
            let name = parser.parse_database_name()?;
            Ok(Statement::UseDatabase { name })
        }
        "SHOW" => match parser.peek_word_upper().as_str() {
            "DATABASES" => {
                parser.read_word();
                if parser.finished() {
                    Ok(Statement::ShowDatabases)
                } else {
                    Err(unsupported(sql))
                }
            }
            "TABLES" => {
                parser.read_word();
                if parser.finished() {
                    Ok(Statement::ShowTables)
                } else {
                    Err(unsupported(sql))
                }
            }
            _ => Err(unsupported(sql)),
        },
        "ALTER" => {
            if parser.eat_keyword("TABLE") {
                parser.parse_alter_table()
            } else {
                Err(unsupported(sql))
            }
        }
        "DESCRIBE" | "DESC" => parser.parse_describe(),
        "INSERT" => {
            if parser.eat_keyword("INTO") {
                parser.parse_insert()
            } else {
                Err(unsupported(sql))
            }
        }
        "SELECT" => parser.parse_select(),
        "UPDATE" => parser.parse_update(),
        "DELETE" => {
            if parser.eat_keyword("FROM") {
                parser.parse_delete()
            } else {
                Err(unsupported(sql))
            }
        }
        _ => Err(unsupported(sql)),
    }
}

fn unsupported(sql: &str) -> EngineError {
    EngineError::Unsupported(sql.trim().trim_end_matches(';').trim_end().to_string())
}

// ==================== PARSER ====================

/// Cursor over one statement's text.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser { input, pos: 0 }
    }

    // ==================== STATEMENT PARSERS ====================

    /// `<name>` after CREATE DATABASE, DROP DATABASE or USE.
    fn parse_database_name(&mut self) -> Result<String> {
        let name = self
            .read_word()
            .ok_or(EngineError::InvalidDatabaseCommand)?
            .to_string();
        if !self.finished() {
            return Err(EngineError::InvalidDatabaseCommand);
        }
        Ok(name)
    }

    /// `<name> (col type [constraints], ...)` after CREATE TABLE.
    fn parse_create_table(&mut self) -> Result<Statement> {
        let name = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("CREATE TABLE"))?
            .to_string();
        if !self.eat_char('(') {
            return Err(EngineError::syntax("CREATE TABLE"));
        }

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_def()?);
            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => self.advance(),
                Some(')') => {
                    self.advance();
                    break;
                }
                _ => return Err(EngineError::syntax("CREATE TABLE")),
            }
        }

        if !self.finished() {
            return Err(EngineError::syntax("CREATE TABLE"));
        }
        Ok(Statement::CreateTable { name, columns })
    }

    /// One column definition inside CREATE TABLE parentheses.
    fn parse_column_def(&mut self) -> Result<Column> {
        let name = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("CREATE TABLE"))?
            .to_string();
        let data_type = self
            .read_type_token()
            .ok_or_else(|| EngineError::syntax("CREATE TABLE"))?;
        let mut column = Column::new(&name, &data_type);

        loop {
            self.skip_whitespace();
            if matches!(self.peek_char(), None | Some(',') | Some(')')) {
                break;
            }
            match self.peek_word_upper().as_str() {
                "PRIMARY" => {
                    self.read_word();
                    if !self.eat_keyword("KEY") {
                        return Err(EngineError::syntax("CREATE TABLE"));
                    }
                    column = column.primary_key();
                }
                "NOT" => {
                    self.read_word();
                    if !self.eat_keyword("NULL") {
                        return Err(EngineError::syntax("CREATE TABLE"));
                    }
                    column = column.not_null();
                }
                "AUTO_INCREMENT" => {
                    self.read_word();
                    column = column.auto_increment();
                }
                "DEFAULT" => {
                    self.read_word();
                    let value = self
                        .read_literal()
                        .ok_or_else(|| EngineError::syntax("CREATE TABLE"))?;
                    column = column.default_value(&value);
                }
                _ => {
                    // Unrecognized constraints (UNIQUE, CHECK, ...) are skipped.
                    if self.read_word().is_none() {
                        return Err(EngineError::syntax("CREATE TABLE"));
                    }
                    self.skip_whitespace();
                    if self.peek_char() == Some('(') && self.skip_parens().is_none() {
                        return Err(EngineError::syntax("CREATE TABLE"));
                    }
                }
            }
        }
        Ok(column)
    }

    /// `<name>` after DROP TABLE.
    fn parse_drop_table(&mut self) -> Result<Statement> {
        let name = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("DROP TABLE"))?
            .to_string();
        if !self.finished() {
            return Err(EngineError::syntax("DROP TABLE"));
        }
        Ok(Statement::DropTable { name })
    }

    /// `<table> ADD COLUMN <name> <type> [DEFAULT <literal>]` after ALTER
    /// TABLE. Any other ALTER form is unsupported.
    fn parse_alter_table(&mut self) -> Result<Statement> {
        let table = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("ALTER TABLE"))?
            .to_string();
        if !self.eat_keyword("ADD") || !self.eat_keyword("COLUMN") {
            return Err(EngineError::UnsupportedAlterOperation);
        }

        let name = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("ALTER TABLE"))?
            .to_string();
        let data_type = self
            .read_type_token()
            .ok_or_else(|| EngineError::syntax("ALTER TABLE"))?;
        let mut column = Column::new(&name, &data_type);

        if self.eat_keyword("DEFAULT") {
            let value = self
                .read_literal()
                .ok_or_else(|| EngineError::syntax("ALTER TABLE"))?;
            column = column.default_value(&value);
        }
        if !self.finished() {
            return Err(EngineError::syntax("ALTER TABLE"));
        }
        Ok(Statement::AlterTableAddColumn { table, column })
    }

    /// `<table>` after DESCRIBE or DESC.
    fn parse_describe(&mut self) -> Result<Statement> {
        let table = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("DESCRIBE"))?
            .to_string();
        if !self.finished() {
            return Err(EngineError::syntax("DESCRIBE"));
        }
        Ok(Statement::Describe { table })
    }

    /// `<table> VALUES (v, ...)` after INSERT INTO. Values stay raw text;
    /// the table coerces them against its column types.
    fn parse_insert(&mut self) -> Result<Statement> {
        let table = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("INSERT"))?
            .to_string();
        if !self.eat_keyword("VALUES") {
            return Err(EngineError::syntax("INSERT"));
        }
        self.skip_whitespace();
        if self.peek_char() != Some('(') {
            return Err(EngineError::syntax("INSERT"));
        }
        self.advance();

        // Greedy to the last closing paren, so quoted values may hold parens.
        let rest = self.rest();
        let close = rest.rfind(')').ok_or_else(|| EngineError::syntax("INSERT"))?;
        let list = &rest[..close];
        self.pos += close + 1;
        if !self.finished() {
            return Err(EngineError::syntax("INSERT"));
        }

        let values = clause::split_list(list)
            .iter()
            .map(|item| clause::strip_outer_quotes(item).to_string())
            .collect();
        Ok(Statement::Insert { table, values })
    }

    /// Everything after the SELECT keyword.
    fn parse_select(&mut self) -> Result<Statement> {
        let rest = self.take_rest();
        let (from_start, from_end) =
            find_keyword(rest, "FROM").ok_or_else(|| EngineError::syntax("SELECT"))?;
        let columns_text = rest[..from_start].trim();
        if columns_text.is_empty() {
            return Err(EngineError::syntax("SELECT"));
        }
        let columns: Vec<SelectColumn> = clause::split_list(columns_text)
            .iter()
            .map(|item| clause::parse_select_column(item))
            .collect();

        let mut tail = Parser::new(&rest[from_end..]);
        let table = tail
            .read_word()
            .ok_or_else(|| EngineError::syntax("SELECT"))?
            .to_string();

        // An alias word is only valid when a JOIN follows.
        let mut left_alias = table.clone();
        let mut word = tail.peek_word_upper();
        if !word.is_empty() && !is_clause_keyword(&word) && !is_join_keyword(&word) {
            if word == "AS" {
                tail.read_word();
            }
            left_alias = tail
                .read_word()
                .ok_or_else(|| EngineError::syntax("SELECT"))?
                .to_string();
            word = tail.peek_word_upper();
            if !is_join_keyword(&word) {
                return Err(EngineError::syntax("SELECT"));
            }
        }
        let join = if is_join_keyword(&word) {
            Some(tail.parse_join_clause(&left_alias)?)
        } else {
            None
        };

        let slices = slice_clauses(tail.take_rest())?;
        let where_clause = match slices.where_text {
            Some(text) => Some(clause::parse_condition(text, "WHERE clause")?),
            None => None,
        };
        let group_by = match slices.group_by_text {
            Some(text) => clause::parse_group_by(text)?,
            None => Vec::new(),
        };
        let having = match slices.having_text {
            Some(text) => {
                let mut condition = clause::parse_condition(text, "HAVING clause")?;
                if condition.op == CompareOp::Like {
                    return Err(EngineError::syntax("HAVING clause"));
                }
                // Equality checks compare rendered values, so a numeric
                // literal is reparsed into the same rendering ("5.0"
                // matches a count of 5).
                if let Ok(number) = condition.value.parse::<f64>() {
                    condition.value = number.to_string();
                }
                Some(condition)
            }
            None => None,
        };
        let order_by = match slices.order_by_text {
            Some(text) => Some(clause::parse_order_by(text)?),
            None => None,
        };
        let limit = match slices.limit_text {
            Some(text) => Some(clause::parse_limit(text)?),
            None => None,
        };

        Ok(Statement::Select(SelectStatement {
            columns,
            table,
            join,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
        }))
    }

    /// `[INNER|LEFT|RIGHT] JOIN <table> [alias] ON a.col = b.col`. Every
    /// join form runs as an inner join.
    fn parse_join_clause(&mut self, left_alias: &str) -> Result<JoinClause> {
        match self.peek_word_upper().as_str() {
            "INNER" | "LEFT" | "RIGHT" => {
                self.read_word();
                if !self.eat_keyword("JOIN") {
                    return Err(EngineError::syntax("JOIN"));
                }
            }
            "JOIN" => {
                self.read_word();
            }
            _ => return Err(EngineError::syntax("JOIN")),
        }

        let table = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("JOIN"))?
            .to_string();
        let mut right_alias = table.clone();
        let word = self.peek_word_upper();
        if word == "AS" {
            self.read_word();
            right_alias = self
                .read_word()
                .ok_or_else(|| EngineError::syntax("JOIN"))?
                .to_string();
        } else if !word.is_empty() && word != "ON" {
            right_alias = self
                .read_word()
                .ok_or_else(|| EngineError::syntax("JOIN"))?
                .to_string();
        }
        if !self.eat_keyword("ON") {
            return Err(EngineError::syntax("JOIN"));
        }

        let (qualifier_a, column_a) = self
            .read_qualified_column()
            .ok_or(EngineError::InvalidJoinCondition)?;
        if !self.eat_char('=') {
            return Err(EngineError::InvalidJoinCondition);
        }
        let (qualifier_b, column_b) = self
            .read_qualified_column()
            .ok_or(EngineError::InvalidJoinCondition)?;

        // Orient the pair against the declared aliases; each qualifier
        // must name one side.
        let (left_column, right_column) = if qualifier_a.eq_ignore_ascii_case(left_alias)
            && qualifier_b.eq_ignore_ascii_case(&right_alias)
        {
            (column_a, column_b)
        } else if qualifier_b.eq_ignore_ascii_case(left_alias)
            && qualifier_a.eq_ignore_ascii_case(&right_alias)
        {
            (column_b, column_a)
        } else {
            return Err(EngineError::InvalidJoinCondition);
        };

        Ok(JoinClause {
            table,
            left_alias: left_alias.to_string(),
            right_alias,
            left_column,
            right_column,
        })
    }

    /// `<table> SET col = value, ... [WHERE condition]` after UPDATE.
    fn parse_update(&mut self) -> Result<Statement> {
        let table = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("UPDATE"))?
            .to_string();
        if !self.eat_keyword("SET") {
            return Err(EngineError::syntax("UPDATE"));
        }

        let rest = self.take_rest();
        let (set_text, where_text) = match find_keyword(rest, "WHERE") {
            Some((start, end)) => (rest[..start].trim(), Some(&rest[end..])),
            None => (rest, None),
        };
        if set_text.is_empty() {
            return Err(EngineError::syntax("UPDATE"));
        }

        let mut assignments = Vec::new();
        for item in clause::split_list(set_text) {
            assignments.push(parse_assignment(&item)?);
        }
        let where_clause = match where_text {
            Some(text) => Some(clause::parse_condition(text, "WHERE clause")?),
            None => None,
        };
        Ok(Statement::Update {
            table,
            assignments,
            where_clause,
        })
    }

    /// `<table> [WHERE condition]` after DELETE FROM.
    fn parse_delete(&mut self) -> Result<Statement> {
        let table = self
            .read_word()
            .ok_or_else(|| EngineError::syntax("DELETE"))?
            .to_string();

        let rest = self.take_rest();
        let where_clause = if rest.is_empty() {
            None
        } else {
            let (start, end) =
                find_keyword(rest, "WHERE").ok_or_else(|| EngineError::syntax("DELETE"))?;
            if !rest[..start].trim().is_empty() {
                return Err(EngineError::syntax("DELETE"));
            }
            Some(clause::parse_condition(&rest[end..], "WHERE clause")?)
        };
        Ok(Statement::Delete {
            table,
            where_clause,
        })
    }

    // ==================== LOW-LEVEL HELPERS ====================

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// True when only whitespace (and at most one semicolon) remains.
    fn finished(&mut self) -> bool {
        self.skip_whitespace();
        if self.peek_char() == Some(';') {
            self.advance();
            self.skip_whitespace();
        }
        self.peek_char().is_none()
    }

    /// Read a run of identifier characters.
    fn read_word(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            None
        } else {
            Some(&self.input[start..self.pos])
        }
    }

    /// The next word, uppercased, without consuming it.
    fn peek_word_upper(&self) -> String {
        self.rest()
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_uppercase()
    }

    /// Consume `word` if it is the next keyword.
    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.peek_word_upper() == word {
            self.read_word();
            true
        } else {
            false
        }
    }

    /// Consume `expected` if it is the next non-whitespace character.
    fn eat_char(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// The remaining input as one trimmed slice, consuming it.
    fn take_rest(&mut self) -> &'a str {
        let rest = self.rest().trim();
        self.pos = self.input.len();
        rest
    }

    /// Read a type token: the type word plus any parenthesized arguments,
    /// verbatim. `DECIMAL(10,2)` stays one token.
    fn read_type_token(&mut self) -> Option<String> {
        self.skip_whitespace();
        let start = self.pos;
        self.read_word()?;
        if self.peek_char() == Some('(') {
            self.skip_parens()?;
        }
        Some(self.input[start..self.pos].to_string())
    }

    /// Skip a balanced parenthesized group starting at `(`.
    fn skip_parens(&mut self) -> Option<()> {
        let mut depth = 0usize;
        while let Some(ch) = self.peek_char() {
            self.advance();
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(());
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Read a quoted string's content or a bare literal token.
    fn read_literal(&mut self) -> Option<String> {
        self.skip_whitespace();
        match self.peek_char()? {
            quote @ ('\'' | '"') => {
                self.advance();
                let start = self.pos;
                while let Some(ch) = self.peek_char() {
                    if ch == quote {
                        break;
                    }
                    self.advance();
                }
                if self.peek_char() != Some(quote) {
                    return None;
                }
                let text = self.input[start..self.pos].to_string();
                self.advance();
                Some(text)
            }
            _ => {
                let start = self.pos;
                while let Some(ch) = self.peek_char() {
                    if ch.is_alphanumeric() || ch == '_' || ch == '.' || ch == '-' {
                        self.advance();
                    } else {
                        break;
                    }
                }
                if self.pos == start {
                    None
                } else {
                    Some(self.input[start..self.pos].to_string())
                }
            }
        }
    }

    /// Read `qualifier.column`.
    fn read_qualified_column(&mut self) -> Option<(String, String)> {
        let qualifier = self.read_word()?.to_string();
        self.skip_whitespace();
        if self.peek_char() != Some('.') {
            return None;
        }
        self.advance();
        let column = self.read_word()?.to_string();
        Some((qualifier, column))
    }
}

/// One `col = value` piece of an UPDATE SET list.
fn parse_assignment(item: &str) -> Result<(String, String)> {
    let (op, start, end) =
        clause::find_operator(item).ok_or_else(|| EngineError::syntax("UPDATE"))?;
    if op != CompareOp::Eq {
        return Err(EngineError::syntax("UPDATE"));
    }
    let column = clause::strip_qualifier(item[..start].trim());
    if !clause::is_identifier(column) {
        return Err(EngineError::syntax("UPDATE"));
    }
    let raw = item[end..].trim();
    if raw.is_empty() {
        return Err(EngineError::syntax("UPDATE"));
    }
    Ok((
        column.to_string(),
        clause::strip_outer_quotes(raw).to_string(),
    ))
}

fn is_clause_keyword(word: &str) -> bool {
    matches!(word, "WHERE" | "GROUP" | "HAVING" | "ORDER" | "LIMIT")
}

fn is_join_keyword(word: &str) -> bool {
    matches!(word, "JOIN" | "INNER" | "LEFT" | "RIGHT")
}

// ==================== CLAUSE SLICING ====================

struct ClauseSlices<'a> {
    where_text: Option<&'a str>,
    group_by_text: Option<&'a str>,
    having_text: Option<&'a str>,
    order_by_text: Option<&'a str>,
    limit_text: Option<&'a str>,
}

/// Slice a SELECT tail into its clause substrings.
///
/// Clauses must appear in canonical order (WHERE, GROUP BY, HAVING, ORDER
/// BY, LIMIT) with nothing before the first keyword.
fn slice_clauses(tail: &str) -> Result<ClauseSlices<'_>> {
    let tail = tail.trim();
    let mut slices = ClauseSlices {
        where_text: None,
        group_by_text: None,
        having_text: None,
        order_by_text: None,
        limit_text: None,
    };
    if tail.is_empty() {
        return Ok(slices);
    }

    // (canonical slot, keyword start, clause text start)
    let mut marks: Vec<(usize, usize, usize)> = Vec::new();
    if let Some((start, end)) = find_keyword(tail, "WHERE") {
        marks.push((0, start, end));
    }
    if let Some((start, end)) = find_compound_keyword(tail, "GROUP", "BY") {
        marks.push((1, start, end));
    }
    if let Some((start, end)) = find_keyword(tail, "HAVING") {
        marks.push((2, start, end));
    }
    if let Some((start, end)) = find_compound_keyword(tail, "ORDER", "BY") {
        marks.push((3, start, end));
    }
    if let Some((start, end)) = find_keyword(tail, "LIMIT") {
        marks.push((4, start, end));
    }

    if marks.is_empty() || marks[0].1 != 0 {
        return Err(EngineError::syntax("SELECT"));
    }
    for pair in marks.windows(2) {
        if pair[1].1 <= pair[0].1 {
            return Err(EngineError::syntax("SELECT"));
        }
    }

    for (i, &(slot, _, text_start)) in marks.iter().enumerate() {
        let text_end = marks
            .get(i + 1)
            .map_or(tail.len(), |&(_, next_start, _)| next_start);
        let text = tail[text_start..text_end].trim();
        match slot {
            0 => slices.where_text = Some(text),
            1 => slices.group_by_text = Some(text),
            2 => slices.having_text = Some(text),
            3 => slices.order_by_text = Some(text),
            _ => slices.limit_text = Some(text),
        }
    }
    Ok(slices)
}

/// All unquoted, word-bounded occurrences of `keyword`, as byte spans.
fn keyword_spans(text: &str, keyword: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let kw = keyword.as_bytes();
    let mut spans = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if b == b'\'' || b == b'"' {
            quote = Some(b);
            i += 1;
            continue;
        }
        if i + kw.len() <= bytes.len()
            && bytes[i..i + kw.len()].eq_ignore_ascii_case(kw)
            && (i == 0 || !is_word_byte(bytes[i - 1]))
            && (i + kw.len() == bytes.len() || !is_word_byte(bytes[i + kw.len()]))
        {
            spans.push((i, i + kw.len()));
            i += kw.len();
            continue;
        }
        i += 1;
    }
    spans
}

fn find_keyword(text: &str, keyword: &str) -> Option<(usize, usize)> {
    keyword_spans(text, keyword).into_iter().next()
}

/// First occurrence of `first` directly followed by `second`, e.g. GROUP BY.
fn find_compound_keyword(text: &str, first: &str, second: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    for (start, end) in keyword_spans(text, first) {
        let mut i = end;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == end {
            continue;
        }
        let second_end = i + second.len();
        if second_end <= bytes.len()
            && bytes[i..second_end].eq_ignore_ascii_case(second.as_bytes())
            && (second_end == bytes.len() || !is_word_byte(bytes[second_end]))
        {
            return Some((start, second_end));
        }
    }
    None
}
