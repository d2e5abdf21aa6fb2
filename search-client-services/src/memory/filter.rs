//! Filter expression evaluation for the in-memory engine.
//!
//! Supports the shape `field op literal [and field op literal ...]` where
//! `op` is `eq` or `ne` and a literal is a single-quoted text value (with
//! `''` escaping an embedded quote), an integer, a double, or `true`/`false`.
//! Text literals compare against datetime fields when they parse as RFC 3339.

use chrono::DateTime;

use search_client_shared::{Document, FieldValue, IndexSchema};

/// A parsed filter: a conjunction of field comparisons.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FilterExpr {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq)]
struct Clause {
    field: String,
    op: Op,
    literal: Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Text(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
}

#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(word) => format!("'{}'", word),
            Token::Quoted(text) => format!("'{}'", text),
        }
    }
}

impl FilterExpr {
    /// Parse a filter expression.
    pub fn parse(input: &str) -> Result<Self, String> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err("Filter expression is empty".to_string());
        }

        let mut clauses = Vec::new();
        let mut iter = tokens.into_iter();
        loop {
            let field = match iter.next() {
                Some(Token::Word(word)) => word,
                Some(token) => return Err(format!("Expected a field name, found {}", token.describe())),
                None => return Err("Expected a field name".to_string()),
            };
            let op = match iter.next() {
                Some(Token::Word(word)) if word == "eq" => Op::Eq,
                Some(Token::Word(word)) if word == "ne" => Op::Ne,
                _ => return Err(format!("Expected 'eq' or 'ne' after '{}'", field)),
            };
            let literal = match iter.next() {
                Some(Token::Quoted(text)) => Literal::Text(text),
                Some(Token::Word(word)) => parse_word_literal(&word)?,
                None => return Err(format!("Expected a literal after '{}'", field)),
            };
            clauses.push(Clause { field, op, literal });

            match iter.next() {
                None => break,
                Some(Token::Word(word)) if word == "and" => continue,
                Some(token) => return Err(format!("Expected 'and', found {}", token.describe())),
            }
        }

        Ok(Self { clauses })
    }

    /// Check every referenced field against the schema.
    ///
    /// Fields must exist and be marked filterable.
    pub fn validate(&self, schema: &IndexSchema) -> Result<(), String> {
        for clause in &self.clauses {
            match schema.field(&clause.field) {
                None => return Err(format!("Unknown filter field '{}'", clause.field)),
                Some(field) if !field.filterable => {
                    return Err(format!("Field '{}' is not filterable", clause.field));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Whether the document satisfies every clause.
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses.iter().all(|clause| clause.matches(document))
    }
}

impl Clause {
    fn matches(&self, document: &Document) -> bool {
        let equal = match document.get(&self.field) {
            None => false,
            Some(value) => literal_equals(value, &self.literal),
        };
        match self.op {
            Op::Eq => equal,
            Op::Ne => !equal,
        }
    }
}

fn literal_equals(value: &FieldValue, literal: &Literal) -> bool {
    match (value, literal) {
        (FieldValue::Text(text), Literal::Text(wanted)) => text == wanted,
        (FieldValue::DateTime(stored), Literal::Text(wanted)) => {
            DateTime::parse_from_rfc3339(wanted)
                .map(|parsed| parsed == *stored)
                .unwrap_or(false)
        }
        (FieldValue::Boolean(stored), Literal::Boolean(wanted)) => stored == wanted,
        (value, Literal::Integer(wanted)) => value.as_double() == Some(*wanted as f64),
        (value, Literal::Double(wanted)) => value.as_double() == Some(*wanted),
        _ => false,
    }
}

fn parse_word_literal(word: &str) -> Result<Literal, String> {
    if word == "true" {
        return Ok(Literal::Boolean(true));
    }
    if word == "false" {
        return Ok(Literal::Boolean(false));
    }
    if let Ok(integer) = word.parse::<i64>() {
        return Ok(Literal::Integer(integer));
    }
    if let Ok(double) = word.parse::<f64>() {
        return Ok(Literal::Double(double));
    }
    Err(format!("Invalid literal '{}'", word))
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '\'' {
            chars.next();
            let mut text = String::new();
            loop {
                match chars.next() {
                    Some('\'') => {
                        // A doubled quote is an escaped quote inside the literal.
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            text.push('\'');
                        } else {
                            break;
                        }
                    }
                    Some(other) => text.push(other),
                    None => return Err("Unterminated text literal".to_string()),
                }
            }
            tokens.push(Token::Quoted(text));
            continue;
        }

        let mut word = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() || c == '\'' {
                break;
            }
            word.push(c);
            chars.next();
        }
        tokens.push(Token::Word(word));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_client_shared::{FieldDefinition, FieldKind};

    fn schema() -> IndexSchema {
        IndexSchema::new("documents")
            .with_field(FieldDefinition::new("id", FieldKind::String).key().filterable())
            .with_field(FieldDefinition::new("type", FieldKind::String).filterable())
            .with_field(FieldDefinition::new("count", FieldKind::Int64).filterable())
            .with_field(FieldDefinition::new("title", FieldKind::String))
    }

    #[test]
    fn test_parse_single_clause() {
        let filter = FilterExpr::parse("type eq 'json'").unwrap();
        let doc = Document::builder().add_text("type", "json").build();
        assert!(filter.matches(&doc));

        let other = Document::builder().add_text("type", "xml").build();
        assert!(!filter.matches(&other));
    }

    #[test]
    fn test_parse_and_chain() {
        let filter = FilterExpr::parse("type eq 'json' and count eq 3").unwrap();
        let both = Document::builder()
            .add_text("type", "json")
            .add_integer("count", 3)
            .build();
        assert!(filter.matches(&both));

        let one = Document::builder()
            .add_text("type", "json")
            .add_integer("count", 4)
            .build();
        assert!(!filter.matches(&one));
    }

    #[test]
    fn test_quoted_literal_may_contain_and() {
        let filter = FilterExpr::parse("title eq 'war and peace'").unwrap();
        let doc = Document::builder().add_text("title", "war and peace").build();
        assert!(filter.matches(&doc));
    }

    #[test]
    fn test_escaped_quote_in_literal() {
        let filter = FilterExpr::parse("title eq 'it''s fine'").unwrap();
        let doc = Document::builder().add_text("title", "it's fine").build();
        assert!(filter.matches(&doc));
    }

    #[test]
    fn test_ne_matches_absent_field() {
        let filter = FilterExpr::parse("type ne 'json'").unwrap();
        assert!(filter.matches(&Document::new()));
        assert!(filter.matches(&Document::builder().add_text("type", "xml").build()));
        assert!(!filter.matches(&Document::builder().add_text("type", "json").build()));
    }

    #[test]
    fn test_integer_literal_matches_double_value() {
        let filter = FilterExpr::parse("count eq 3").unwrap();
        let doc = Document::builder().add_double("count", 3.0).build();
        assert!(filter.matches(&doc));
    }

    #[test]
    fn test_boolean_literal() {
        let filter = FilterExpr::parse("archived eq true").unwrap();
        assert!(filter.matches(&Document::builder().add_boolean("archived", true).build()));
        assert!(!filter.matches(&Document::builder().add_boolean("archived", false).build()));
    }

    #[test]
    fn test_datetime_text_literal() {
        use chrono::{TimeZone, Utc};
        let dt = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let filter = FilterExpr::parse("publishedDate eq '2024-03-15T09:00:00Z'").unwrap();
        let doc = Document::builder().add_datetime("publishedDate", dt).build();
        assert!(filter.matches(&doc));
    }

    #[test]
    fn test_parse_errors() {
        assert!(FilterExpr::parse("").is_err());
        assert!(FilterExpr::parse("type").is_err());
        assert!(FilterExpr::parse("type gt 'json'").is_err());
        assert!(FilterExpr::parse("type eq 'json' or count eq 3").is_err());
        assert!(FilterExpr::parse("type eq 'unterminated").is_err());
        assert!(FilterExpr::parse("count eq banana").is_err());
    }

    #[test]
    fn test_validate_unknown_field() {
        let filter = FilterExpr::parse("missing eq 'x'").unwrap();
        assert!(filter.validate(&schema()).is_err());
    }

    #[test]
    fn test_validate_non_filterable_field() {
        let filter = FilterExpr::parse("title eq 'x'").unwrap();
        assert!(filter.validate(&schema()).is_err());

        let filter = FilterExpr::parse("type eq 'x' and count ne 2").unwrap();
        assert!(filter.validate(&schema()).is_ok());
    }
}
