//! # Conjunctive Filter Matcher
//!
//! A minimal interpreter for the filter language the reference store
//! understands: `path op literal` conditions joined by `and`, where `op`
//! is `=` or `>=`, string literals are single-quoted, and bare integer
//! literals may carry a trailing `L` suffix (the open-ended lifetime
//! sentinel is written `9223372036854775807L`).
//!
//! The engine treats where-clauses as opaque; this module exists so the
//! in-memory store can evaluate the clauses the engine composes. The
//! `and` keyword between conditions is optional because reconciliation
//! clauses concatenate the rule expression and sub-expression with a
//! single space, no connective.

use regtag_core::FieldValue;

use crate::traits::StoreError;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Gte,
}

/// Literal operand of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Integer(i64),
}

/// One `path op literal` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub path: String,
    pub op: Op,
    pub literal: Literal,
}

/// A parsed conjunction of conditions. An empty filter matches every record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    Symbol(Op),
}

fn tokenize(clause: &str) -> Result<Vec<Token>, StoreError> {
    let mut tokens = Vec::new();
    let mut chars = clause.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '\'' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => text.push(ch),
                        None => {
                            return Err(StoreError::Query(format!(
                                "unterminated string literal in clause: {clause}"
                            )))
                        }
                    }
                }
                tokens.push(Token::Quoted(text));
            }
            '=' => {
                chars.next();
                tokens.push(Token::Symbol(Op::Eq));
            }
            '>' => {
                chars.next();
                match chars.next() {
                    Some('=') => tokens.push(Token::Symbol(Op::Gte)),
                    _ => {
                        return Err(StoreError::Query(format!(
                            "unsupported operator '>' in clause: {clause}"
                        )))
                    }
                }
            }
            _ => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || ch == '=' || ch == '>' || ch == '\'' {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

/// Parse a bare word as an integer literal, accepting the `L`/`l` suffix
/// used for long literals.
fn parse_integer(word: &str) -> Option<i64> {
    let trimmed = word.strip_suffix(['L', 'l']).unwrap_or(word);
    trimmed.parse::<i64>().ok()
}

impl Filter {
    /// Parse a where-clause. Empty or whitespace-only clauses produce the
    /// match-all filter.
    pub fn parse(clause: &str) -> Result<Self, StoreError> {
        let tokens = tokenize(clause)?;
        let mut conditions = Vec::new();
        let mut iter = tokens.into_iter().peekable();

        while let Some(token) = iter.next() {
            let path = match token {
                // Connectives between conditions are optional.
                Token::Word(w) if w.eq_ignore_ascii_case("and") => continue,
                Token::Word(w) => w,
                other => {
                    return Err(StoreError::Query(format!(
                        "expected field path, found {other:?}"
                    )))
                }
            };

            let op = match iter.next() {
                Some(Token::Symbol(op)) => op,
                other => {
                    return Err(StoreError::Query(format!(
                        "expected operator after '{path}', found {other:?}"
                    )))
                }
            };

            let literal = match iter.next() {
                Some(Token::Quoted(text)) => Literal::Text(text),
                Some(Token::Word(word)) => parse_integer(&word)
                    .map(Literal::Integer)
                    .ok_or_else(|| {
                        StoreError::Query(format!("expected literal after '{path}', found '{word}'"))
                    })?,
                other => {
                    return Err(StoreError::Query(format!(
                        "expected literal after '{path}', found {other:?}"
                    )))
                }
            };

            conditions.push(Condition { path, op, literal });
        }

        Ok(Self { conditions })
    }

    /// Evaluate the filter against a field resolver. Every condition must
    /// resolve and hold; an unknown path never matches.
    pub fn matches<F>(&self, resolve: F) -> bool
    where
        F: Fn(&str) -> Option<FieldValue>,
    {
        self.conditions.iter().all(|cond| {
            resolve(&cond.path)
                .map(|value| eval(&value, cond.op, &cond.literal))
                .unwrap_or(false)
        })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

fn eval(field: &FieldValue, op: Op, literal: &Literal) -> bool {
    match (field, literal) {
        (FieldValue::Text(value), Literal::Text(lit)) => match op {
            Op::Eq => value == lit,
            Op::Gte => value.as_str() >= lit.as_str(),
        },
        (FieldValue::Integer(value), Literal::Integer(lit)) => match op {
            Op::Eq => value == lit,
            Op::Gte => value >= lit,
        },
        (FieldValue::Timestamp(value), Literal::Text(lit)) => {
            // Unparseable timestamp literals never match.
            match chrono::DateTime::parse_from_rfc3339(lit) {
                Ok(bound) => match op {
                    Op::Eq => *value == bound,
                    Op::Gte => *value >= bound,
                },
                Err(_) => false,
            }
        }
        (FieldValue::Timestamp(value), Literal::Integer(millis)) => match op {
            Op::Eq => value.timestamp_millis() == *millis,
            Op::Gte => value.timestamp_millis() >= *millis,
        },
        // Mixed text/integer comparisons never match.
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn resolver(value: FieldValue) -> impl Fn(&str) -> Option<FieldValue> {
        move |path| {
            if path == "field" {
                Some(value.clone())
            } else {
                None
            }
        }
    }

    #[test]
    fn parses_single_equality() {
        let filter = Filter::parse("subjectIdentifier.transactionId = '135705760'").unwrap();
        assert_eq!(filter.conditions().len(), 1);
        assert_eq!(filter.conditions()[0].op, Op::Eq);
        assert_eq!(
            filter.conditions()[0].literal,
            Literal::Text("135705760".to_string())
        );
    }

    #[test]
    fn parses_conjunction_with_quoted_spaces() {
        let filter = Filter::parse(
            "subjectIdentifier.transactionId = '135705760' and subjectIdentifier.sourceSystem = 'GDS GBLO'",
        )
        .unwrap();
        assert_eq!(filter.conditions().len(), 2);
        assert_eq!(
            filter.conditions()[1].literal,
            Literal::Text("GDS GBLO".to_string())
        );
    }

    #[test]
    fn parses_composed_window_clause() {
        let filter = Filter::parse(
            "reconType = 'Completeness' and _df.lifetimeFrom >= '2021-11-02T06:38:10.841Z' and _df.lifetimeTo >= 9223372036854775807L",
        )
        .unwrap();
        assert_eq!(filter.conditions().len(), 3);
        assert_eq!(filter.conditions()[1].op, Op::Gte);
        assert_eq!(filter.conditions()[2].literal, Literal::Integer(i64::MAX));
    }

    #[test]
    fn parses_space_concatenated_recon_clause() {
        // Reconciliation clauses join expression and sub-expression with a
        // bare space, no "and".
        let filter = Filter::parse("reconType = 'Completeness' breakStatus = 'UNPAIRED'").unwrap();
        assert_eq!(filter.conditions().len(), 2);
        assert_eq!(filter.conditions()[1].path, "breakStatus");
    }

    #[test]
    fn trailing_space_clause_parses() {
        let filter = Filter::parse("reconType = 'Completeness' ").unwrap();
        assert_eq!(filter.conditions().len(), 1);
    }

    #[test]
    fn empty_clause_matches_everything() {
        let filter = Filter::parse("").unwrap();
        assert!(filter.matches(|_| None));
    }

    #[test]
    fn unterminated_literal_is_an_error() {
        assert!(matches!(
            Filter::parse("field = 'oops"),
            Err(StoreError::Query(_))
        ));
    }

    #[test]
    fn missing_operator_is_an_error() {
        assert!(matches!(
            Filter::parse("field 'value'"),
            Err(StoreError::Query(_))
        ));
    }

    #[test]
    fn text_equality_matches() {
        let filter = Filter::parse("field = 'abc'").unwrap();
        assert!(filter.matches(resolver(FieldValue::Text("abc".to_string()))));
        assert!(!filter.matches(resolver(FieldValue::Text("abd".to_string()))));
    }

    #[test]
    fn unknown_path_never_matches() {
        let filter = Filter::parse("other = 'abc'").unwrap();
        assert!(!filter.matches(resolver(FieldValue::Text("abc".to_string()))));
    }

    #[test]
    fn integer_gte_matches_sentinel() {
        let filter = Filter::parse("field >= 9223372036854775807L").unwrap();
        assert!(filter.matches(resolver(FieldValue::Integer(i64::MAX))));
        assert!(!filter.matches(resolver(FieldValue::Integer(0))));
    }

    #[test]
    fn timestamp_gte_against_rfc3339_literal() {
        let filter = Filter::parse("field >= '2021-11-02T06:38:10.841Z'").unwrap();
        let after = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(filter.matches(resolver(FieldValue::Timestamp(after))));
        assert!(!filter.matches(resolver(FieldValue::Timestamp(before))));
    }

    #[test]
    fn unparseable_timestamp_literal_never_matches() {
        let filter = Filter::parse("field >= 'not-a-date'").unwrap();
        let now = Utc::now();
        assert!(!filter.matches(resolver(FieldValue::Timestamp(now))));
    }

    #[test]
    fn mixed_type_comparison_never_matches() {
        let filter = Filter::parse("field = 42").unwrap();
        assert!(!filter.matches(resolver(FieldValue::Text("42".to_string()))));
    }
}
