//! Schema validation shared by the feature modules.
//!
//! Raw JSON is first deserialized (types, required fields, enum literals,
//! defaults) and then checked against `validator` constraints. Both stages
//! report failures as a [`SchemaError`] naming the offending fields.

use std::fmt;

use eddy_http::error::{issue, AppError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Where the validated input came from; becomes the first element of `loc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Body,
    Query,
    Document,
}

impl Source {
    fn as_str(self) -> &'static str {
        match self {
            Source::Body => "body",
            Source::Query => "query",
            Source::Document => "document",
        }
    }
}

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
    pub kind: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid input: {}", join(.issues))]
pub struct SchemaError {
    pub origin: Source,
    pub issues: Vec<FieldIssue>,
}

fn join(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SchemaError {
    /// Names of the offending fields, in report order
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.field.as_str()).collect()
    }

    fn from_serde(source: Source, error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = error.path().to_string();
        let message = error.inner().to_string();

        // Missing fields are reported against the enclosing object.
        let field = if path == "." {
            backticked(&message)
                .filter(|_| message.starts_with("missing field"))
                .unwrap_or_default()
                .to_string()
        } else {
            path
        };

        let kind = if message.starts_with("missing field") {
            "missing"
        } else if message.starts_with("unknown variant") {
            "enum"
        } else {
            "type_error"
        };

        Self {
            origin: source,
            issues: vec![FieldIssue {
                field,
                message: strip_position(&message),
                kind: kind.to_string(),
            }],
        }
    }

    fn not_an_object(source: Source) -> Self {
        Self {
            origin: source,
            issues: vec![FieldIssue {
                field: String::new(),
                message: "Input should be a valid dictionary".to_string(),
                kind: "dict_type".to_string(),
            }],
        }
    }

    fn from_validator(source: Source, errors: &ValidationErrors) -> Self {
        let mut issues: Vec<FieldIssue> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldIssue {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| format!("failed '{}' check", error.code)),
                    kind: error.code.to_string(),
                })
            })
            .collect();
        issues.sort_by(|a, b| a.field.cmp(&b.field));

        Self {
            origin: source,
            issues,
        }
    }
}

fn backticked(message: &str) -> Option<&str> {
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(&message[start..start + len])
}

// serde_json appends " at line X column Y" for text input; values carry none,
// but keep messages clean regardless of how the value was produced.
fn strip_position(message: &str) -> String {
    match message.find(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}

/// Deserialize the JSON object `value` into `T` and run its constraint checks.
pub fn parse<T>(source: Source, value: Value) -> Result<T, SchemaError>
where
    T: DeserializeOwned + Validate,
{
    // Derived struct visitors also accept sequences; records must be objects.
    if !value.is_object() {
        return Err(SchemaError::not_an_object(source));
    }

    let record: T = serde_path_to_error::deserialize(value)
        .map_err(|error| SchemaError::from_serde(source, error))?;
    check(source, &record)?;
    Ok(record)
}

/// Run the constraint checks of an already typed value.
pub fn check<T: Validate>(source: Source, record: &T) -> Result<(), SchemaError> {
    record
        .validate()
        .map_err(|errors| SchemaError::from_validator(source, &errors))
}

impl From<SchemaError> for AppError {
    fn from(error: SchemaError) -> Self {
        let message = error.to_string();
        let loc_root = error.origin.as_str();
        let details = error
            .issues
            .into_iter()
            .map(|issue_| {
                let mut loc = vec![loc_root];
                if !issue_.field.is_empty() {
                    loc.push(issue_.field.as_str());
                }
                issue(&loc, issue_.message, &issue_.kind)
            })
            .collect();

        AppError::validation(details, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "value is not a valid email address"))]
        email: String,
        #[serde(default)]
        #[validate(range(min = 0, message = "must be non-negative"))]
        count: i64,
    }

    #[test]
    fn missing_field_is_named() {
        let err = parse::<Signup>(Source::Body, json!({"count": 1})).unwrap_err();
        assert_eq!(err.fields(), vec!["email"]);
        assert_eq!(err.issues[0].kind, "missing");
    }

    #[test]
    fn wrong_type_points_at_the_field() {
        let err = parse::<Signup>(Source::Body, json!({"email": "a@b.com", "count": "x"})).unwrap_err();
        assert_eq!(err.fields(), vec!["count"]);
        assert_eq!(err.issues[0].kind, "type_error");
    }

    #[test]
    fn constraint_failures_are_collected_per_field() {
        let err = parse::<Signup>(Source::Body, json!({"email": "nope", "count": -1})).unwrap_err();
        assert_eq!(err.fields(), vec!["count", "email"]);
        assert_eq!(
            err.to_string(),
            "invalid input: count: must be non-negative; email: value is not a valid email address"
        );
    }

    #[test]
    fn valid_input_passes() {
        let signup = parse::<Signup>(Source::Body, json!({"email": "a@b.com"})).unwrap();
        assert_eq!(signup.email, "a@b.com");
        assert_eq!(signup.count, 0);
    }

    #[test]
    fn conversion_builds_loc_from_source_and_field() {
        let err = parse::<Signup>(Source::Query, json!({})).unwrap_err();
        match AppError::from(err) {
            AppError::Validation { details, .. } => {
                assert_eq!(details[0]["loc"], json!(["query", "email"]));
                assert_eq!(details[0]["type"], "missing");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn non_object_input_is_rejected_as_a_whole() {
        for value in [json!(["a@b.com", 1]), json!("a@b.com"), json!(null)] {
            let err = parse::<Signup>(Source::Body, value).unwrap_err();
            assert_eq!(err.fields(), vec![""]);
            assert_eq!(err.issues[0].kind, "dict_type");
        }

        let err = parse::<Signup>(Source::Body, json!(["a@b.com", 1])).unwrap_err();
        match AppError::from(err) {
            AppError::Validation { details, .. } => {
                assert_eq!(details[0]["loc"], json!(["body"]));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn backticked_extracts_first_name() {
        assert_eq!(backticked("missing field `email`"), Some("email"));
        assert_eq!(backticked("no names here"), None);
    }
}
