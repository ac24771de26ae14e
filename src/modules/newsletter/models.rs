use eddy_db::Collection;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

const DEFAULT_SOURCE: &str = "website";

/// Newsletter subscriber. Duplicate emails are accepted as separate records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Subscriber {
    /// Subscriber name
    #[serde(default)]
    pub name: Option<String>,
    #[validate(
        email(message = "value is not a valid email address"),
        custom(function = dotted_domain)
    )]
    pub email: String,
    /// Where the subscriber signed up; an explicit `null` is kept as absent
    #[serde(default = "Subscriber::default_source")]
    pub source: Option<String>,
}

impl Subscriber {
    fn default_source() -> Option<String> {
        Some(DEFAULT_SOURCE.to_string())
    }
}

/// Deliverable addresses need a dotted domain (`a@b` is rejected). Input
/// without an `@` is left to the `email` rule.
fn dotted_domain(email: &str) -> Result<(), ValidationError> {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return Ok(());
    };

    if domain.contains('.') {
        Ok(())
    } else {
        Err(ValidationError::new("email")
            .with_message("the domain part of the email address must contain a dot".into()))
    }
}

impl Collection for Subscriber {
    const COLLECTION: &'static str = "subscriber";
}
