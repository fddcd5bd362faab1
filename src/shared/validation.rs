use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters, dots and underscores
    /// - Valid: "john_doe", "agent.07", "_admin", "JohnDoe"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_.]*$").unwrap();

    /// Regex for a `data:<mime>;base64,<payload>` photo as stored by the offline client
    pub static ref DATA_URL_REGEX: Regex =
        Regex::new(r"^data:(?P<mime>[\w.+-]+/[\w.+-]+);base64,(?P<payload>[A-Za-z0-9+/=\s]*)$").unwrap();
}

/// Rejects strings that are empty once trimmed
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
