//! Input validation utilities

/// Validate signup credentials
///
/// Only emptiness is checked: usernames are otherwise free-form and
/// case-sensitive, and passwords have no strength rules.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), String> {
    if username.trim().is_empty() || password.is_empty() {
        return Err("Username and password are required.".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_values() {
        assert!(validate_credentials("", "secret").is_err());
        assert!(validate_credentials("   ", "secret").is_err());
        assert!(validate_credentials("alice", "").is_err());
    }

    #[test]
    fn test_accepts_any_non_empty_values() {
        assert!(validate_credentials("alice", "x").is_ok());
        assert!(validate_credentials("Émile O'Brien", "pass word").is_ok());
    }
}
