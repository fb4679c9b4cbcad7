use std::borrow::Cow;

#[sbox_derive::sbox_error]
pub enum ResourceGuardError {
    #[error("Resource validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Longest accepted owner identifier. Owner ids double as storage document keys.
pub const MAX_OWNER_ID_LEN: usize = 100;

/// Longest accepted variable name.
pub const MAX_NAME_LEN: usize = 256;

/// Validation of caller-supplied identifiers before they reach persistence.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Checks an owner (project) identifier.
    ///
    /// Accepts 1 to [`MAX_OWNER_ID_LEN`] characters from `[A-Za-z0-9_.-]` that do not start
    /// with a dot, so an owner id can never name a hidden file or a relative path.
    ///
    /// # Errors
    /// Returns [`ResourceGuardError::Validation`] describing the first violated rule.
    pub fn owner_id(id: &str) -> Result<&str, ResourceGuardError> {
        if id.is_empty() {
            return Err(invalid("Owner id cannot be empty", id));
        }
        if id.len() > MAX_OWNER_ID_LEN {
            return Err(invalid("Owner id is too long", id));
        }
        if id.starts_with('.') {
            return Err(invalid("Owner id cannot start with '.'", id));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')) {
            return Err(invalid("Owner id contains illegal characters", id));
        }
        Ok(id)
    }

    /// Checks a variable name against environment variable naming rules.
    ///
    /// # Errors
    /// Returns [`ResourceGuardError::Validation`] for empty, overlong, digit-leading or
    /// non-`[A-Za-z0-9_]` names.
    pub fn variable_name(name: &str) -> Result<&str, ResourceGuardError> {
        let Some(first) = name.chars().next() else {
            return Err(invalid("Variable name cannot be empty", name));
        };
        if name.len() > MAX_NAME_LEN {
            return Err(invalid("Variable name is too long", name));
        }
        if first.is_ascii_digit() {
            return Err(invalid("Variable name cannot start with a digit", name));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("Variable name contains illegal characters", name));
        }
        Ok(name)
    }
}

fn invalid(message: &'static str, value: &str) -> ResourceGuardError {
    let mut shown: String = value.chars().take(32).collect();
    if shown.len() < value.len() {
        shown.push_str("...");
    }
    ResourceGuardError::Validation {
        message: message.into(),
        context: Some(format!("{shown:?}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_ids() {
        for ok in ["proj-1", "a", "team.alpha_2", "X-Y-Z"] {
            assert_eq!(ResourceGuard::owner_id(ok).unwrap(), ok);
        }
        for bad in ["", ".hidden", "../etc", "a/b", "white space", "proj:1", "ünï"] {
            assert!(ResourceGuard::owner_id(bad).is_err(), "{bad:?} must be rejected");
        }
        assert!(ResourceGuard::owner_id(&"a".repeat(MAX_OWNER_ID_LEN)).is_ok());
        assert!(ResourceGuard::owner_id(&"a".repeat(MAX_OWNER_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_variable_names() {
        for ok in ["TOKEN", "_PRIVATE", "db_url_2", "a"] {
            assert_eq!(ResourceGuard::variable_name(ok).unwrap(), ok);
        }
        for bad in ["", "2FA", "API-KEY", "A B", "NAME=1", "ключ"] {
            assert!(ResourceGuard::variable_name(bad).is_err(), "{bad:?} must be rejected");
        }
        assert!(ResourceGuard::variable_name(&"N".repeat(MAX_NAME_LEN)).is_ok());
        assert!(ResourceGuard::variable_name(&"N".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_error_names_offending_value() {
        let err = ResourceGuard::variable_name("API-KEY").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Resource validation error (\"API-KEY\"): Variable name contains illegal characters"
        );
    }
}
