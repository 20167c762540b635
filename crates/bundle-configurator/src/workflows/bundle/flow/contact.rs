use super::ValidationError;

const SUGGESTED_DOMAINS: [&str; 6] = [
    "gmail.com",
    "yahoo.com",
    "outlook.com",
    "hotmail.com",
    "icloud.com",
    "protonmail.com",
];

/// Name and e-mail as entered on the first step, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub email: String,
    pub name: String,
}

impl ContactDetails {
    pub fn parse(email: &str, name: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        let name = name.trim();

        if email.is_empty() || name.is_empty() {
            return Err(ValidationError::MissingContactFields);
        }

        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
            _ => return Err(ValidationError::MalformedEmail(email.to_string())),
        }

        Ok(Self {
            email: email.to_string(),
            name: name.to_string(),
        })
    }
}

/// Completes a partially typed domain against common providers.
///
/// Returns nothing until at least one character follows the `@`.
pub fn suggest_email_domains(input: &str) -> Vec<String> {
    let Some((local, partial)) = input.split_once('@') else {
        return Vec::new();
    };
    if partial.is_empty() {
        return Vec::new();
    }

    let partial = partial.to_ascii_lowercase();
    SUGGESTED_DOMAINS
        .iter()
        .filter(|domain| domain.starts_with(&partial))
        .map(|domain| format!("{local}@{domain}"))
        .collect()
}
