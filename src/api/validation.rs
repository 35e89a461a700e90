use super::ApiError;

const MAX_EMAIL_LENGTH: usize = 255;
const MAX_NAME_LENGTH: usize = 255;

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

/// Checks the shape of an email address and returns it trimmed.
pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::validation(format!(
            "Email must be {MAX_EMAIL_LENGTH} characters or less"
        )));
    }

    let valid = match email.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::validation("Enter a valid email address"));
    }

    Ok(email)
}

pub fn validate_password(password: &str, min_length: usize) -> Result<&str, ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    if password.chars().count() < min_length {
        return Err(ApiError::validation(format!(
            "Password must be at least {min_length} characters"
        )));
    }

    Ok(password)
}

pub fn validate_display_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::validation(format!(
            "Name must be {MAX_NAME_LENGTH} characters or less"
        )));
    }
    Ok(name)
}

/// Parses a comma separated id list such as `1,2,3`. Empty segments are
/// skipped.
pub fn parse_id_list(field: &str, raw: &str) -> Result<Vec<i32>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| ApiError::validation(format!("{field}: \"{s}\" is not a valid id")))
        })
        .collect()
}

/// Truthiness of a query flag: `1` and `true` turn it on.
#[must_use]
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true")
    )
}
