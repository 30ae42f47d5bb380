use crate::server::response::ApiError;

const MAX_COMMENT_LEN: usize = 2000;
const MAX_USERNAME_LEN: usize = 64;
const MAX_FULL_NAME_LEN: usize = 128;

/// Trims a comment and rejects it if nothing is left.
pub fn validate_comment(text: &str) -> Result<String, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Comment cannot be empty"));
    }
    if text.chars().count() > MAX_COMMENT_LEN {
        return Err(ApiError::bad_request(format!(
            "Comment cannot exceed {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(text.to_string())
}

/// Trims an optional profile field; empty becomes `None`.
fn normalize_field(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<Option<String>, ApiError> {
    let Some(value) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > max_len {
        return Err(ApiError::bad_request(format!(
            "{field} cannot exceed {max_len} characters"
        )));
    }
    Ok(Some(value.to_string()))
}

pub fn normalize_username(value: Option<&str>) -> Result<Option<String>, ApiError> {
    let username = normalize_field(value, "Username", MAX_USERNAME_LEN)?;
    if username
        .as_deref()
        .is_some_and(|u| u.contains(char::is_whitespace))
    {
        return Err(ApiError::bad_request("Username cannot contain whitespace"));
    }
    Ok(username)
}

pub fn normalize_full_name(value: Option<&str>) -> Result<Option<String>, ApiError> {
    normalize_field(value, "Full name", MAX_FULL_NAME_LEN)
}
