use poem::{Error as PoemError, Result as PoemResult, http::StatusCode};

/// Checks the `X-API-Key` header against the configured service key.
/// Without a configured key every request is accepted.
pub fn authorize(expected: Option<&str>, provided: Option<&str>) -> PoemResult<()> {
    match expected {
        None => Ok(()),
        Some(expected) if provided == Some(expected) => Ok(()),
        Some(_) => Err(PoemError::from_string(
            "missing or invalid api key",
            StatusCode::UNAUTHORIZED,
        )),
    }
}
