use crate::error::PinError;

/// Host substrings accepted as pin links: the short-link domain and the
/// canonical domain. Matching is a plain case-sensitive substring check.
pub const PIN_HOSTS: &[&str] = &["pin.it", "pinterest.com", "pinterest"];

/// Trims `url` and checks it names a known pin host.
pub fn validate(url: &str) -> Result<String, PinError> {
    let trimmed = url.trim();
    if trimmed.is_empty() || !PIN_HOSTS.iter().any(|h| trimmed.contains(h)) {
        return Err(PinError::InvalidUrl(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}
