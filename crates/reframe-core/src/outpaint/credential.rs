use super::OutpaintError;

/// Pick the API key for an uncrop request.
///
/// The user's explicit value wins; otherwise the configured fallback is
/// used. Blank strings count as absent. Surrounding whitespace is dropped.
pub fn resolve_credential(
    explicit: Option<&str>,
    fallback: Option<&str>,
) -> Result<String, OutpaintError> {
    [explicit, fallback]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(String::from)
        .ok_or(OutpaintError::MissingCredential)
}
