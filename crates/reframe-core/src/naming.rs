//! Download file naming.

/// Base name used when the upload had no usable name.
pub const DEFAULT_BASE_NAME: &str = "cropped-image";

/// Name for the downloaded crop.
///
/// Strips the final extension (a `.` followed by at least one character
/// that is neither `.` nor `/`, at the end of the name) and appends `.jpg`,
/// since crops are always JPEG.
///
/// # Example
///
/// ```ignore
/// assert_eq!(output_file_name(Some("holiday.png")), "holiday.jpg");
/// assert_eq!(output_file_name(None), "cropped-image.jpg");
/// ```
pub fn output_file_name(original: Option<&str>) -> String {
    let base = original.map(strip_extension).unwrap_or(DEFAULT_BASE_NAME);
    let base = if base.is_empty() {
        DEFAULT_BASE_NAME
    } else {
        base
    };
    format!("{base}.jpg")
}

fn strip_extension(name: &str) -> &str {
    match name.rfind(['.', '/']) {
        Some(idx) if name[idx..].starts_with('.') && idx + 1 < name.len() => &name[..idx],
        _ => name,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
