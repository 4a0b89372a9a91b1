/// Resolve a possibly-relative avatar reference into a displayable URL.
///
/// Absolute references pass through untouched; relative references (the
/// backend serves upload paths like `/uploads/fern.png`) are prefixed with
/// the configured API base.
pub fn resolve_avatar_url(api_base: &str, reference: Option<&str>) -> Option<String> {
    let reference = reference?;
    if reference.is_empty() {
        return None;
    }
    if reference.starts_with("http") {
        return Some(reference.to_string());
    }
    let base = api_base.trim_end_matches('/');
    if reference.starts_with('/') {
        Some(format!("{}{}", base, reference))
    } else {
        Some(format!("{}/{}", base, reference))
    }
}
