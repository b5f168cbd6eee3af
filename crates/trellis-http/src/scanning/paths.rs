//! Base path and path info composition used while scanning

use super::TypeDescriptor;

/// Trim whitespace, force a single leading `/` and drop trailing ones
///
/// A blank input stays blank.
pub fn sanitize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn with_leading_slash(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Combine an annotation's path info with a base path
///
/// A leading `^` (raw expression) stays at the very front; the slash is
/// normalized right after it. An empty path info stays empty without a base
/// so it keeps matching every path.
pub fn generate_path_info(path_info: &str, base_path: &str) -> String {
    let base = sanitize_base_path(base_path);
    let (anchor, path) = match path_info.strip_prefix('^') {
        Some(rest) => ("^", rest),
        None => ("", path_info),
    };

    format!("{}{}{}", anchor, base, with_leading_slash(path))
}

/// Resolve the base path routes of `descriptor` are generated under
///
/// A type-level base path is sanitized and appended to the supplied one.
/// Without it the supplied base path is returned exactly as given.
pub fn generate_base_path(supplied: &str, descriptor: &TypeDescriptor) -> String {
    let own = descriptor
        .resource_attribute()
        .map(|resource| resource.base_path.as_str())
        .filter(|base_path| !base_path.trim().is_empty());

    match own {
        None => supplied.to_string(),
        Some(own) if supplied.trim().is_empty() => sanitize_base_path(own),
        Some(own) => format!(
            "{}{}",
            supplied.trim().trim_end_matches('/'),
            sanitize_base_path(own)
        ),
    }
}
