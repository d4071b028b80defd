// Validation utilities
// Author: Gabriel Demetrios Lafis

/// Reduce an uploaded filename to a safe basename
///
/// Path components are dropped, characters outside `[A-Za-z0-9._-]` become `_` and leading
/// dots or underscores are stripped. The extension survives even when nothing of the stem
/// does, in which case the stem becomes `upload`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let (stem, extension) = match base.rsplit_once('.') {
        Some((stem, extension)) => (stem, Some(extension)),
        None => (base, None),
    };

    let stem = clean_component(stem).trim_start_matches(['.', '_']).to_string();
    let stem = if stem.is_empty() { "upload".to_string() } else { stem };

    match extension.map(clean_component).filter(|ext| !ext.is_empty()) {
        Some(extension) => format!("{}.{}", stem, extension),
        None => stem,
    }
}

fn clean_component(part: &str) -> String {
    part.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

/// Validate that a string parameter is present and not empty
pub fn validate_not_empty(value: Option<&str>, message: &str) -> Result<String, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(message.to_string()),
    }
}

/// Validate that a numeric value is in range
pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    value: T,
    min: T,
    max: T,
    name: &str,
) -> Result<(), String> {
    if value < min || value > max {
        Err(format!("'{}' must be between {} and {}", name, min, max))
    } else {
        Ok(())
    }
}
