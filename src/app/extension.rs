/// Extension data derived from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    /// Lowercase final suffix, e.g. `.js`. Empty when the name has none.
    pub simple: String,
    /// Every suffix after the first dot, lowercased, e.g. `.min.js`.
    /// Equal to `simple` when the name carries at most one suffix.
    pub full: String,
}

/// Splits a file name into its suffixes.
///
/// Leading dots belong to the stem (`.bashrc` has no suffix) and a trailing
/// dot means no suffix at all (`notes.`).
pub fn split_suffixes(name: &str) -> Vec<String> {
    if name.ends_with('.') {
        return Vec::new();
    }
    let stem_start = name.len() - name.trim_start_matches('.').len();
    name[stem_start..]
        .split('.')
        .skip(1)
        .map(|part| format!(".{}", part.to_lowercase()))
        .collect()
}

pub fn extensions_of(name: &str) -> Extensions {
    let suffixes = split_suffixes(name);
    let simple = suffixes.last().cloned().unwrap_or_default();
    let full = if suffixes.len() > 1 {
        suffixes.concat()
    } else {
        simple.clone()
    };
    Extensions { simple, full }
}

/// Lowercases an extension and makes sure it starts with a dot.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_lowercase();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    if trimmed.starts_with('.') {
        Some(trimmed)
    } else {
        Some(format!(".{}", trimmed))
    }
}
