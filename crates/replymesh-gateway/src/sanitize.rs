//! Source-text sanitation.

/// Minimum usable source length, in characters, after trimming.
pub const MIN_SOURCE_CHARS: usize = 5;

/// Ceiling on source length, in characters.
pub const MAX_SOURCE_CHARS: usize = 10_000;

/// Strip control characters, collapse whitespace runs to single spaces,
/// and enforce the length ceiling.
pub fn sanitize_source_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() > MAX_SOURCE_CHARS {
        collapsed.chars().take(MAX_SOURCE_CHARS).collect()
    } else {
        collapsed
    }
}
