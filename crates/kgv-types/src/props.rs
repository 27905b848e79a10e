use indexmap::IndexMap;
use smol_str::SmolStr;

/// Open string-keyed property bag for secondary attributes.
///
/// Insertion order is preserved so exports and inspectors list properties
/// the way they were ingested.
pub type Props = IndexMap<SmolStr, String>;

/// Truncate a display label to `max_chars` characters, ending in `…`.
///
/// Labels at or under the limit are returned unchanged. Longer labels keep
/// `max_chars - 3` characters followed by a single ellipsis.
pub fn truncate_label(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = value.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_unchanged() {
        assert_eq!(truncate_label("Alice", 64), "Alice");
        let exact = "x".repeat(64);
        assert_eq!(truncate_label(&exact, 64), exact);
    }

    #[test]
    fn long_labels_truncated() {
        let long = "a".repeat(100);
        let out = truncate_label(&long, 64);
        assert_eq!(out.chars().count(), 62);
        assert!(out.ends_with('…'));
        assert!(out.starts_with(&"a".repeat(61)));
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let long = "é".repeat(70);
        let out = truncate_label(&long, 64);
        assert_eq!(out.chars().count(), 62);
    }
}
