use crate::cli::utils::*;

#[test]
fn short_string_is_unchanged() {
    assert_eq!(truncate_with_ellipsis("G-607", 10), "G-607");
}

#[test]
fn exact_length_is_unchanged() {
    assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
}

#[test]
fn long_string_is_truncated() {
    assert_eq!(
        truncate_with_ellipsis("Sunset Towers, Ocean Drive", 10),
        "Sunset ..."
    );
}

#[test]
fn truncation_counts_chars_not_bytes() {
    assert_eq!(truncate_with_ellipsis("Résidence Été", 13), "Résidence Été");
    assert_eq!(truncate_with_ellipsis("Résidence Été", 7), "Rési...");
}

#[test]
fn tiny_max_does_not_underflow() {
    assert_eq!(truncate_with_ellipsis("abcdef", 2), "...");
}

#[test]
fn or_dash_fills_missing_values() {
    assert_eq!(or_dash(None), "-");
    assert_eq!(or_dash(Some("building")), "building");
}
