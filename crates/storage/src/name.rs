//! File name sanitization.
//!
//! Book metadata is free text: titles contain colons and question marks,
//! series names contain slashes. Every path component derived from metadata
//! goes through [`sanitize`] so it is a single valid name on every platform a
//! mirror might be shared with (Windows/SMB being the strictest).

/// Longest file name (in bytes) accepted by common filesystems.
pub const MAX_NAME_BYTES: usize = 255;

/// Substitute for every character that may not appear in a file name.
pub const REPLACEMENT: char = '_';

/// Characters reserved by at least one mainstream filesystem. `/` is included
/// so that a name can never split into several path components.
const RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Turns arbitrary text into a single, portable file or directory name.
///
/// - Reserved characters and control characters become [`REPLACEMENT`].
/// - The result is cut to [`MAX_NAME_BYTES`] on a character boundary.
/// - Leading whitespace, and trailing whitespace and dots, are removed.
/// - A name left empty becomes a lone [`REPLACEMENT`].
///
/// Sanitizing is idempotent: `sanitize(&sanitize(s)) == sanitize(s)`.
///
/// ```
/// use calmirror_storage::sanitize_name;
/// assert_eq!(sanitize_name("Book: A/B Test?"), "Book_ A_B Test_");
/// assert_eq!(sanitize_name("Dune..."), "Dune");
/// assert_eq!(sanitize_name(".."), "_");
/// ```
pub fn sanitize(name: &str) -> String {
    sanitize_with_limit(name, MAX_NAME_BYTES)
}

/// As [`sanitize`], with a custom byte limit (used to leave room for a file extension).
pub fn sanitize_with_limit(name: &str, max_bytes: usize) -> String {
    let replaced: String =
        name.chars().map(|c| if RESERVED.contains(&c) || c.is_control() { REPLACEMENT } else { c }).collect();
    let truncated = &replaced[..replaced.floor_char_boundary(max_bytes)];
    let trimmed = truncated.trim_start().trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    match trimmed.is_empty() {
        true => REPLACEMENT.to_string(),
        false => trimmed.to_string(),
    }
}

/// Normalizes a configured extension so both `"epub"` and `".epub"` become
/// `".epub"`. An empty extension stays empty.
pub fn normalize_extension(ext: &str) -> String {
    match ext.trim().trim_matches('.') {
        "" => String::new(),
        ext => format!(".{ext}"),
    }
}

/// Builds a complete file name from a stem and an (un-normalized) extension,
/// sanitizing the stem so that the whole name fits in [`MAX_NAME_BYTES`].
pub fn file_name(stem: &str, ext: &str) -> String {
    let ext = normalize_extension(ext);
    let stem = sanitize_with_limit(stem, MAX_NAME_BYTES.saturating_sub(ext.len()));
    format!("{stem}{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("The Great Adventure", "The Great Adventure")]
    #[case("Author:Name", "Author_Name")]
    #[case("Author*Name", "Author_Name")]
    #[case("Author/Name", "Author_Name")]
    #[case(r#"Fantasy/Series with \:*?"<>|"#, "Fantasy_Series with ________")]
    #[case("Tab\there", "Tab_here")]
    #[case("Line\nbreak\u{7f}", "Line_break_")]
    #[case("  padded  ", "padded")]
    #[case("Ends with dots...", "Ends with dots")]
    #[case("Ends with. . .", "Ends with")]
    #[case(".hidden", ".hidden")]
    #[case("", "_")]
    #[case("   ", "_")]
    #[case(".", "_")]
    #[case("..", "_")]
    #[case("📚 The Great Adventure 📚", "📚 The Great Adventure 📚")]
    #[case("作者名 Series", "作者名 Series")]
    fn test_sanitize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[rstest]
    #[case("Author/Name")]
    #[case(r#"a\b:c*d?e"f<g>h|i"#)]
    #[case("trailing . . ")]
    #[case("..")]
    #[case("\u{0}\u{1}\u{1f}")]
    #[case(" ü ")]
    fn test_sanitize_is_idempotent(#[case] input: &str) {
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once);
        assert!(!once.contains(RESERVED));
        assert!(!once.chars().any(char::is_control));
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        // 'é' is two bytes, so 200 of them are 400 bytes.
        let long = "é".repeat(200);
        let sanitized = sanitize(&long);
        assert!(sanitized.len() <= MAX_NAME_BYTES);
        assert_eq!(sanitized, "é".repeat(127));
        assert_eq!(sanitize(&sanitized), sanitized);
    }

    #[rstest]
    #[case("epub", ".epub")]
    #[case(".epub", ".epub")]
    #[case(" .kepub.epub ", ".kepub.epub")]
    #[case("", "")]
    #[case(".", "")]
    fn test_normalize_extension(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_extension(input), expected);
    }

    #[test]
    fn test_file_name_leaves_room_for_extension() {
        let name = file_name(&"x".repeat(300), ".epub");
        assert_eq!(name.len(), MAX_NAME_BYTES);
        assert!(name.ends_with("x.epub"));
        assert_eq!(file_name("What?", "epub"), "What_.epub");
    }
}
