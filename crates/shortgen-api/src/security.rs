//! Input sanitization for uploads and download paths.

/// Maximum stored file name length.
pub const MAX_FILENAME_LENGTH: usize = 200;

/// Reduce a client-supplied file name to a safe base name.
///
/// Directory components are dropped, whitespace becomes `_`, and anything
/// outside `[A-Za-z0-9._-]` is removed. Leading dots are stripped so the
/// result is never hidden or a traversal. May return an empty string.
pub fn secure_filename(input: &str) -> String {
    let base = input.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned
        .trim_start_matches(['.', '_'])
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .collect()
}

/// Validate a requested result file name.
///
/// Valid format: alphanumeric, hyphens, underscores, dots. No path traversal.
pub fn is_valid_clip_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 256 {
        return false;
    }
    // Block path traversal
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("my talk.mp4"), "my_talk.mp4");
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\videos\\clip.MOV"), "clip.MOV");
        assert_eq!(secure_filename(".hidden.mp4"), "hidden.mp4");
        assert_eq!(secure_filename("résumé.mp4"), "rsum.mp4");
        assert_eq!(secure_filename("///"), "");
    }

    #[test]
    fn test_clip_names() {
        assert!(is_valid_clip_name("highlight_1.mp4"));
        assert!(is_valid_clip_name("transcript.txt"));
        assert!(!is_valid_clip_name("../metadata.json"));
        assert!(!is_valid_clip_name("a/b.mp4"));
        assert!(!is_valid_clip_name(""));
    }
}
