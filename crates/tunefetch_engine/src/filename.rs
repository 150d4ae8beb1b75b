const AUDIO_EXTENSION: &str = "mp3";
const MAX_STEM_CHARS: usize = 120;
const FALLBACK_STEM: &str = "track";

/// Scratch file name for a track: `{sanitized_title}.mp3`.
pub fn audio_file_name(title: &str) -> String {
    format!("{}.{AUDIO_EXTENSION}", sanitize_title(title))
}

/// Keeps alphanumerics, `_`, `.` and `-`; every other character becomes `_`.
///
/// Idempotent: the output only contains allowed characters and is never
/// longer than the cap, so a second pass changes nothing.
pub fn sanitize_title(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .take(MAX_STEM_CHARS)
        .collect();
    if cleaned.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        cleaned
    }
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
}
