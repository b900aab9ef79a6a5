//! Terminal output sanitization
//!
//! Titles, URLs and labels come straight from a clusters file and are printed by the
//! `query` command and drawn by the TUI. Both pass them through [`sanitize_line`] first so
//! embedded escape sequences cannot move the cursor, recolor the screen or break a row
//! across several lines.

/// Strips ANSI CSI escape sequences and control characters (tab, newline and carriage
/// return survive)
///
/// # Examples
///
/// ```
/// use history_clusters::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI sequences end at the first ASCII letter
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Sanitize text that must render on exactly one terminal line
pub fn sanitize_line(text: &str) -> String {
    strip_ansi_codes(text)
        .chars()
        .map(|ch| if matches!(ch, '\t' | '\n' | '\r') { ' ' } else { ch })
        .collect()
}
