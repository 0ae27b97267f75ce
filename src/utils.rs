//! Small text helpers shared across the pipeline.
//!
//! - Visible-length counting for titles (zero-width and control characters
//!   do not occupy space in a search result, so they must not count)
//! - Sentence splitting for the readability metric
//! - String truncation for log lines

/// Count the visible characters of a string.
///
/// Characters in the Unicode control and format categories (C0/C1 controls,
/// zero-width spaces and joiners, directional marks, soft hyphens, BOM) are
/// excluded, so a title padded with invisible codepoints reports its real
/// on-screen length.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(visible_len("Breaking\u{200b}News"), 12);
/// ```
pub fn visible_len(s: &str) -> usize {
    s.chars().filter(|c| !is_invisible(*c)).count()
}

/// Codepoints that occupy no space when rendered.
///
/// `char::is_control` only covers the Cc category; the format-category (Cf)
/// characters that show up in scraped headlines are listed explicitly.
fn is_invisible(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{00AD}'              // soft hyphen
            | '\u{061C}'            // Arabic letter mark
            | '\u{180E}'            // Mongolian vowel separator
            | '\u{200B}'..='\u{200F}' // zero-width space/joiners, direction marks
            | '\u{202A}'..='\u{202E}' // directional embedding/overrides
            | '\u{2060}'..='\u{2064}' // word joiner, invisible operators
            | '\u{2066}'..='\u{2069}' // directional isolates
            | '\u{FEFF}'            // byte order mark
        )
}

/// Count sentence boundaries in a text span.
///
/// A sentence ends at `.`, `!` or `?`. Runs of terminators ("..", "?!")
/// count once. Text with no terminator at all counts as a single sentence
/// when it contains any words.
pub fn sentence_count(text: &str) -> usize {
    let mut count = 0usize;
    let mut in_terminator = false;
    let mut saw_word = false;
    for c in text.chars() {
        if matches!(c, '.' | '!' | '?') {
            if !in_terminator && saw_word {
                count += 1;
            }
            in_terminator = true;
        } else {
            in_terminator = false;
            if !c.is_whitespace() {
                saw_word = true;
            }
        }
    }
    if count == 0 && saw_word { 1 } else { count }
}

/// Return the first `n` sentences of a text span, terminators included.
pub fn leading_sentences(text: &str, n: usize) -> String {
    let mut out = String::new();
    let mut taken = 0usize;
    let mut in_terminator = false;
    for c in text.chars() {
        out.push(c);
        if matches!(c, '.' | '!' | '?') {
            if !in_terminator {
                taken += 1;
            }
            in_terminator = true;
            if taken >= n {
                break;
            }
        } else {
            in_terminator = false;
        }
    }
    out.trim().to_string()
}

/// Truncate a string to `max` characters on a char boundary, with an
/// ellipsis when anything was cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes with the remaining byte count
/// appended, so failed API responses can be previewed without flooding logs.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}
