use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// Latin words split across a line break by the PDF layout. CJK text never
// hyphenates, so the match is restricted to ASCII letters.
static HYPHEN_NEWLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<prefix>[A-Za-z])-[ \t]*\r?\n[ \t]*(?P<suffix>[a-z])").unwrap()
});

/// Cleans text pulled out of a PDF or Office file before it reaches a prompt.
///
/// Applies NFKC (ligatures, full-width digits), drops control characters,
/// re-joins hyphenated Latin words, collapses runs of spaces and keeps at
/// most one blank line between paragraphs. Underscore blanks are untouched.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw
        .nfkc()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect();
    let joined = HYPHEN_NEWLINE.replace_all(&normalized, "$prefix$suffix");

    let mut result = String::with_capacity(joined.len());
    let mut pending_break = false;

    for line in joined.lines().map(str::trim) {
        if line.is_empty() {
            pending_break = !result.is_empty();
            continue;
        }
        if !result.is_empty() {
            result.push_str(if pending_break { "\n\n" } else { "\n" });
        }
        push_collapsed(line, &mut result);
        pending_break = false;
    }

    result
}

fn push_collapsed(line: &str, out: &mut String) {
    let mut prev_was_space = false;

    for ch in line.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
            }
            prev_was_space = true;
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
}
