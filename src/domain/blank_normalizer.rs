use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Placeholder every empty parenthetical blank is rewritten to.
pub const BLANK_PLACEHOLDER: &str = "（ ______________ ）";

/// Narrowest underscore run that is left untouched.
pub const MIN_BLANK_WIDTH: usize = 6;

// A bare ASCII `()` right after an identifier character is a call such as
// `f()`, not a blank.
static EMPTY_PARENTHESES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"（[ \t\u{3000}]*）|(?P<call>[A-Za-z0-9_])?\([ \t\u{3000}]*\)").unwrap()
});

static UNDERSCORE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}").unwrap());

/// Widens fill-in-blank placeholders so printed papers leave room to write.
///
/// Empty parentheses become [`BLANK_PLACEHOLDER`] and underscore runs shorter
/// than [`MIN_BLANK_WIDTH`] are padded. Applying it twice is a no-op.
pub fn normalize_blanks(text: &str) -> String {
    let widened = UNDERSCORE_RUN.replace_all(text, |caps: &Captures| {
        let run = &caps[0];
        if run.len() < MIN_BLANK_WIDTH {
            "_".repeat(MIN_BLANK_WIDTH)
        } else {
            run.to_string()
        }
    });

    EMPTY_PARENTHESES
        .replace_all(&widened, |caps: &Captures| match caps.name("call") {
            Some(_) if caps[0].ends_with("()") => caps[0].to_string(),
            Some(call) => format!("{}{}", call.as_str(), BLANK_PLACEHOLDER),
            None => BLANK_PLACEHOLDER.to_string(),
        })
        .into_owned()
}
