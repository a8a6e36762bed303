/// The delimiter that literal text is quoted against. Builders may choose a
/// different delimiter at render time, but fragments are always escaped with
/// this one.
pub const DELIMITER: char = '/';

/// Punctuation quoted in addition to the engine's own metacharacters, so that
/// the output stays literal regardless of delimiter or flag choice.
const EXTRA_QUOTED: &[char] = &[':', '=', '!', '-', '#', DELIMITER];

/// Escape `text` so that it matches itself literally.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    quote_into(text, &mut escaped);
    escaped
}

pub fn quote_into(text: &str, buf: &mut String) {
    for ch in text.chars() {
        if ch == '\0' {
            buf.push_str(r"\x00");
            continue;
        }
        if needs_quoting(ch) {
            buf.push('\\');
        }
        buf.push(ch);
    }
}

#[inline]
fn needs_quoting(ch: char) -> bool {
    regex_syntax::is_meta_character(ch)
        || (EXTRA_QUOTED.contains(&ch) && regex_syntax::is_escapeable_character(ch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_metacharacters() {
        assert_eq!(quote("www."), r"www\.");
        assert_eq!(quote("://"), r"\:\/\/");
        assert_eq!(quote("a+b*(c)"), r"a\+b\*\(c\)");
        assert_eq!(quote("[^x]$"), r"\[\^x\]\$");
        assert_eq!(quote("#-=!"), r"\#\-\=\!");
    }

    #[test]
    fn leaves_word_boundary_characters_alone() {
        assert_eq!(quote("<a>"), "<a>");
    }

    #[test]
    fn quotes_nul() {
        assert_eq!(quote("a\0b"), r"a\x00b");
    }

    #[test]
    fn quoted_text_matches_itself() {
        for text in ["http://", "1.5", "a|b", "{2,3}", "path/to/file.rs", "x <= y", "#!"] {
            let re = regex::Regex::new(&format!("^{}$", quote(text))).unwrap();
            assert!(re.is_match(text), "{text:?} did not match {re:?}");
        }
    }
}
