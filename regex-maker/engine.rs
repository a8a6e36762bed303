use std::borrow::Cow;

use crate::{EngineError, Modifier};

/// The regex engine that a rendered pattern is handed to.
///
/// Patterns are passed in their delimited form, e.g. `/(?:a|b)/i`.
pub trait Engine {
    /// Match `subject` against `pattern`. Returns the whole match followed by
    /// each capture group, or an empty list if there is no match.
    fn test(&self, pattern: &str, subject: &str) -> Result<Vec<String>, EngineError>;

    /// Replace matches of `pattern` in `subject`. With a `limit`, at most that
    /// many matches are replaced.
    fn replace(
        &self,
        pattern: &str,
        replacement: &str,
        subject: &str,
        limit: Option<usize>,
    ) -> Result<Replaced, EngineError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub output: String,
    /// Number of substitutions performed.
    pub count: usize,
}

/// [`Engine`] implementation backed by the `regex` crate.
///
/// Replacement strings use `regex` syntax: `$1` or `${name}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexEngine;

impl RegexEngine {
    pub fn compile(&self, pattern: &str) -> Result<regex::Regex, EngineError> {
        let delimited = Delimited::parse(pattern)?;
        let extended = delimited.modifiers.contains(&Modifier::Extended);
        let body = translate(delimited.body, extended);
        tracing::trace!("Compiling {pattern:?} as {body:?}");

        let mut builder = regex::RegexBuilder::new(&body);
        for modifier in delimited.modifiers {
            match modifier {
                Modifier::Insensitive => builder.case_insensitive(true),
                Modifier::MultiLine => builder.multi_line(true),
                Modifier::SingleLine => builder.dot_matches_new_line(true),
                Modifier::Extended => builder.ignore_whitespace(true),
            };
        }
        Ok(builder.build()?)
    }
}

impl Engine for RegexEngine {
    fn test(&self, pattern: &str, subject: &str) -> Result<Vec<String>, EngineError> {
        let regex = self.compile(pattern)?;
        tracing::trace!("Matching {subject:?} against {regex:?}");

        let Some(captures) = regex.captures(subject) else {
            return Ok(Vec::new());
        };
        let groups: Vec<Option<regex::Match<'_>>> = captures.iter().collect();

        // Groups that did not participate are reported as empty, except at the
        // end where they are left out.
        let len = groups.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        Ok(groups[..len]
            .iter()
            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
            .collect())
    }

    fn replace(
        &self,
        pattern: &str,
        replacement: &str,
        subject: &str,
        limit: Option<usize>,
    ) -> Result<Replaced, EngineError> {
        let regex = self.compile(pattern)?;
        tracing::trace!("Replacing in {subject:?} with {regex:?}, limit {limit:?}");

        // `replacen` treats 0 as "no limit".
        let limit = match limit {
            Some(0) => {
                return Ok(Replaced {
                    output: subject.to_owned(),
                    count: 0,
                });
            }
            Some(limit) => limit,
            None => 0,
        };

        let matches = regex.find_iter(subject);
        let count = if limit == 0 {
            matches.count()
        } else {
            matches.take(limit).count()
        };
        let output = regex.replacen(subject, limit, replacement).into_owned();
        Ok(Replaced { output, count })
    }
}

/// A pattern split into its body and trailing modifier letters.
#[derive(Debug, PartialEq)]
struct Delimited<'a> {
    body: &'a str,
    modifiers: Vec<Modifier>,
}

impl<'a> Delimited<'a> {
    fn parse(pattern: &'a str) -> Result<Self, EngineError> {
        let start = pattern.chars().next().ok_or(EngineError::MissingDelimiter)?;
        let end = match start {
            '(' => ')',
            '[' => ']',
            '{' => '}',
            '<' => '>',
            c => c,
        };

        let rest = &pattern[start.len_utf8()..];
        let end_pos = rest
            .rfind(end)
            .ok_or(EngineError::UnterminatedPattern(end))?;
        let body = &rest[..end_pos];
        let modifiers: Vec<Modifier> = rest[end_pos + end.len_utf8()..]
            .chars()
            .map(|c| Modifier::from_shortcut(c).map_err(|_| EngineError::UnknownFlag(c)))
            .collect::<Result<_, _>>()?;

        Ok(Self { body, modifiers })
    }
}

/// Rewrite a pattern body into the `regex` crate's dialect.
///
/// `(?#...)` groups outside character classes are removed, since the `regex`
/// crate has no comment group syntax. With `extended`, whitespace and `#`
/// inside character classes are escaped: the `regex` crate ignores them there,
/// while the delimited convention keeps class contents literal.
fn translate(body: &str, extended: bool) -> Cow<'_, str> {
    if !body.contains("(?#") && !(extended && body.contains('[')) {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut escaped = false;
    // Byte offset just past the `[` (and `^`) opening the current class.
    let mut class_start: Option<usize> = None;
    let mut iter = body.char_indices();

    while let Some((pos, ch)) = iter.next() {
        if escaped {
            escaped = false;
            out.push(ch);
            continue;
        }

        match ch {
            '\\' => escaped = true,
            '[' if class_start.is_none() => {
                let mut after = pos + 1;
                if body[after..].starts_with('^') {
                    after += 1;
                }
                class_start = Some(after);
            }
            // A `]` directly after the opening bracket is literal.
            ']' if class_start.is_some_and(|start| start != pos) => class_start = None,
            '(' if class_start.is_none() && body[pos..].starts_with("(?#") => {
                if let Some(len) = body[pos..].find(')') {
                    let comment_end = pos + len;
                    while iter.next().is_some_and(|(p, _)| p < comment_end) {}
                    continue;
                }
            }
            '#' if extended && class_start.is_some() => {
                out.push_str(r"\#");
                continue;
            }
            c if extended && class_start.is_some() && c.is_whitespace() => {
                match c {
                    ' ' => out.push_str(r"\ "),
                    '\t' => out.push_str(r"\t"),
                    '\n' => out.push_str(r"\n"),
                    '\r' => out.push_str(r"\r"),
                    c => out.push_str(&format!(r"\x{{{:X}}}", u32::from(c))),
                }
                continue;
            }
            _ => {}
        }
        out.push(ch);
    }

    Cow::Owned(out)
}
