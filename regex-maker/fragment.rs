use std::fmt::Write as _;

use crate::{Error, IntoBound, Repeat, escape};

/// The variant of a [`Fragment`]. Fixed when the fragment is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `(?:ab)`
    And,
    /// `(?:a|b)`
    Or,
    /// `(?:ab)?`
    Optional,
    /// `(?:ab){n,m}`
    Repetition(Repeat),
    /// `(ab)`
    CapturingGroup,
    /// `[a-z]`, not escaped.
    Range,
    /// `(?#text)`, not escaped.
    Comment,
    /// `ab`, not escaped and not wrapped.
    Raw,
}

impl Kind {
    /// Name used when visualizing a tree.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Kind::And => "And",
            Kind::Or => "Or",
            Kind::Optional => "Optional",
            Kind::Repetition(_) => "Repetition",
            Kind::CapturingGroup => "CapturingGroup",
            Kind::Range => "Range",
            Kind::Comment => "Comment",
            Kind::Raw => "Raw",
        }
    }

    /// Minimum number of arguments accepted at construction.
    #[must_use]
    pub fn min_arguments(&self) -> usize {
        match self {
            Kind::Or => 2,
            _ => 1,
        }
    }

    /// True if leaf values are quoted before being stored.
    #[must_use]
    pub fn is_escaping(&self) -> bool {
        !matches!(self, Kind::Range | Kind::Comment | Kind::Raw)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::And => "and",
            Kind::Or => "or",
            Kind::Optional => "optional",
            Kind::Repetition(_) => "repetition",
            Kind::CapturingGroup => "capturing group",
            Kind::Range => "range",
            Kind::Comment => "comment",
            Kind::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// A scalar child of a fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Leaf {
    /// Type name shown by the visualizer.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Leaf::Text(_) => "text",
            Leaf::Integer(_) => "integer",
            Leaf::Float(_) => "float",
            Leaf::Bool(_) => "bool",
        }
    }
}

impl std::fmt::Display for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Leaf::Text(s) => f.write_str(s),
            Leaf::Integer(n) => write!(f, "{n}"),
            Leaf::Float(n) => write!(f, "{n}"),
            Leaf::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A child of a fragment: either a leaf value or a nested fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Leaf),
    Fragment(Fragment),
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Leaf(leaf) => leaf.fmt(f),
            Node::Fragment(fragment) => fragment.fmt(f),
        }
    }
}

impl From<Leaf> for Node {
    #[inline]
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<Fragment> for Node {
    #[inline]
    fn from(fragment: Fragment) -> Self {
        Node::Fragment(fragment)
    }
}

impl From<&str> for Node {
    #[inline]
    fn from(s: &str) -> Self {
        Node::Leaf(Leaf::Text(s.to_owned()))
    }
}

impl From<String> for Node {
    #[inline]
    fn from(s: String) -> Self {
        Node::Leaf(Leaf::Text(s))
    }
}

impl From<char> for Node {
    #[inline]
    fn from(c: char) -> Self {
        Node::Leaf(Leaf::Text(c.to_string()))
    }
}

impl From<bool> for Node {
    #[inline]
    fn from(b: bool) -> Self {
        Node::Leaf(Leaf::Bool(b))
    }
}

impl From<f64> for Node {
    #[inline]
    fn from(n: f64) -> Self {
        Node::Leaf(Leaf::Float(n))
    }
}

impl From<f32> for Node {
    #[inline]
    fn from(n: f32) -> Self {
        Node::Leaf(Leaf::Float(n.into()))
    }
}

macro_rules! impl_node_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Node {
            #[inline]
            fn from(n: $t) -> Self {
                Node::Leaf(Leaf::Integer(n.into()))
            }
        }
    )*};
}

impl_node_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// Build a `Vec<Node>` from values of mixed types.
#[macro_export]
macro_rules! nodes {
    ($($node:expr),* $(,)?) => {
        ::std::vec![$(<$crate::Node as ::core::convert::From<_>>::from($node)),*]
    };
}

/// One node of a pattern tree.
///
/// Every fragment owns its children exclusively; the tree has no sharing and
/// no parent pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    kind: Kind,
    children: Vec<Node>,
}

impl Fragment {
    pub fn new<I>(kind: Kind, args: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let mut fragment = Self {
            kind,
            children: Vec::new(),
        };
        fragment.set_children(args)?;
        Ok(fragment)
    }

    pub fn and<I: IntoIterator<Item: Into<Node>>>(args: I) -> Result<Self, Error> {
        Self::new(Kind::And, args)
    }

    pub fn or<I: IntoIterator<Item: Into<Node>>>(args: I) -> Result<Self, Error> {
        Self::new(Kind::Or, args)
    }

    pub fn optional<I: IntoIterator<Item: Into<Node>>>(args: I) -> Result<Self, Error> {
        Self::new(Kind::Optional, args)
    }

    pub fn capturing_group<I: IntoIterator<Item: Into<Node>>>(args: I) -> Result<Self, Error> {
        Self::new(Kind::CapturingGroup, args)
    }

    pub fn range<I: IntoIterator<Item: Into<Node>>>(args: I) -> Result<Self, Error> {
        Self::new(Kind::Range, args)
    }

    pub fn comment<I: IntoIterator<Item: Into<Node>>>(args: I) -> Result<Self, Error> {
        Self::new(Kind::Comment, args)
    }

    pub fn raw<I: IntoIterator<Item: Into<Node>>>(args: I) -> Result<Self, Error> {
        Self::new(Kind::Raw, args)
    }

    /// Group repeated between `min` and `max` times. Signed bounds use `-1`
    /// for [`INFINITE`](crate::INFINITE).
    pub fn repetition<I: IntoIterator<Item: Into<Node>>>(
        min: impl IntoBound,
        max: impl IntoBound,
        args: I,
    ) -> Result<Self, Error> {
        let repeat = Repeat::new(min, max)?;
        Self::new(Kind::Repetition(repeat), args)
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Bounds of a repetition fragment.
    #[inline]
    #[must_use]
    pub fn repeat(&self) -> Option<Repeat> {
        match self.kind {
            Kind::Repetition(repeat) => Some(repeat),
            _ => None,
        }
    }

    /// Change the bounds of a repetition fragment.
    pub fn set_repeat(&mut self, min: impl IntoBound, max: impl IntoBound) -> Result<(), Error> {
        let Kind::Repetition(ref mut repeat) = self.kind else {
            return Err(Error::NotARepetition(self.kind));
        };
        *repeat = Repeat::new(min, max)?;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Replace all children. The new children are validated and, unless the
    /// fragment kind is raw, escaped. On error the fragment is left untouched.
    pub fn set_children<I>(&mut self, args: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let mut children: Vec<Node> = args.into_iter().map(Into::into).collect();
        validate(self.kind, &children)?;

        if self.kind.is_escaping() {
            for child in &mut children {
                if let Node::Leaf(leaf) = child {
                    *leaf = Leaf::Text(escape::quote(&leaf.to_string()));
                }
            }
        }

        self.children = children;
        Ok(())
    }

    /// Remove all children.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Negate a range, turning `[a-z]` into `[^a-z]`. Inverting twice has the
    /// same effect as inverting once. Does nothing for other kinds.
    pub fn make_inverted(&mut self) {
        if self.kind != Kind::Range {
            return;
        }

        let caret = || Node::Leaf(Leaf::Text(String::from("^")));
        let Some(first) = self.children.first_mut() else {
            self.children.push(caret());
            return;
        };

        match first {
            Node::Leaf(leaf) => {
                let text = leaf.to_string();
                if !text.starts_with('^') {
                    *leaf = Leaf::Text(format!("^{text}"));
                }
            }
            Node::Fragment(fragment) => {
                if !fragment.render().starts_with('^') {
                    self.children.insert(0, caret());
                }
            }
        }
    }

    /// True if this is a range that has been inverted.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.kind == Kind::Range
            && self
                .children
                .first()
                .is_some_and(|first| first.to_string().starts_with('^'))
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (open, close) = match self.kind {
            Kind::And | Kind::Or | Kind::Repetition(_) => ("(?:", ")"),
            Kind::Optional => ("(?:", ")?"),
            Kind::CapturingGroup => ("(", ")"),
            Kind::Range => ("[", "]"),
            Kind::Comment => ("(?#", ")"),
            Kind::Raw => ("", ""),
        };

        f.write_str(open)?;
        for (i, child) in self.children.iter().enumerate() {
            if i != 0 && self.kind == Kind::Or {
                f.write_char('|')?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(close)?;

        if let Kind::Repetition(repeat) = self.kind {
            f.write_str(&repeat.quantifier())?;
        }
        Ok(())
    }
}

fn validate(kind: Kind, children: &[Node]) -> Result<(), Error> {
    let min = kind.min_arguments();
    if children.len() < min {
        return Err(Error::TooFewArguments {
            kind,
            min,
            given: children.len(),
        });
    }

    for (i, child) in children.iter().enumerate() {
        let index = i + 1;
        match child {
            Node::Leaf(Leaf::Bool(_)) => return Err(Error::InvalidArgumentType { index, kind }),
            Node::Fragment(_) if kind == Kind::Comment => {
                return Err(Error::InvalidArgumentType { index, kind });
            }
            Node::Leaf(Leaf::Text(text)) if kind == Kind::Comment => {
                if let Some(offset) = text.chars().position(|c| c == ')') {
                    return Err(Error::IllegalCommentCharacter {
                        index,
                        offset,
                        character: ')',
                    });
                }
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::INFINITE;

    #[test]
    fn render_templates() {
        assert_eq!(Fragment::and(["ab"]).unwrap().render(), "(?:ab)");
        assert_eq!(Fragment::or(["a", "b", "c"]).unwrap().render(), "(?:a|b|c)");
        assert_eq!(Fragment::optional(["s"]).unwrap().render(), "(?:s)?");
        assert_eq!(Fragment::capturing_group(["ab"]).unwrap().render(), "(ab)");
        assert_eq!(Fragment::range(["a-z", "123"]).unwrap().render(), "[a-z123]");
        assert_eq!(Fragment::comment(["Hello."]).unwrap().render(), "(?#Hello.)");
        assert_eq!(Fragment::raw([r"\d+", "."]).unwrap().render(), r"\d+.");
        assert_eq!(
            Fragment::repetition(2, INFINITE, ["ab"]).unwrap().render(),
            "(?:ab){2,}"
        );
        assert_eq!(Fragment::repetition(1, 1, ["ab"]).unwrap().render(), "(?:ab)");
    }

    #[test]
    fn escapes_only_quoting_kinds() {
        assert_eq!(Fragment::and(["a.b"]).unwrap().render(), r"(?:a\.b)");
        assert_eq!(Fragment::capturing_group(["1+1"]).unwrap().render(), r"(1\+1)");
        assert_eq!(Fragment::raw(["a.b"]).unwrap().render(), "a.b");
        assert_eq!(Fragment::range(["a-z"]).unwrap().render(), "[a-z]");
    }

    #[test]
    fn numbers() {
        let f = Fragment::and(nodes![1, 2.5]).unwrap();
        assert_eq!(f.render(), r"(?:12\.5)");
        assert_eq!(
            f.children(),
            &[
                Node::Leaf(Leaf::Text("1".into())),
                Node::Leaf(Leaf::Text(r"2\.5".into()))
            ]
        );

        let raw = Fragment::raw(nodes![7]).unwrap();
        assert_eq!(raw.children(), &[Node::Leaf(Leaf::Integer(7))]);
    }

    #[test]
    fn nested() {
        let inner = Fragment::or(["http", "ftp"]).unwrap();
        let outer = Fragment::and(nodes![inner, "://"]).unwrap();
        assert_eq!(outer.render(), r"(?:(?:http|ftp)\:\/\/)");
    }

    #[test]
    fn or_requires_two_arguments() {
        assert!(matches!(
            Fragment::or(["a"]),
            Err(Error::TooFewArguments {
                kind: Kind::Or,
                min: 2,
                given: 1
            })
        ));
        assert_eq!(Fragment::or(["a", "b"]).unwrap().render(), "(?:a|b)");
    }

    #[test]
    fn empty_arguments() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            Fragment::and(empty),
            Err(Error::TooFewArguments { min: 1, given: 0, .. })
        ));
        assert!(matches!(
            Fragment::repetition(0, 1, empty),
            Err(Error::TooFewArguments { .. })
        ));
    }

    #[test]
    fn rejects_bool() {
        assert!(matches!(
            Fragment::and(nodes!["a", true]),
            Err(Error::InvalidArgumentType { index: 2, kind: Kind::And })
        ));
    }

    #[test]
    fn comment_validation() {
        assert!(matches!(
            Fragment::comment(["fine", "not (fine)"]),
            Err(Error::IllegalCommentCharacter {
                index: 2,
                offset: 9,
                character: ')'
            })
        ));
        let inner = Fragment::and(["x"]).unwrap();
        assert!(matches!(
            Fragment::comment(nodes![inner]),
            Err(Error::InvalidArgumentType { index: 1, kind: Kind::Comment })
        ));
        assert_eq!(Fragment::comment(nodes![42]).unwrap().render(), "(?#42)");
    }

    #[test]
    fn comment_offset_counts_characters() {
        // `é` and `→` are multi-byte; the offset is in characters.
        assert!(matches!(
            Fragment::comment(["é→)"]),
            Err(Error::IllegalCommentCharacter {
                index: 1,
                offset: 2,
                character: ')'
            })
        ));
    }

    #[test]
    fn set_repeat() {
        let mut f = Fragment::repetition(0, 1, ["ab"]).unwrap();
        f.set_repeat(2, INFINITE).unwrap();
        assert_eq!(f.render(), "(?:ab){2,}");
        assert_eq!(f.repeat().unwrap().min(), 2);

        assert!(matches!(
            f.set_repeat(3, 1),
            Err(Error::MaximumLessThanMinimum { min: 3, max: 1 })
        ));
        assert_eq!(f.render(), "(?:ab){2,}");

        let mut and = Fragment::and(["ab"]).unwrap();
        assert!(matches!(
            and.set_repeat(1, 2),
            Err(Error::NotARepetition(Kind::And))
        ));
    }

    #[test]
    fn set_children_revalidates() {
        let mut f = Fragment::or(["a", "b"]).unwrap();
        assert!(f.set_children(["c"]).is_err());
        assert_eq!(f.render(), "(?:a|b)");
        f.set_children(["c.", "d"]).unwrap();
        assert_eq!(f.render(), r"(?:c\.|d)");
    }

    #[test]
    fn invert_range() {
        let mut range = Fragment::range(["a-z", "123"]).unwrap();
        assert!(!range.is_inverted());
        range.make_inverted();
        assert_eq!(range.render(), "[^a-z123]");
        assert!(range.is_inverted());
        range.make_inverted();
        assert_eq!(range.render(), "[^a-z123]");

        range.clear();
        range.make_inverted();
        assert_eq!(range.render(), "[^]");
        range.make_inverted();
        assert_eq!(range.render(), "[^]");
    }

    #[test]
    fn invert_range_with_numeric_first_child() {
        let mut range = Fragment::range(nodes![0, "-9"]).unwrap();
        range.make_inverted();
        assert_eq!(range.render(), "[^0-9]");
    }

    #[test]
    fn invert_ignores_other_kinds() {
        let mut f = Fragment::and(["a"]).unwrap();
        f.make_inverted();
        assert_eq!(f.render(), "(?:a)");
    }

    #[test]
    fn render_is_repeatable() {
        let f = Fragment::and(nodes![Fragment::optional(["x"]).unwrap(), "y"]).unwrap();
        assert_eq!(f.render(), f.render());
    }
}
