use indexmap::IndexSet;

use crate::{
    DELIMITER, Engine, Error, Fragment, IntoBound, Leaf, Modifier, Node, NodeRef, RegexEngine,
    Replaced, Settings,
    visualize::{VisualizeMode, Visualizer},
};

/// Argument to the `add_*` methods of [`RegEx`]: a value, a fragment, or a
/// callback that builds a fragment from the builder.
pub enum Arg<'a> {
    Node(Node),
    Build(Box<dyn FnOnce(&RegEx) -> Result<Fragment, Error> + 'a>),
}

impl<'a> Arg<'a> {
    /// Build a sub-fragment inline, using the builder's factory methods.
    ///
    /// ```
    /// # use regex_maker::{Arg, RegEx};
    /// let mut rx = RegEx::new();
    /// rx.add_and([Arg::with(|rx| rx.or(["cat", "dog"]))])?;
    /// assert_eq!(rx.render(), "/(?:(?:cat|dog))/");
    /// # Ok::<(), regex_maker::Error>(())
    /// ```
    pub fn with<F>(f: F) -> Self
    where
        F: FnOnce(&RegEx) -> Result<Fragment, Error> + 'a,
    {
        Arg::Build(Box::new(f))
    }
}

impl std::fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Arg::Build(_) => f.write_str("Build(..)"),
        }
    }
}

macro_rules! impl_arg_from {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg<'_> {
            #[inline]
            fn from(value: $t) -> Self {
                Arg::Node(Node::from(value))
            }
        }
    )*};
}

impl_arg_from!(
    Node, Leaf, Fragment, &str, String, char, bool, f32, f64, i8, i16, i32, i64, u8, u16, u32
);

/// Build a `Vec<Arg>` from values of mixed types.
///
/// ```
/// # use regex_maker::{Arg, RegEx, args};
/// let mut rx = RegEx::new();
/// rx.add_and(args!["v", 2, Arg::with(|rx| rx.optional([".0"]))])?;
/// assert_eq!(rx.render(), r"/(?:v2(?:\.0)?)/");
/// # Ok::<(), regex_maker::Error>(())
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$(<$crate::Arg<'_> as ::core::convert::From<_>>::from($arg)),*]
    };
}

/// Assembles a regular expression from fragments.
///
/// Call the `add_*` methods to append fragments, then [`RegEx::render`] to get
/// the complete delimited pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct RegEx {
    start: String,
    fragments: Vec<Fragment>,
    end: String,
    /// Active modifiers, in activation order.
    modifiers: IndexSet<Modifier>,
}

impl Default for RegEx {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl RegEx {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: DELIMITER.to_string(),
            fragments: Vec::new(),
            end: DELIMITER.to_string(),
            modifiers: IndexSet::new(),
        }
    }

    #[must_use]
    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            start: settings.start.clone(),
            fragments: Vec::new(),
            end: settings.end.clone(),
            modifiers: settings.modifiers.iter().copied().collect(),
        }
    }

    fn resolve<'a, I>(&self, args: I) -> Result<Vec<Node>, Error>
    where
        I: IntoIterator<Item: Into<Arg<'a>>>,
    {
        args.into_iter()
            .map(|arg| {
                let arg: Arg<'a> = arg.into();
                match arg {
                    Arg::Node(node) => Ok(node),
                    Arg::Build(build) => build(self).map(Node::Fragment),
                }
            })
            .collect()
    }

    pub fn and<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(&self, args: I) -> Result<Fragment, Error> {
        Fragment::and(self.resolve(args)?)
    }

    pub fn or<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(&self, args: I) -> Result<Fragment, Error> {
        Fragment::or(self.resolve(args)?)
    }

    pub fn optional<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &self,
        args: I,
    ) -> Result<Fragment, Error> {
        Fragment::optional(self.resolve(args)?)
    }

    pub fn capturing_group<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &self,
        args: I,
    ) -> Result<Fragment, Error> {
        Fragment::capturing_group(self.resolve(args)?)
    }

    pub fn range<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &self,
        args: I,
    ) -> Result<Fragment, Error> {
        Fragment::range(self.resolve(args)?)
    }

    pub fn comment<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &self,
        args: I,
    ) -> Result<Fragment, Error> {
        Fragment::comment(self.resolve(args)?)
    }

    pub fn raw<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(&self, args: I) -> Result<Fragment, Error> {
        Fragment::raw(self.resolve(args)?)
    }

    pub fn repetition<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &self,
        min: impl IntoBound,
        max: impl IntoBound,
        args: I,
    ) -> Result<Fragment, Error> {
        Fragment::repetition(min, max, self.resolve(args)?)
    }

    /// Append a fragment that has already been built.
    pub fn add(&mut self, fragment: Fragment) -> &mut Self {
        self.fragments.push(fragment);
        self
    }

    /// Append an "and" fragment: all parts must occur, in order.
    pub fn add_and<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &mut self,
        args: I,
    ) -> Result<&mut Self, Error> {
        let fragment = self.and(args)?;
        Ok(self.add(fragment))
    }

    /// Append an "or" fragment: one of at least two parts must occur.
    pub fn add_or<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &mut self,
        args: I,
    ) -> Result<&mut Self, Error> {
        let fragment = self.or(args)?;
        Ok(self.add(fragment))
    }

    /// Append an optional fragment.
    pub fn add_option<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &mut self,
        args: I,
    ) -> Result<&mut Self, Error> {
        let fragment = self.optional(args)?;
        Ok(self.add(fragment))
    }

    /// Append a capturing group. Its match is reported by [`RegEx::test`].
    pub fn add_capturing_group<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &mut self,
        args: I,
    ) -> Result<&mut Self, Error> {
        let fragment = self.capturing_group(args)?;
        Ok(self.add(fragment))
    }

    /// Append a character class. The parts are not escaped.
    pub fn add_range<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &mut self,
        args: I,
    ) -> Result<&mut Self, Error> {
        let fragment = self.range(args)?;
        Ok(self.add(fragment))
    }

    /// Append a comment. The parts may not contain `)`.
    pub fn add_comment<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &mut self,
        args: I,
    ) -> Result<&mut Self, Error> {
        let fragment = self.comment(args)?;
        Ok(self.add(fragment))
    }

    /// Append raw pattern text. The parts are neither escaped nor wrapped.
    pub fn add_raw<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &mut self,
        args: I,
    ) -> Result<&mut Self, Error> {
        let fragment = self.raw(args)?;
        Ok(self.add(fragment))
    }

    /// Append a fragment repeated between `min` and `max` times.
    pub fn add_repetition<'a, I: IntoIterator<Item: Into<Arg<'a>>>>(
        &mut self,
        min: impl IntoBound,
        max: impl IntoBound,
        args: I,
    ) -> Result<&mut Self, Error> {
        let fragment = self.repetition(min, max, args)?;
        Ok(self.add(fragment))
    }

    /// Activate or deactivate a modifier by its shortcut letter. Deactivating
    /// an inactive modifier is allowed.
    pub fn set_modifier(&mut self, shortcut: char, activate: bool) -> Result<&mut Self, Error> {
        let modifier = Modifier::from_shortcut(shortcut)?;
        Ok(self.toggle_modifier(modifier, activate))
    }

    /// Activate or deactivate a modifier. A newly activated modifier is
    /// rendered after the ones already active.
    pub fn toggle_modifier(&mut self, modifier: Modifier, activate: bool) -> &mut Self {
        let changed = if activate {
            self.modifiers.insert(modifier)
        } else {
            self.modifiers.shift_remove(&modifier)
        };
        if changed {
            tracing::debug!(
                "{} modifier `{modifier}`",
                if activate { "Activated" } else { "Deactivated" }
            );
        }
        self
    }

    pub fn set_insensitive_modifier(&mut self, activate: bool) -> &mut Self {
        self.toggle_modifier(Modifier::Insensitive, activate)
    }

    pub fn set_multi_line_modifier(&mut self, activate: bool) -> &mut Self {
        self.toggle_modifier(Modifier::MultiLine, activate)
    }

    pub fn set_single_line_modifier(&mut self, activate: bool) -> &mut Self {
        self.toggle_modifier(Modifier::SingleLine, activate)
    }

    pub fn set_extended_modifier(&mut self, activate: bool) -> &mut Self {
        self.toggle_modifier(Modifier::Extended, activate)
    }

    /// Active modifiers, in activation order.
    pub fn modifiers(&self) -> impl ExactSizeIterator<Item = Modifier> + '_ {
        self.modifiers.iter().copied()
    }

    #[inline]
    #[must_use]
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn set_start(&mut self, start: impl Into<String>) -> &mut Self {
        self.start = start.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn set_end(&mut self, end: impl Into<String>) -> &mut Self {
        self.end = end.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Remove all fragments and modifiers, and restore the default delimiters.
    pub fn clear(&mut self) -> &mut Self {
        tracing::debug!("Clearing {} fragment(s)", self.fragments.len());
        *self = Self::new();
        self
    }

    /// With `recursive`, the number of leaf values in all fragments.
    /// Otherwise the number of top-level fragments.
    #[must_use]
    pub fn size(&self, recursive: bool) -> usize {
        if recursive {
            self.fragments.iter().map(|f| f.size(true)).sum()
        } else {
            self.fragments.len()
        }
    }

    /// Walk every top-level fragment, see [`Fragment::traverse`]. Top-level
    /// fragments are at level 0.
    pub fn traverse<F>(&self, mut f: F)
    where
        F: FnMut(NodeRef<'_>, usize, bool),
    {
        for fragment in &self.fragments {
            fragment.traverse(0, &mut f);
        }
    }

    #[must_use]
    pub fn visualize(&self, mode: VisualizeMode) -> String {
        let mut visualizer = Visualizer::new(mode);
        self.traverse(|node, level, _| visualizer.visit(node, level));
        visualizer.finish()
    }

    /// The complete pattern: start delimiter, fragments, end delimiter, then
    /// the modifier letters.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Match `subject` with the `regex` crate. See [`Engine::test`].
    pub fn test(&self, subject: &str) -> Result<Vec<String>, Error> {
        self.test_with(&RegexEngine, subject)
    }

    pub fn test_with(&self, engine: &impl Engine, subject: &str) -> Result<Vec<String>, Error> {
        Ok(engine.test(&self.render(), subject)?)
    }

    /// Replace matches in `subject` with the `regex` crate. See
    /// [`Engine::replace`].
    pub fn replace(
        &self,
        replacement: &str,
        subject: &str,
        limit: Option<usize>,
    ) -> Result<Replaced, Error> {
        self.replace_with(&RegexEngine, replacement, subject, limit)
    }

    pub fn replace_with(
        &self,
        engine: &impl Engine,
        replacement: &str,
        subject: &str,
        limit: Option<usize>,
    ) -> Result<Replaced, Error> {
        Ok(engine.replace(&self.render(), replacement, subject, limit)?)
    }
}

impl std::fmt::Display for RegEx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.start)?;
        for fragment in &self.fragments {
            write!(f, "{fragment}")?;
        }
        f.write_str(&self.end)?;
        for modifier in &self.modifiers {
            write!(f, "{modifier}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url() -> Result<(), Error> {
        let mut rx = RegEx::new();
        rx.add_and(["http"])?
            .add_option(["s"])?
            .add_and(["://"])?
            .add_option(["www."])?;
        assert_eq!(rx.render(), r"/(?:http)(?:s)?(?:\:\/\/)(?:www\.)?/");
        Ok(())
    }

    #[test]
    fn callbacks_run_in_order() -> Result<(), Error> {
        let mut rx = RegEx::new();
        rx.add_and(args![
            Arg::with(|rx| rx.or(["a", "b"])),
            "-",
            Arg::with(|rx| rx.capturing_group([Arg::with(|rx| rx.range(["0-9"]))])),
        ])?;
        assert_eq!(rx.render(), r"/(?:(?:a|b)\-([0-9]))/");
        assert_eq!(rx.size(false), 1);
        Ok(())
    }

    #[test]
    fn callback_error_propagates() {
        let mut rx = RegEx::new();
        let result = rx.add_and([Arg::with(|rx| rx.or(["only one"]))]);
        assert!(matches!(result, Err(Error::TooFewArguments { .. })));
        assert!(rx.fragments().is_empty());
    }

    #[test]
    fn callback_can_borrow_locals() -> Result<(), Error> {
        let words = vec!["red", "green"];
        let mut rx = RegEx::new();
        rx.add_and([Arg::with(|rx| rx.or(words.iter().copied()))])?;
        assert_eq!(rx.render(), "/(?:(?:red|green))/");
        Ok(())
    }

    #[test]
    fn modifiers_in_activation_order() -> Result<(), Error> {
        let mut rx = RegEx::new();
        rx.add_and(["a"])?;
        rx.set_modifier('s', true)?.set_modifier('i', true)?;
        assert_eq!(rx.render(), "/(?:a)/si");

        rx.set_modifier('s', true)?;
        assert_eq!(rx.render(), "/(?:a)/si");

        rx.set_modifier('s', false)?.set_modifier('s', true)?;
        assert_eq!(rx.render(), "/(?:a)/is");

        rx.set_extended_modifier(true).set_multi_line_modifier(false);
        assert_eq!(rx.render(), "/(?:a)/isx");
        assert!(rx.has_modifier(Modifier::Extended));

        assert!(matches!(
            rx.set_modifier('g', true),
            Err(Error::UnknownModifier('g'))
        ));
        Ok(())
    }

    #[test]
    fn delimiters() -> Result<(), Error> {
        let mut rx = RegEx::new();
        rx.set_start("#").set_end("#").add_raw(["a/b"])?;
        assert_eq!(rx.start(), "#");
        assert_eq!(rx.render(), "#a/b#");
        Ok(())
    }

    #[test]
    fn with_settings() {
        let settings = Settings {
            start: "{".into(),
            end: "}".into(),
            modifiers: vec![Modifier::MultiLine, Modifier::Insensitive, Modifier::MultiLine],
        };
        let rx = RegEx::with_settings(&settings);
        assert_eq!(rx.render(), "{}mi");
    }

    #[test]
    fn clear() -> Result<(), Error> {
        let mut rx = RegEx::new();
        rx.set_start("~").set_end("~").set_insensitive_modifier(true);
        rx.add_and(["a"])?.add_or(["b", "c"])?;
        rx.clear();
        assert_eq!(rx.size(false), 0);
        assert_eq!(rx.modifiers().len(), 0);
        assert_eq!(rx.start(), "/");
        assert_eq!(rx.end(), "/");
        assert_eq!(rx, RegEx::new());
        Ok(())
    }
}
