use std::fmt::Write as _;

use crate::{Fragment, NodeRef};

/// Output format of [`Fragment::visualize`] and
/// [`RegEx::visualize`](crate::RegEx::visualize).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisualizeMode {
    /// One line per node, each terminated by `\n`.
    #[default]
    Text,
    /// The same lines, decorated with HTML and wrapped in `<pre>`.
    Html,
}

/// Collects one line per visited node.
#[derive(Debug)]
pub(crate) struct Visualizer {
    mode: VisualizeMode,
    lines: Vec<String>,
}

impl Visualizer {
    pub fn new(mode: VisualizeMode) -> Self {
        Self {
            mode,
            lines: Vec::new(),
        }
    }

    pub fn visit(&mut self, node: NodeRef<'_>, level: usize) {
        let indent = match self.mode {
            VisualizeMode::Text => "  ",
            VisualizeMode::Html => "&nbsp;&nbsp;",
        };
        let mut line = indent.repeat(level);

        // Writing to a String cannot fail.
        _ = match node {
            NodeRef::Fragment(fragment) => write!(
                line,
                "{} ({}): {}",
                self.label(fragment.kind().label()),
                fragment.size(true),
                self.value(&fragment.render()),
            ),
            NodeRef::Leaf(leaf) => write!(
                line,
                "{}: {}",
                self.label(leaf.type_name()),
                self.value(&leaf.to_string()),
            ),
        };

        self.lines.push(line);
    }

    pub fn finish(self) -> String {
        match self.mode {
            VisualizeMode::Text => {
                let mut out = String::new();
                for line in &self.lines {
                    out.push_str(line);
                    out.push('\n');
                }
                out
            }
            VisualizeMode::Html => format!("<pre>{}</pre>", self.lines.join("<br>\n")),
        }
    }

    fn label(&self, label: &str) -> String {
        match self.mode {
            VisualizeMode::Text => label.to_owned(),
            VisualizeMode::Html => format!("<strong>{label}</strong>"),
        }
    }

    fn value(&self, value: &str) -> String {
        match self.mode {
            VisualizeMode::Text => value.to_owned(),
            VisualizeMode::Html => format!("<code>{}</code>", html_escape(value)),
        }
    }
}

fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl Fragment {
    /// Render the structure of this fragment as an indented outline.
    #[must_use]
    pub fn visualize(&self, mode: VisualizeMode) -> String {
        let mut visualizer = Visualizer::new(mode);
        self.traverse(0, |node, level, _| visualizer.visit(node, level));
        visualizer.finish()
    }
}
