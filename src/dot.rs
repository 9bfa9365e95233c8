#![allow(missing_docs)]

use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

use crate::{math::IndexedMap, Automaton};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not run dot: \"{0}\"")]
    Io(#[from] std::io::Error),
    #[error("dot exited with status {status}: {stderr}")]
    NonZeroExit {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Quotes an identifier so that arbitrary state labels can be used as node names.
fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

pub trait Dottable {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String {
        let header = std::iter::once(format!(
            "digraph {} {{",
            quote(&self.dot_name().unwrap_or("A".to_string()))
        ))
        .chain(self.dot_header_statements());

        let states = self.dot_states().into_iter().map(|(ident, attrs)| {
            format!(
                "{} [{}]",
                quote(&ident),
                attrs.into_iter().map(|attr| attr.to_string()).join(", ")
            )
        });

        let transitions = self
            .dot_transitions()
            .into_iter()
            .map(|(source, target, attrs)| {
                format!(
                    "{} -> {} [{}]",
                    quote(&source),
                    quote(&target),
                    attrs.into_iter().map(|attr| attr.to_string()).join(", ")
                )
            });

        header
            .chain(states)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }

    fn dot_header_statements(&self) -> Vec<String> {
        vec![]
    }

    fn dot_name(&self) -> Option<String>;

    fn dot_states(&self) -> Vec<(String, Vec<DotStateAttribute>)>;

    fn dot_transitions(&self) -> Vec<(String, String, Vec<DotTransitionAttribute>)>;

    /// Renders the object visually (as PNG) and returns a vec of bytes/u8s encoding
    /// the rendered image. This method is only available on the `graphviz` crate feature
    /// and requires the `dot` executable to be on the path.
    #[cfg(feature = "graphviz")]
    fn render(&self) -> Result<Vec<u8>, RenderError> {
        render_dot(&self.dot_representation())
    }

    /// Renders the object as PNG and writes it to `filename`.
    #[cfg(feature = "graphviz")]
    fn render_to_file(&self, filename: &str) -> Result<(), RenderError> {
        tracing::trace!("rendering dot representation to {filename}");
        std::fs::write(filename, self.render()?)?;
        Ok(())
    }
}

impl Dottable for Automaton {
    fn dot_name(&self) -> Option<String> {
        Some("DFA".into())
    }

    fn dot_header_statements(&self) -> Vec<String> {
        let mut statements = vec![
            "fontname=\"Helvetica,Arial,sans-serif\"".to_string(),
            "rankdir=LR".to_string(),
            "init [label=\"\", shape=none]".to_string(),
            format!("init -> {}", quote(self.initial())),
        ];
        if let Some(description) = self.description() {
            statements.push(format!("label={}", quote(description)));
        }
        statements
    }

    fn dot_states(&self) -> Vec<(String, Vec<DotStateAttribute>)> {
        self.states()
            .map(|q| {
                let shape = if self.is_accepting(q) {
                    "doublecircle"
                } else {
                    "circle"
                };
                (
                    q.to_string(),
                    vec![
                        DotStateAttribute::Label(q.to_string()),
                        DotStateAttribute::Shape(shape.to_string()),
                    ],
                )
            })
            .collect()
    }

    /// Transitions between the same pair of states are merged into one edge whose label lists
    /// all of their groups.
    fn dot_transitions(&self) -> Vec<(String, String, Vec<DotTransitionAttribute>)> {
        let mut edges: IndexedMap<(&str, &str), Vec<&str>> = IndexedMap::default();
        for (q, g, p) in self.transitions() {
            edges.entry((q, p)).or_default().push(g.as_str());
        }
        edges
            .into_iter()
            .map(|((q, p), groups)| {
                (
                    q.to_string(),
                    p.to_string(),
                    vec![DotTransitionAttribute::Label(groups.join(", "))],
                )
            })
            .collect()
    }
}

/// Enum that abstracts attributes in the DOT format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label={}", quote(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{s}\""),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label={}", quote(lbl)),
        }
    }
}

/// Writes `dot` to a temporary file and runs the `dot` executable on it, returning the
/// produced PNG.
#[cfg(feature = "graphviz")]
pub fn render_dot(dot: &str) -> Result<Vec<u8>, RenderError> {
    use std::io::Write;

    let mut tempfile = tempfile::NamedTempFile::new()?;
    tempfile.write_all(dot.as_bytes())?;
    tempfile.flush()?;

    let output = std::process::Command::new("dot")
        .arg("-Tpng")
        .arg(tempfile.path())
        .output()?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::error!("Could not render, dot reported\n{}", &stderr);
        Err(RenderError::NonZeroExit {
            status: output.status,
            stderr,
        })
    }
}
