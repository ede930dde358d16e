//! Multi-line TeX labels.

use serde::Deserialize;

/// Display text attached to a system, connection or annotation.
///
/// A label holds one or more lines of raw TeX. Lines may mix text mode and
/// inline math (`$...$`); they are emitted verbatim by the exporter.
///
/// # Examples
///
/// ```
/// use xdsm_core::semantic::Label;
///
/// let single = Label::from(r"$W_f$");
/// assert_eq!(single.lines(), [r"$W_f$"]);
///
/// let stacked = Label::from(["3:", "Aero."]);
/// assert_eq!(stacked.lines().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "LabelRepr")]
pub struct Label {
    lines: Vec<String>,
}

/// Figure files accept either a single string or an array of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelRepr {
    Line(String),
    Lines(Vec<String>),
}

impl From<LabelRepr> for Label {
    fn from(repr: LabelRepr) -> Self {
        match repr {
            LabelRepr::Line(line) => Self::from(line),
            LabelRepr::Lines(lines) => Self::from(lines),
        }
    }
}

impl Label {
    /// Creates a label from any sequence of lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the label lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns `true` if the label has no lines or only empty lines.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.is_empty())
    }
}

impl From<&str> for Label {
    fn from(line: &str) -> Self {
        Self {
            lines: vec![line.to_string()],
        }
    }
}

impl From<String> for Label {
    fn from(line: String) -> Self {
        Self { lines: vec![line] }
    }
}

impl From<Vec<String>> for Label {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl From<&[&str]> for Label {
    fn from(lines: &[&str]) -> Self {
        Self::from_lines(lines.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Label {
    fn from(lines: [&str; N]) -> Self {
        Self::from_lines(lines)
    }
}
