//! Helpers for composing TeX label text.

use crate::semantic::Label;

/// Preamble definition of the `\zero{...}` macro, the TeX twin of [`zero`].
pub const ZERO_MACRO: &str = r"\newcommand{\zero}[1]{#1^{\left(0\right)}}";

/// Formats `tex` as an initial value by adding a `(0)` superscript.
///
/// # Examples
///
/// ```
/// use xdsm_core::tex::zero;
///
/// assert_eq!(zero("S"), r"S^{\left(0\right)}");
/// assert_eq!(format!("${}$", zero(r"\Lambda_1")), r"$\Lambda_1^{\left(0\right)}$");
/// ```
pub fn zero(tex: &str) -> String {
    format!(r"{tex}^{{\left(0\right)}}")
}

/// Renders a label as node content.
///
/// A single line is returned unchanged. Several lines are stacked in a
/// centred `tabular` so that each line keeps its own math delimiters.
///
/// # Examples
///
/// ```
/// use xdsm_core::{semantic::Label, tex::render_label};
///
/// assert_eq!(render_label(&Label::from("$f$")), "$f$");
/// assert_eq!(
///     render_label(&Label::from(["3:", "Aero."])),
///     r"\begin{tabular}{c}3:\\Aero.\end{tabular}"
/// );
/// ```
pub fn render_label(label: &Label) -> String {
    match label.lines() {
        [] => String::new(),
        [line] => line.clone(),
        lines => format!(r"\begin{{tabular}}{{c}}{}\end{{tabular}}", lines.join(r"\\")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(zero("A"), r"A^{\left(0\right)}");
        assert_eq!(zero(r"\hat{W}_f"), r"\hat{W}_f^{\left(0\right)}");
    }

    #[test]
    fn test_zero_matches_macro() {
        // The macro body with `#1` substituted must equal the helper output.
        let body = ZERO_MACRO
            .strip_prefix(r"\newcommand{\zero}[1]{")
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap();
        assert_eq!(body.replace("#1", "b"), zero("b"));
    }

    #[test]
    fn test_render_empty_label() {
        assert_eq!(render_label(&Label::default()), "");
    }

    #[test]
    fn test_render_three_lines() {
        let label = Label::from(["a", "$b$", "c"]);
        assert_eq!(
            render_label(&label),
            r"\begin{tabular}{c}a\\$b$\\c\end{tabular}"
        );
    }
}
