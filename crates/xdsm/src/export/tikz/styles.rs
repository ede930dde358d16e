//! Shared TikZ styles for XDSM diagrams.
//!
//! Every generated document inputs [`STYLES_FILE`](super::STYLES_FILE). It
//! defines the block shapes for each [`SystemKind`], the data block styles,
//! the process and data line styles and the pgf layers the picture draws on.

use std::fmt::{self, Write};

use log::{debug, info};

use xdsm_core::{color::Color, semantic::SystemKind};

use crate::{
    config::StyleConfig,
    export,
    structure::{DATA_INTER_STYLE, DATA_IO_STYLE},
};

const TIKZ_LIBRARIES: &str = "arrows,chains,positioning,scopes,shapes.geometric,shapes.misc,shadows";

/// Render the styles file for `style`.
///
/// A configured `styles_file` is read verbatim. Otherwise the styles are
/// generated from the configured fill colors.
///
/// # Errors
///
/// Returns [`export::Error::Io`] if the configured file cannot be read, or
/// [`export::Error::Render`] if a configured color is invalid.
pub fn render_styles(style: &StyleConfig) -> Result<String, export::Error> {
    if let Some(path) = style.styles_file() {
        info!(path = path.display().to_string(); "Using custom styles file");
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut fills = Vec::with_capacity(SystemKind::ALL.len());
    for kind in SystemKind::ALL {
        let color = style.fill_color(kind).map_err(export::Error::Render)?;
        fills.push((kind, color));
    }
    let data = style.data_fill_color().map_err(export::Error::Render)?;

    let mut out = String::new();
    write_styles(&mut out, &fills, &data)?;
    debug!(bytes = out.len(); "Styles generated");
    Ok(out)
}

fn write_color(out: &mut impl Write, name: &str, color: &Color) -> fmt::Result {
    let [r, g, b] = color.to_rgb8();
    writeln!(out, r"\definecolor{{xdsm{name}}}{{RGB}}{{{r},{g},{b}}}")
}

fn write_styles(out: &mut impl Write, fills: &[(SystemKind, Color)], data: &Color) -> fmt::Result {
    writeln!(out, "% XDSM diagram styles")?;
    writeln!(out, r"\usetikzlibrary{{{TIKZ_LIBRARIES}}}")?;
    writeln!(out)?;

    for (kind, color) in fills {
        write_color(out, kind.style_name(), color)?;
    }
    write_color(out, "Data", data)?;
    writeln!(out)?;

    // Data lines go below process lines, both below the blocks.
    writeln!(out, r"\pgfdeclarelayer{{data}}")?;
    writeln!(out, r"\pgfdeclarelayer{{process}}")?;
    writeln!(out, r"\pgfsetlayers{{data,process,main}}")?;
    writeln!(out)?;

    writeln!(out, r"\tikzset{{")?;
    writeln!(out, "  MatrixSetup/.style={{row sep=3mm, column sep=2mm}},")?;
    writeln!(
        out,
        r"  Block/.style={{draw, line width=0.75pt, align=center, inner sep=6pt, minimum height=1cm}},"
    )?;
    for (kind, _) in fills {
        let name = kind.style_name();
        writeln!(out, "  {name}/.style={{{}, fill=xdsm{name}}},", block_shape(*kind))?;
    }
    writeln!(
        out,
        "  stack/.style={{double copy shadow={{shadow xshift=-1mm, shadow yshift=-1mm}}}},"
    )?;
    writeln!(
        out,
        "  {DATA_INTER_STYLE}/.style={{draw, trapezium, trapezium left angle=70, trapezium right angle=110, align=center, inner sep=4pt, fill=xdsmData}},"
    )?;
    writeln!(out, "  {DATA_IO_STYLE}/.style={{{DATA_INTER_STYLE}, fill=xdsmData!40}},")?;
    writeln!(out, "  DataLine/.style={{color=black!35, line width=5pt, line cap=rect}},")?;
    writeln!(
        out,
        r"  ProcessHV/.style={{-, line width=1pt, to path={{-| (\tikztotarget)}}}},"
    )?;
    writeln!(
        out,
        r"  ProcessHVA/.style={{->, line width=1pt, to path={{-| (\tikztotarget)}}}},"
    )?;
    writeln!(out, "}}")
}

fn block_shape(kind: SystemKind) -> &'static str {
    match kind {
        SystemKind::Optimization => "Block, chamfered rectangle, chamfered rectangle xsep=2cm",
        SystemKind::Mda => "Block, rounded rectangle",
        SystemKind::Analysis => "Block, rectangle",
        SystemKind::Function => "Block, rectangle, rounded corners=3pt",
        SystemKind::Metamodel => {
            "Block, trapezium, trapezium left angle=80, trapezium right angle=80"
        }
    }
}
