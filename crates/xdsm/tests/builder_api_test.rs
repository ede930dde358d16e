//! Integration tests for the DiagramBuilder API

use std::{collections::BTreeSet, fs, path::Path};

use tempfile::tempdir;

use xdsm::{
    DiagramBuilder, WriteOptions, XdsmError,
    config::{AppConfig, BuildConfig, StyleConfig},
};

const MDF: &str = r#"
name = "mdf"

[[system]]
id = "opt"
kind = "optimization"
label = ['0, 4 $\rightarrow$ 1:', "Optimizer"]

[[system]]
id = "solver"
kind = "solver"
label = ['1, 3 $\rightarrow$ 2:', "MDA"]

[[system]]
id = "A"
kind = "analysis"
label = ["2:", "Aero."]

[[system]]
id = "F"
kind = "function"
label = ["3:", '$f$']

[[process]]
systems = ["opt", "solver", "A", "solver", "F", "opt"]

[[connect]]
from = "opt"
to = "A"
label = '$x$'

[[connect]]
from = "A"
to = "F"
label = '$y$'

[[input]]
system = "opt"
label = '$x^{(0)}$'

[[output]]
system = "opt"
label = '$x^*$'
"#;

fn listing(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_parse_figure() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(MDF).expect("Failed to parse figure");

    assert_eq!(diagram.name(), "mdf");
    assert_eq!(diagram.systems().count(), 4);
    assert_eq!(diagram.connections().len(), 2);
    assert_eq!(diagram.processes().len(), 1);
}

#[test]
fn test_load_reads_write_settings() {
    let source = MDF.replacen(
        "name = \"mdf\"\n",
        "name = \"mdf\"\n\n[write]\ncleanup = true\nauto_launch = true\n",
        1,
    );
    let builder = DiagramBuilder::default();

    let figure = builder.load(&source).unwrap();
    let options = figure.write_options();

    assert!(options.build() && options.cleanup() && options.auto_launch());
    assert_eq!(figure.diagram(), &builder.parse(MDF).unwrap());
}

#[test]
fn test_parse_invalid_figure_keeps_source() {
    let source = "name = \"broken\"\n[[connect]]\nfrom = \"a\"\nto = \"b\"\nlabel = \"x\"\n";
    let err = DiagramBuilder::default().parse(source).unwrap_err();

    match err {
        XdsmError::Figure { err, src } => {
            assert_eq!(src, source);
            let span = err.span().expect("span should point at the unknown name");
            assert_eq!(source[span].trim_matches('"'), "a");
        }
        other => panic!("expected a figure error, got {other:?}"),
    }
}

#[test]
fn test_render_tikz_and_document() {
    let builder = DiagramBuilder::new(AppConfig::new(
        BuildConfig::default(),
        StyleConfig::default().with_packages(["sfmath"]),
    ));
    let diagram = builder.parse(MDF).unwrap();

    let tikz = builder.render_tikz(&diagram).unwrap();
    assert!(tikz.contains(r"\node [MDA] (solver)"));
    assert!(tikz.contains(r"\node [DataIO] (input_opt)"));
    assert!(tikz.contains(r"\chainin (F) [join=by ProcessHVA];"));

    let document = builder.render_document("mdf").unwrap();
    assert!(document.contains(r"\usepackage{sfmath}"));
    assert!(document.contains(r"\input{mdf.tikz}"));

    let styles = builder.render_styles().unwrap();
    assert!(styles.contains("MDA/.style="));
}

#[test]
fn test_write_without_build() {
    let dir = tempdir().unwrap();
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(MDF).unwrap();

    let options = WriteOptions::default().with_build(false);
    let artifacts = builder.write(&diagram, dir.path(), &options).unwrap();

    assert_eq!(artifacts.tikz(), dir.path().join("mdf.tikz"));
    assert_eq!(artifacts.tex(), dir.path().join("mdf.tex"));
    assert_eq!(
        artifacts.styles(),
        Some(dir.path().join("diagram_styles.tikz").as_path())
    );
    assert!(artifacts.pdf().is_none());
    assert_eq!(
        listing(dir.path()),
        set(&["mdf.tikz", "mdf.tex", "diagram_styles.tikz"])
    );
}

#[test]
fn test_write_with_name_override() {
    let dir = tempdir().unwrap();
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(MDF).unwrap();

    let options = WriteOptions::default()
        .with_build(false)
        .with_name("idf_trail1");
    builder.write(&diagram, dir.path(), &options).unwrap();

    assert!(dir.path().join("idf_trail1.tikz").exists());
    let document = fs::read_to_string(dir.path().join("idf_trail1.tex")).unwrap();
    assert!(document.contains(r"\input{idf_trail1.tikz}"));
}

#[test]
fn test_write_rejects_missing_directory() {
    let dir = tempdir().unwrap();
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(MDF).unwrap();

    let options = WriteOptions::default().with_build(false);
    let result = builder.write(&diagram, dir.path().join("missing"), &options);
    assert!(matches!(result, Err(XdsmError::Export(_))));
}

#[cfg(unix)]
mod toolchain {
    //! Builds use `sh -c SCRIPT mdf.tex` as a stand-in for pdflatex; the
    //! document name is bound to `$0`.

    use super::*;

    fn builder_with_script(script: &str) -> DiagramBuilder {
        builder_with(BuildConfig::new("sh", ["-c", script]))
    }

    fn builder_with(build: BuildConfig) -> DiagramBuilder {
        DiagramBuilder::new(AppConfig::new(build, StyleConfig::default()))
    }

    const BUILD_SCRIPT: &str = r#"test -f diagram_styles.tikz || exit 7
stem="${0%.tex}"
touch "$stem.pdf" "$stem.aux" "$stem.log""#;

    #[test]
    fn test_build_stages_styles_and_cleans_up() {
        let dir = tempdir().unwrap();
        let builder = builder_with_script(BUILD_SCRIPT);
        let diagram = builder.parse(MDF).unwrap();

        let artifacts = builder
            .write(&diagram, dir.path(), &WriteOptions::default())
            .unwrap();

        assert_eq!(artifacts.pdf(), Some(dir.path().join("mdf.pdf").as_path()));
        assert!(artifacts.styles().is_none());
        assert_eq!(
            listing(dir.path()),
            set(&["mdf.tikz", "mdf.tex", "mdf.pdf"])
        );
    }

    #[test]
    fn test_build_without_cleanup_keeps_intermediates() {
        let dir = tempdir().unwrap();
        let builder = builder_with_script(BUILD_SCRIPT);
        let diagram = builder.parse(MDF).unwrap();

        let options = WriteOptions::default().with_cleanup(false);
        builder.write(&diagram, dir.path(), &options).unwrap();

        assert_eq!(
            listing(dir.path()),
            set(&["mdf.tikz", "mdf.tex", "mdf.pdf", "mdf.aux", "mdf.log"])
        );
    }

    #[test]
    fn test_build_refreshes_existing_styles_file() {
        let dir = tempdir().unwrap();
        let styles = dir.path().join("diagram_styles.tikz");
        fs::write(&styles, "% stale\n").unwrap();

        let builder = builder_with_script(BUILD_SCRIPT);
        let diagram = builder.parse(MDF).unwrap();
        let artifacts = builder
            .write(&diagram, dir.path(), &WriteOptions::default())
            .unwrap();

        assert_eq!(artifacts.styles(), Some(styles.as_path()));
        let refreshed = fs::read_to_string(&styles).unwrap();
        assert!(refreshed.contains(r"\tikzset{"));
    }

    #[test]
    fn test_build_stages_extra_files() {
        let assets = tempdir().unwrap();
        let macros = assets.path().join("macros.tex");
        fs::write(&macros, r"\newcommand{\design}{x}").unwrap();

        let dir = tempdir().unwrap();
        let build = BuildConfig::new(
            "sh",
            ["-c", r#"test -f macros.tex || exit 9; touch "${0%.tex}.pdf""#],
        )
        .with_extra_files(vec![macros]);
        let builder = builder_with(build);
        let diagram = builder.parse(MDF).unwrap();

        builder
            .write(&diagram, dir.path(), &WriteOptions::default())
            .unwrap();

        assert!(!dir.path().join("macros.tex").exists());
        assert!(dir.path().join("mdf.pdf").exists());
    }

    #[test]
    fn test_failed_build_removes_staged_files() {
        let dir = tempdir().unwrap();
        let builder = builder_with_script("exit 1");
        let diagram = builder.parse(MDF).unwrap();

        let result = builder.write(&diagram, dir.path(), &WriteOptions::default());

        assert!(matches!(result, Err(XdsmError::Build(_))));
        assert_eq!(listing(dir.path()), set(&["mdf.tikz", "mdf.tex"]));
    }

    #[test]
    fn test_failed_build_cleans_intermediates_and_keeps_log() {
        let dir = tempdir().unwrap();
        let builder = builder_with_script(
            r#"stem="${0%.tex}"
echo '! Undefined control sequence.' > "$stem.log"
touch "$stem.aux"
exit 1"#,
        );
        let diagram = builder.parse(MDF).unwrap();

        let err = builder
            .write(&diagram, dir.path(), &WriteOptions::default())
            .unwrap_err();

        let XdsmError::Build(err) = err else {
            panic!("expected a build error, got {err:?}");
        };
        assert!(err.log_tail().unwrap().contains("Undefined control sequence"));
        assert_eq!(listing(dir.path()), set(&["mdf.tikz", "mdf.tex"]));
    }

    #[test]
    fn test_failed_build_without_cleanup_keeps_intermediates() {
        let dir = tempdir().unwrap();
        let builder = builder_with_script(r#"touch "${0%.tex}.aux" "${0%.tex}.log"; exit 1"#);
        let diagram = builder.parse(MDF).unwrap();

        let options = WriteOptions::default().with_cleanup(false);
        let result = builder.write(&diagram, dir.path(), &options);

        assert!(matches!(result, Err(XdsmError::Build(_))));
        assert_eq!(
            listing(dir.path()),
            set(&["mdf.tikz", "mdf.tex", "mdf.aux", "mdf.log"])
        );
    }

    #[test]
    fn test_extra_file_named_like_styles_is_rejected() {
        let assets = tempdir().unwrap();
        let custom = assets.path().join("diagram_styles.tikz");
        fs::write(&custom, "% custom\n").unwrap();

        let dir = tempdir().unwrap();
        let build = BuildConfig::new("sh", ["-c", r#"touch "${0%.tex}.pdf""#])
            .with_extra_files(vec![custom]);
        let builder = builder_with(build);
        let diagram = builder.parse(MDF).unwrap();

        let result = builder.write(&diagram, dir.path(), &WriteOptions::default());

        match result {
            Err(XdsmError::Config(message)) => assert!(message.contains("diagram_styles.tikz")),
            other => panic!("expected a configuration error, got {other:?}"),
        }
        assert!(listing(dir.path()).is_disjoint(&set(&["mdf.pdf", "diagram_styles.tikz"])));
    }

    #[test]
    fn test_extra_files_sharing_a_name_are_rejected() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        for assets in [&first, &second] {
            fs::write(assets.path().join("macros.tex"), r"\newcommand{\design}{x}").unwrap();
        }

        let dir = tempdir().unwrap();
        let build = BuildConfig::new("sh", ["-c", r#"touch "${0%.tex}.pdf""#]).with_extra_files(
            vec![
                first.path().join("macros.tex"),
                second.path().join("macros.tex"),
            ],
        );
        let builder = builder_with(build);
        let diagram = builder.parse(MDF).unwrap();

        let result = builder.write(&diagram, dir.path(), &WriteOptions::default());

        assert!(matches!(result, Err(XdsmError::Config(_))));
        assert!(!dir.path().join("macros.tex").exists());
        assert!(!dir.path().join("mdf.pdf").exists());
    }

    #[test]
    fn test_missing_extra_file_fails_before_build() {
        let dir = tempdir().unwrap();
        let build = BuildConfig::new("sh", ["-c", r#"touch "${0%.tex}.pdf""#])
            .with_extra_files(vec![dir.path().join("nowhere").join("macros.tex")]);
        let builder = builder_with(build);
        let diagram = builder.parse(MDF).unwrap();

        let result = builder.write(&diagram, dir.path(), &WriteOptions::default());

        assert!(matches!(result, Err(XdsmError::Io(_))));
        assert!(!dir.path().join("mdf.pdf").exists());
        assert!(!dir.path().join("diagram_styles.tikz").exists());
    }
}
