//! External TeX toolchain invocation.
//!
//! [`Toolchain`] runs the configured typesetting command on a generated
//! document, optionally under a timeout, and opens the resulting PDF.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::config::BuildConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Lines of the TeX log kept when a build fails.
const LOG_TAIL_LINES: usize = 20;

/// Files the toolchain leaves next to the document.
const INTERMEDIATE_EXTENSIONS: [&str; 4] = ["aux", "fdb_latexmk", "fls", "log"];

/// Errors raised while running the toolchain or the viewer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed with {status}")]
    Failed {
        command: String,
        status: ExitStatus,
        log_tail: Option<String>,
    },

    #[error("`{command}` did not finish within {} s", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{}` was not produced", path.display())]
    MissingOutput { path: PathBuf },

    #[error("failed to open `{}` with `{viewer}`: {source}", path.display())]
    Launch {
        path: PathBuf,
        viewer: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Last lines of the TeX log for a failed build, if one was written.
    pub fn log_tail(&self) -> Option<&str> {
        match self {
            Self::Failed { log_tail, .. } => log_tail.as_deref(),
            _ => None,
        }
    }
}

/// A configured typesetting command.
#[derive(Debug, Clone)]
pub struct Toolchain {
    command: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    viewer: Option<String>,
}

impl Toolchain {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            command: config.command().to_string(),
            args: config.args().to_vec(),
            timeout: config.timeout(),
            viewer: config.viewer().map(str::to_string),
        }
    }

    /// Typeset `{name}.tex` inside `directory` and return the PDF path.
    ///
    /// The command runs with `directory` as its working directory so that
    /// relative `\input` paths resolve next to the document.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the command cannot start, exits unsuccessfully,
    /// exceeds the timeout, or does not produce `{name}.pdf`.
    pub fn compile(&self, directory: &Path, name: &str) -> Result<PathBuf, Error> {
        let document = format!("{name}.tex");
        info!(command = self.command.as_str(), document = document.as_str(); "Running TeX toolchain");

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(&document)
            .current_dir(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| Error::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let status = self.wait(&mut child)?;
        if !status.success() {
            error!(command = self.command.as_str(), status = status.to_string(); "TeX toolchain failed");
            return Err(Error::Failed {
                command: self.command.clone(),
                status,
                log_tail: read_log_tail(&directory.join(format!("{name}.log"))),
            });
        }

        let pdf = directory.join(format!("{name}.pdf"));
        if !pdf.is_file() {
            return Err(Error::MissingOutput { path: pdf });
        }

        info!(path = pdf.display().to_string(); "PDF built");
        Ok(pdf)
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus, Error> {
        let wait_error = |source| Error::Wait {
            command: self.command.clone(),
            source,
        };

        let Some(timeout) = self.timeout else {
            return child.wait().map_err(wait_error);
        };

        let started = Instant::now();
        loop {
            match child.try_wait().map_err(wait_error)? {
                Some(status) => return Ok(status),
                None if started.elapsed() >= timeout => {
                    warn!(command = self.command.as_str(), timeout_secs = timeout.as_secs(); "Killing TeX toolchain after timeout");
                    if let Err(err) = child.kill() {
                        warn!(err:err; "Failed to kill TeX toolchain");
                    }
                    if let Err(err) = child.wait() {
                        warn!(err:err; "Failed to reap TeX toolchain");
                    }
                    return Err(Error::Timeout {
                        command: self.command.clone(),
                        timeout,
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }

    /// Open `pdf` with the configured viewer or the platform's default opener.
    ///
    /// The viewer is started detached; its exit status is not awaited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Launch`] if the viewer cannot be started.
    pub fn launch(&self, pdf: &Path) -> Result<(), Error> {
        let (program, args) = match &self.viewer {
            Some(viewer) => (viewer.as_str(), &[][..]),
            None => platform_opener(),
        };
        info!(viewer = program, path = pdf.display().to_string(); "Opening PDF");

        let mut child = Command::new(program)
            .args(args)
            .arg(pdf)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| Error::Launch {
                path: pdf.to_path_buf(),
                viewer: program.to_string(),
                source,
            })?;

        thread::spawn(move || {
            if let Err(err) = child.wait() {
                warn!(err:err; "Failed to wait for viewer");
            }
        });
        Ok(())
    }
}

fn platform_opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(windows) {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

/// Remove the toolchain's intermediate files for `name` from `directory`.
///
/// Files that do not exist are skipped; other failures are logged.
pub fn clean_intermediates(directory: &Path, name: &str) {
    for extension in INTERMEDIATE_EXTENSIONS {
        let path = directory.join(format!("{name}.{extension}"));
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = path.display().to_string(); "Removed intermediate file"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = path.display().to_string(), err:err; "Failed to remove intermediate file");
            }
        }
    }
}

fn read_log_tail(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    Some(lines[start..].join("\n"))
}
