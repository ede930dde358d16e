//! Scoped staging of build inputs.
//!
//! [`StagedFiles`] copies files into a working directory for as long as the
//! guard is alive and removes the copies when it is dropped. The TeX build
//! uses it to place the styles file (and any configured extras) next to the
//! document for the duration of a single toolchain run.

use std::{
    fs::{self, File, FileTimes, Metadata, OpenOptions},
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use log::{debug, warn};

/// Guard over files copied into a directory.
///
/// Copies are removed when the guard is dropped, including on early return,
/// `?` propagation and unwinding panics. Removal is best effort: a copy that
/// has already disappeared is ignored, any other failure is logged.
///
/// # Examples
///
/// ```no_run
/// use xdsm::temporary::StagedFiles;
///
/// # fn main() -> std::io::Result<()> {
/// let staged = StagedFiles::stage(["assets/diagram_styles.tikz", "macros.tex"], "out")?;
/// // ... run the build inside `out` ...
/// drop(staged); // both copies are gone again
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use = "staged files are removed as soon as the guard is dropped"]
pub struct StagedFiles {
    staged: Vec<PathBuf>,
}

impl StagedFiles {
    /// Stage a single file into `directory`.
    ///
    /// # Errors
    ///
    /// See [`StagedFiles::stage`].
    pub fn single(source: impl AsRef<Path>, directory: impl AsRef<Path>) -> io::Result<Self> {
        Self::stage([source], directory)
    }

    /// Copy every file in `sources` into `directory` under its file name.
    ///
    /// Modification and access times of each source are carried over to its
    /// copy. `directory` must already exist.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error encountered: a missing or unreadable
    /// source, a missing or unwritable directory, a source without a file
    /// name ([`ErrorKind::InvalidInput`]) or a destination that already exists
    /// ([`ErrorKind::AlreadyExists`]). Copies made before the failure are
    /// removed before the error is returned.
    pub fn stage<I, P>(sources: I, directory: impl AsRef<Path>) -> io::Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let directory = directory.as_ref();
        let mut guard = Self { staged: Vec::new() };

        for source in sources {
            // On error `guard` is dropped and removes the earlier copies.
            let destination = copy_into(source.as_ref(), directory)?;
            debug!(destination:? = destination; "Staged file");
            guard.staged.push(destination);
        }

        Ok(guard)
    }

    /// Paths of the staged copies, in staging order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.staged
    }

    /// Remove all staged copies now.
    ///
    /// Calling this more than once is harmless.
    pub fn release(&mut self) {
        for path in self.staged.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path:? = path; "Removed staged file"),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    debug!(path:? = path; "Staged file already removed");
                }
                Err(err) => warn!(path:? = path, err:err; "Failed to remove staged file"),
            }
        }
    }
}

impl Drop for StagedFiles {
    fn drop(&mut self) {
        self.release();
    }
}

/// Copies `source` to `directory/<file name>` without overwriting.
fn copy_into(source: &Path, directory: &Path) -> io::Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        io::Error::new(
            ErrorKind::InvalidInput,
            format!("cannot stage `{}`: path has no file name", source.display()),
        )
    })?;
    let destination = directory.join(file_name);

    // Open the source first so a missing source never creates the destination.
    let mut reader = File::open(source)?;
    let metadata = reader.metadata()?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&destination)?;

    let filled = io::copy(&mut reader, &mut writer)
        .and_then(|_| carry_times(&writer, &metadata));
    if let Err(err) = filled {
        drop(writer);
        let _ = fs::remove_file(&destination);
        return Err(err);
    }

    Ok(destination)
}

fn carry_times(writer: &File, metadata: &Metadata) -> io::Result<()> {
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    writer.set_times(times)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeSet,
        panic::{self, AssertUnwindSafe},
        time::{Duration, SystemTime},
    };

    use tempfile::{TempDir, tempdir};

    use super::*;

    /// A source directory holding `a.txt` and `b.txt`, and an empty target.
    fn fixture() -> (TempDir, TempDir) {
        let src = tempdir().unwrap();
        fs::write(src.path().join("a.txt"), "alpha").unwrap();
        fs::write(src.path().join("b.txt"), "beta").unwrap();
        let target = tempdir().unwrap();
        (src, target)
    }

    fn listing(dir: &Path) -> BTreeSet<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    #[test]
    fn test_stage_two_files_and_release_on_drop() {
        let (src, tmp) = fixture();
        let before = listing(tmp.path());

        {
            let staged = StagedFiles::stage(
                [src.path().join("a.txt"), src.path().join("b.txt")],
                tmp.path(),
            )
            .unwrap();

            assert_eq!(
                staged.paths(),
                [tmp.path().join("a.txt"), tmp.path().join("b.txt")]
            );
            assert_eq!(
                fs::read_to_string(tmp.path().join("a.txt")).unwrap(),
                "alpha"
            );
            assert_eq!(
                fs::read_to_string(tmp.path().join("b.txt")).unwrap(),
                "beta"
            );
        }

        assert!(!tmp.path().join("a.txt").exists());
        assert!(!tmp.path().join("b.txt").exists());
        assert_eq!(listing(tmp.path()), before);
        // Sources are untouched
        assert!(src.path().join("a.txt").exists());
    }

    #[test]
    fn test_single() {
        let (src, tmp) = fixture();
        let staged = StagedFiles::single(src.path().join("a.txt"), tmp.path()).unwrap();
        assert_eq!(staged.paths().len(), 1);
        assert!(tmp.path().join("a.txt").exists());
        drop(staged);
        assert!(!tmp.path().join("a.txt").exists());
    }

    #[test]
    fn test_modification_time_is_preserved() {
        let (src, tmp) = fixture();
        let source = src.path().join("a.txt");
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(stamp)
            .unwrap();

        let staged = StagedFiles::single(&source, tmp.path()).unwrap();
        let copied = fs::metadata(&staged.paths()[0]).unwrap().modified().unwrap();
        assert_eq!(copied, stamp);
    }

    #[test]
    fn test_missing_source_cleans_up_partial_copies() {
        let (src, tmp) = fixture();
        let before = listing(tmp.path());

        let err = StagedFiles::stage(
            [
                src.path().join("a.txt"),
                src.path().join("missing.txt"),
                src.path().join("b.txt"),
            ],
            tmp.path(),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(listing(tmp.path()), before);
    }

    #[test]
    fn test_missing_target_directory() {
        let (src, tmp) = fixture();
        let missing = tmp.path().join("nope");

        let err = StagedFiles::single(src.path().join("a.txt"), &missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!missing.exists());
    }

    #[test]
    fn test_existing_destination_is_not_overwritten() {
        let (src, tmp) = fixture();
        fs::write(tmp.path().join("b.txt"), "keep me").unwrap();

        let err = StagedFiles::stage(
            [src.path().join("a.txt"), src.path().join("b.txt")],
            tmp.path(),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(!tmp.path().join("a.txt").exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join("b.txt")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn test_source_without_file_name() {
        let (_src, tmp) = fixture();
        let err = StagedFiles::single("/", tmp.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_release_after_error_in_scope() {
        let (src, tmp) = fixture();

        fn build_step(src: &Path, dir: &Path) -> io::Result<()> {
            let _staged = StagedFiles::single(src.join("a.txt"), dir)?;
            assert!(dir.join("a.txt").exists());
            Err(io::Error::other("toolchain failed"))
        }

        let err = build_step(src.path(), tmp.path()).unwrap_err();
        assert_eq!(err.to_string(), "toolchain failed");
        assert!(!tmp.path().join("a.txt").exists());
    }

    #[test]
    fn test_release_on_panic() {
        let (src, tmp) = fixture();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _staged = StagedFiles::single(src.path().join("a.txt"), tmp.path()).unwrap();
            panic!("build step panicked");
        }));

        assert!(result.is_err());
        assert!(!tmp.path().join("a.txt").exists());
    }

    #[test]
    fn test_release_twice_and_after_external_delete() {
        let (src, tmp) = fixture();
        let mut staged = StagedFiles::stage(
            [src.path().join("a.txt"), src.path().join("b.txt")],
            tmp.path(),
        )
        .unwrap();

        fs::remove_file(tmp.path().join("a.txt")).unwrap();
        staged.release();
        assert!(!tmp.path().join("b.txt").exists());
        assert!(staged.paths().is_empty());

        staged.release();
        drop(staged);
    }
}
