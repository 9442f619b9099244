use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Error raised when a stat file cannot be opened.
///
/// Carries the offending path so a debug log line names the file that went
/// missing; a bare [`io::Error`] would not say which of the eight candidate
/// stat files was absent.
#[derive(Debug, thiserror::Error)]
#[error("cannot open `{path}`: {source}")]
pub struct FileOpenError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Opens the file at `path` for buffered reading.
///
/// # Errors
///
/// Returns a [`FileOpenError`] naming the path if the open fails.
///
/// # Example
/// ```no_run
/// # use cgwatch::fsutil;
/// let reader = fsutil::open_file_reader("/sys/fs/cgroup/cpu.max")?;
/// # Ok::<(), fsutil::FileOpenError>(())
/// ```
pub fn open_file_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, FileOpenError> {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(source) => Err(FileOpenError {
            path: path.to_path_buf(),
            source,
        }),
    }
}
