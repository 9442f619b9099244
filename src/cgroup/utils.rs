use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::error::ResultOkLogExt;

/// Reads a stat value through the given parser, then rewinds the handle so
/// the next tick re-reads fresh kernel content from offset zero.
///
/// Both a missing handle and a failed read yield `None`; the failure is
/// logged at debug level and never aborts the surrounding tick.
pub(crate) fn sample_and_rewind<T, R>(
    file: Option<&mut R>,
    read: impl FnOnce(&mut R) -> std::io::Result<T>,
) -> Option<T>
where
    R: BufRead + Seek,
{
    let file = file?;
    let value = read(file).ok_log();
    if let Err(err) = file.seek(SeekFrom::Start(0)) {
        log::debug!("failed to rewind stat file: {err}");
    }
    value
}

/// Opens a stat file for repeated sampling.
///
/// Absence is an expected steady state (wrong hierarchy for the path, no
/// limit configured), so a miss only produces a debug log line.
pub(crate) fn open_stat_file(path: impl AsRef<Path>) -> Option<BufReader<File>> {
    crate::fsutil::open_file_reader(path).ok_log()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_sample_and_rewind_rereads_from_start() {
        let mut cursor = Cursor::new(b"42\n".to_vec());
        let read_all = |buf: &mut Cursor<Vec<u8>>| -> std::io::Result<String> {
            let mut s = String::new();
            buf.read_line(&mut s)?;
            Ok(s)
        };

        let first = sample_and_rewind(Some(&mut cursor), read_all);
        let second = sample_and_rewind(Some(&mut cursor), read_all);
        assert_eq!(first.as_deref(), Some("42\n"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_and_rewind_missing_handle() {
        let result = sample_and_rewind(None::<&mut Cursor<Vec<u8>>>, |_| Ok(0u64));
        assert_eq!(result, None);
    }

    #[test]
    fn test_sample_and_rewind_read_failure_is_none() {
        let mut cursor = Cursor::new(b"abc\n".to_vec());
        let result = sample_and_rewind(Some(&mut cursor), |buf| {
            crate::cgroup::stats::read_u64(buf)
        });
        assert_eq!(result, None);
        // handle is rewound even after a failed parse
        let next = sample_and_rewind(Some(&mut cursor), |buf| {
            let mut s = String::new();
            buf.read_line(&mut s)?;
            Ok(s)
        });
        assert_eq!(next.as_deref(), Some("abc\n"));
    }
}
