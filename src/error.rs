/// Converts a `Result` into an `Option`, recording the error through the
/// logger instead of propagating it.
///
/// Stat files being absent or briefly unreadable is the expected steady
/// state on most hosts (no limit configured, wrong hierarchy for the path,
/// not a container at all), so misses are recorded at debug level and never
/// surface as failures.
pub trait ResultOkLogExt<T, E> {
    /// Returns `Some(value)` on success; logs at debug and returns `None`
    /// otherwise.
    fn ok_log(self) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self) -> Option<T> {
        self.inspect_err(|err| log::debug!("{err}")).ok()
    }
}
