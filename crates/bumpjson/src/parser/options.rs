/// Configuration for a [`Parser`](crate::Parser).
///
/// # Default
///
/// Strict single-document parsing with no nesting limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether to leave bytes after the top-level value unchecked.
    ///
    /// By default the parser skips trailing whitespace and rejects anything
    /// else with [`ErrorKind::TrailingContent`](crate::ErrorKind::TrailingContent).
    /// With `streaming` set, the parse stops right after the value and the
    /// remaining bytes stay in the source.
    ///
    /// # Examples
    ///
    /// ```json
    /// 1 2
    /// ```
    ///
    /// is rejected by default and yields `1` when streaming.
    ///
    /// # Default
    ///
    /// `false`
    pub streaming: bool,

    /// Maximum number of nested objects and arrays.
    ///
    /// `Some(n)` accepts documents whose containers nest at most `n` deep and
    /// fails deeper ones with [`ErrorKind::OutOfMemory`](crate::ErrorKind::OutOfMemory).
    /// Scalars do not count. `None` disables the limit.
    ///
    /// # Default
    ///
    /// `None`
    pub max_depth: Option<usize>,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on syntax errors instead of returning them.
    ///
    /// Only present in test and fuzzing builds, where a backtrace at the
    /// failure point is more useful than the error value.
    pub panic_on_error: bool,
}
