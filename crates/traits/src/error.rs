//! Error types for hash operations.
//!
//! Hashing itself is infallible. The only runtime failures in the workspace
//! are precondition violations on output streams, reported here.

use core::fmt;

/// A seek on an extendable output stream was rejected.
///
/// The stream is left untouched when this error is returned.
///
/// # Examples
///
/// ```
/// use traits::SeekError;
///
/// fn seek_back(position: u64, delta: u64) -> Result<u64, SeekError> {
///   position.checked_sub(delta).ok_or(SeekError::BeforeStart)
/// }
///
/// assert_eq!(seek_back(10, 4), Ok(6));
/// assert_eq!(seek_back(3, 4), Err(SeekError::BeforeStart));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SeekError {
  /// The target position lies before the first output byte.
  BeforeStart,
  /// The stream is unbounded, so there is no end to seek relative to.
  FromEnd,
  /// The target position does not fit in a `u64` byte offset.
  Overflow,
}

impl fmt::Display for SeekError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::BeforeStart => f.write_str("seek before start of output stream"),
      Self::FromEnd => f.write_str("seek from end of an unbounded output stream"),
      Self::Overflow => f.write_str("seek position overflows the output stream"),
    }
  }
}

impl core::error::Error for SeekError {}

#[cfg(feature = "std")]
impl From<SeekError> for std::io::Error {
  #[inline]
  fn from(err: SeekError) -> Self {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
  }
}
