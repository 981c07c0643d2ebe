use thiserror::Error;

/// Errors surfaced by the segmentation engine.
///
/// The algorithmic core assumes well-formed inputs and finalized resources;
/// every variant here originates either at the boundary (resource loading,
/// raw byte input) or from an internal invariant check.
#[derive(Debug, Error)]
pub enum Error {
    /// An internal invariant was violated, e.g. the word lattice has no path
    /// from start to end. Unrecoverable.
    #[error("irrecoverable, unexpected internal error")]
    Internal,

    /// File I/O failed while loading a dictionary or model.
    #[error("file i/o failed")]
    Io(#[from] std::io::Error),

    /// A dictionary or model file does not follow its line format.
    #[error("malformed resource file: {0}")]
    Parse(String),

    /// The input is not a valid UTF-8 sequence.
    #[error("input is not a valid utf-8 sequence (byte offset {offset})")]
    BadEncoding {
        /// Byte offset of the rune whose encoded length runs past the input.
        offset: usize,
    },

    /// An iterator or buffer was read past its end.
    #[error("attempting to access an object beyond its limit")]
    Overflow,
}

impl Error {
    /// Stable C-style status code for this error, for embedding callers:
    /// `0` is reserved for success, `-1` internal, `-2` I/O or parse,
    /// `-3` bad encoding, `-4` overflow.
    pub fn code(&self) -> i32 {
        match self {
            Error::Internal => -1,
            Error::Io(_) | Error::Parse(_) => -2,
            Error::BadEncoding { .. } => -3,
            Error::Overflow => -4,
        }
    }
}

/// Result type for segmentation operations.
pub type Result<T> = std::result::Result<T, Error>;
