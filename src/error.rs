use std::fmt;
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    /// Occurs when the record doesn't start with the expected file identifier. Holds the expected
    /// magic string and whatever bytes were actually present (possibly fewer, if the data ended
    /// early).
    BadHeader {
        expected: &'static str,
        found: Vec<u8>,
    },
    /// Record ended before a field (or the end-of-record marker) could be read completely.
    LengthTooShort {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
    /// A text field declared a length greater than the configured maximum.
    LengthTooLong { max: usize, actual: usize },
    /// Basic encoding failure: a negative length, text that isn't UTF-8, a tag whose payload
    /// shape can't be determined, or a file instruction without a path.
    BadEncode(String),
    /// Skipping nested unknown objects hit the nesting limit.
    ParseLimit(String),
    /// The update details file couldn't be opened.
    FailOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Reading or writing an already-open stream failed.
    Io(std::io::Error),
    /// Decoding the contents of a file failed. Wraps the decode error with the file it came from.
    InFile { path: PathBuf, error: Box<Error> },
}

impl Error {
    /// The innermost error, looking through any file context.
    pub fn root(&self) -> &Error {
        match *self {
            Error::InFile { ref error, .. } => error.root(),
            _ => self,
        }
    }

    /// True if this error (or the error it wraps) means the record was cut short.
    pub fn is_truncated(&self) -> bool {
        matches!(self.root(), Error::LengthTooShort { .. })
    }

    /// True if this error (or the error it wraps) means the record isn't an update details record.
    pub fn is_bad_header(&self) -> bool {
        matches!(self.root(), Error::BadHeader { .. })
    }

    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::InFile {
            path: path.into(),
            error: Box::new(self),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::BadHeader {
                expected,
                ref found,
            } => write!(
                f,
                "Data has bad header format: expected file identifier {:?}, found {:x?}",
                expected, found
            ),
            Error::LengthTooShort {
                step,
                actual,
                expected,
            } => write!(
                f,
                "Expected data length {}, but got {} on step [{}]",
                expected, actual, step
            ),
            Error::LengthTooLong { max, actual } => write!(
                f,
                "Data too long: was {} bytes, maximum allowed is {}",
                actual, max
            ),
            Error::BadEncode(ref err) => write!(f, "Basic data encoding failure: {}", err),
            Error::ParseLimit(ref err) => write!(f, "Hit parsing limit: {}", err),
            Error::FailOpen { ref path, ref source } => write!(
                f,
                "The update details file {} failed to open: {}",
                path.display(),
                source
            ),
            Error::Io(ref err) => write!(f, "I/O failure: {}", err),
            Error::InFile { ref path, ref error } => {
                write!(f, "Update details file {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::FailOpen { ref source, .. } => Some(source),
            Error::Io(ref err) => Some(err),
            Error::InFile { ref error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl std::convert::From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
