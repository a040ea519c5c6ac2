//! Error types.

use std::fmt::{self, Formatter, Display};


pub type Result<I> = std::result::Result<I, Error>;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    error: Box<dyn std::error::Error + Send + Sync>,
    offset: Option<usize>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ErrorKind {
    /// Underlying IO error.
    ///
    /// Leaves the packer or unpacker in a **"broken"** state.
    Io,

    /// (Only when unpacking) the input ended before the value did.
    ///
    /// Leaves the unpacker in a **"broken"** state.
    Truncated,

    /// (Only when unpacking) the bytes are not a valid encoding of the value
    /// being read, such as a string that isn't UTF-8.
    ///
    /// Leaves the unpacker in a **"broken"** state.
    MalformedData,

    /// The value can't be represented in the wire format, such as a string
    /// too long for its length prefix.
    ///
    /// Leaves the packer **unchanged**.
    Unrepresentable,

    /// An API call was made on a packer or unpacker that is already broken.
    ApiUsage,
}

impl Error {
    pub fn new<E>(kind: ErrorKind, error: E, offset: Option<usize>) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error {
            kind,
            error: error.into(),
            offset,
        }
    }

    /// Attach a byte offset, unless one is already present.
    pub(crate) fn at(mut self, offset: usize) -> Self {
        self.offset.get_or_insert(offset);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Byte offset into the stream at which the error occurred, if known.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.error
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::UnexpectedEof => ErrorKind::Truncated,
            _ => ErrorKind::Io,
        };
        Self::new(kind, error, None)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::Io => "IO error",
            ErrorKind::Truncated => "truncated data",
            ErrorKind::MalformedData => "malformed data",
            ErrorKind::Unrepresentable => "unrepresentable value",
            ErrorKind::ApiUsage => "API usage error",
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.kind, f)?;
        f.write_str(", ")?;
        Display::fmt(&self.error, f)?;
        if let Some(offset) = self.offset {
            write!(f, " (at byte {})", offset)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner())
    }
}


macro_rules! error {
    ($k:ident, $offset:expr, $($e:tt)*)=>{
        $crate::error::Error::new(
            $crate::error::ErrorKind::$k,
            format!($($e)*),
            $offset,
        )
    };
}

macro_rules! bail {
    ($($e:tt)*)=>{ return Err(error!($($e)*)) };
}

macro_rules! ensure {
    ($c:expr, $($e:tt)*)=>{
        if !$c {
            bail!($($e)*);
        }
    };
}

pub(crate) use error;
pub(crate) use bail;
pub(crate) use ensure;
