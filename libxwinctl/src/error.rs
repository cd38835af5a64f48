use std::error::Error as StdError;
use std::fmt;

/// `WinCtlResult<T>` provides a simplified result type with a common error type
pub type WinCtlResult<T> = std::result::Result<T, ErrorWrapper>;

/// WinCtlError defines all the internal errors that `libxwinctl` might return
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum WinCtlError {
    AtomNotFound(String),
    ClientListNotFound,
    ConnectionClosed,
    CurrentDesktopNotFound,
    InvalidTitleTarget(String),
    InvalidWindowId(String),
    MalformedProperty(String),
    PropertyNotFound(String),
    PropertyTypeMismatch { name: String, expected: u32, actual: u32 },
    SendFailed(String),
}
impl std::error::Error for WinCtlError {}
impl fmt::Display for WinCtlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WinCtlError::AtomNotFound(ref err) => write!(f, "atom {} is not interned", err),
            WinCtlError::ClientListNotFound => {
                write!(f, "cannot get client list properties (_NET_CLIENT_LIST or _WIN_CLIENT_LIST)")
            },
            WinCtlError::ConnectionClosed => write!(f, "connection to the X server is closed"),
            WinCtlError::CurrentDesktopNotFound => {
                write!(f, "cannot get current desktop properties (_NET_CURRENT_DESKTOP or _WIN_WORKSPACE)")
            },
            WinCtlError::InvalidTitleTarget(ref err) => write!(f, "invalid title target was given: {}", err),
            WinCtlError::InvalidWindowId(ref err) => write!(f, "invalid window id was given: {}", err),
            WinCtlError::MalformedProperty(ref err) => write!(f, "property {} is malformed", err),
            WinCtlError::PropertyNotFound(ref err) => write!(f, "property {} was not found", err),
            WinCtlError::PropertyTypeMismatch { ref name, expected, actual } => {
                write!(f, "property {} has type {} but {} was expected", name, actual, expected)
            },
            WinCtlError::SendFailed(ref err) => write!(f, "sending client message {} failed", err),
        }
    }
}

/// ErrorWrapper carries either a `WinCtlError` or the x11rb error that stopped a request so that
/// callers only ever deal with one error type.
#[derive(Debug)]
pub enum ErrorWrapper {
    WinCtl(WinCtlError),
    Connect(x11rb::errors::ConnectError),
    Connection(x11rb::errors::ConnectionError),
    Reply(x11rb::errors::ReplyError),
}
impl ErrorWrapper {
    /// Check if the wrapped error is of the given type
    pub fn is<T: StdError + 'static>(&self) -> bool {
        self.as_ref().is::<T>()
    }

    /// Get the wrapped error as the given type
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.as_ref().downcast_ref::<T>()
    }

    /// True when the error means the property should be treated as not being there at all, which
    /// is what drives the move from a modern property name on to its legacy counterpart.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            ErrorWrapper::WinCtl(WinCtlError::PropertyNotFound(_))
                | ErrorWrapper::WinCtl(WinCtlError::AtomNotFound(_))
                | ErrorWrapper::WinCtl(WinCtlError::PropertyTypeMismatch { .. })
        )
    }
}
impl StdError for ErrorWrapper {}

impl fmt::Display for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.as_ref(), f)
    }
}

impl AsRef<dyn StdError> for ErrorWrapper {
    fn as_ref(&self) -> &(dyn StdError + 'static) {
        match self {
            ErrorWrapper::WinCtl(err) => err,
            ErrorWrapper::Connect(err) => err,
            ErrorWrapper::Connection(err) => err,
            ErrorWrapper::Reply(err) => err,
        }
    }
}

impl From<WinCtlError> for ErrorWrapper {
    fn from(err: WinCtlError) -> Self {
        Self::WinCtl(err)
    }
}

// x11rb errors
impl From<x11rb::errors::ConnectError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectError) -> Self {
        Self::Connect(err)
    }
}

impl From<x11rb::errors::ConnectionError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectionError) -> Self {
        Self::Connection(err)
    }
}

impl From<x11rb::errors::ReplyError> for ErrorWrapper {
    fn from(err: x11rb::errors::ReplyError) -> Self {
        Self::Reply(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors() {
        let err: ErrorWrapper = WinCtlError::PropertyNotFound("_NET_WM_PID".to_owned()).into();
        assert!(err.is::<WinCtlError>());
        assert!(err.is_absent());
        assert_eq!(err.to_string(), "property _NET_WM_PID was not found");

        let err: ErrorWrapper =
            WinCtlError::PropertyTypeMismatch { name: "WM_NAME".to_owned(), expected: 31, actual: 6 }.into();
        assert!(err.is_absent());

        let err: ErrorWrapper = WinCtlError::SendFailed("_NET_CURRENT_DESKTOP".to_owned()).into();
        assert!(!err.is_absent());
        assert_eq!(err.downcast_ref::<WinCtlError>(), Some(&WinCtlError::SendFailed("_NET_CURRENT_DESKTOP".to_owned())));
    }
}
