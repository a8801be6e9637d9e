use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::mcu::fsel::VALID_CHOICES;

/// Errors surfaced while mapping the GPIO block or touching its registers.
///
/// Io sources are kept behind an `Arc` so the whole enum stays `Clone`.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("permission denied opening {}; are you running as root?", .device.display())]
    PermissionDenied { device: PathBuf },

    #[error("unexpected error opening {}: {source}", .device.display())]
    Io {
        device: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("invalid function '{0}'; valid choices: {choices}", choices = VALID_CHOICES)]
    InvalidArgument(String),

    #[error("register offset {offset:#x} is outside the {len}-byte register window")]
    OutOfRange { offset: usize, len: usize },

    #[error("register offset {0:#x} is not word aligned")]
    Misaligned(usize),

    #[error("register window is mapped read-only")]
    ReadOnly,

    #[error("function select field holds {0}, which is not a 3-bit value")]
    InvalidField(u8),

    #[error("failed to write output: {0}")]
    Output(#[source] Arc<io::Error>),
}

impl Error {
    /// Classifies a failure to open or map `device`.
    pub fn acquire(device: impl Into<PathBuf>, err: io::Error) -> Self {
        let device = device.into();
        match err.kind() {
            io::ErrorKind::PermissionDenied => Error::PermissionDenied { device },
            _ => Error::Io {
                device,
                source: Arc::new(err),
            },
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Output(Arc::new(err))
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_message_suggests_root() {
        let err = Error::acquire("/dev/mem", io::Error::from_raw_os_error(libc::EACCES));

        assert!(matches!(err, Error::PermissionDenied { .. }));
        assert_eq!(
            err.to_string(),
            "permission denied opening /dev/mem; are you running as root?"
        );
    }

    #[test]
    fn test_eperm_is_permission_denied() {
        let err = Error::acquire("/dev/mem", io::Error::from_raw_os_error(libc::EPERM));

        assert!(matches!(err, Error::PermissionDenied { .. }));
    }

    #[test]
    fn test_other_failures_are_io() {
        let err = Error::acquire("/dev/mem", io::Error::from_raw_os_error(libc::EBUSY));

        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().starts_with("unexpected error opening /dev/mem: "));
    }

    #[test]
    fn test_invalid_argument_lists_choices() {
        let msg = Error::InvalidArgument("ALT6".into()).to_string();

        assert!(msg.contains("'ALT6'"));
        for name in ["INPUT", "OUTPUT", "ALT0", "ALT1", "ALT2", "ALT3", "ALT4", "ALT5"] {
            assert!(msg.contains(name), "{msg} should mention {name}");
        }
    }
}
