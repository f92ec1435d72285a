pub mod linux;
pub mod registers;
pub mod session;

#[cfg(test)]
pub(crate) mod mock;

use std::error;
use std::fmt::{Display, Error, Formatter};
use std::io;

#[derive(Debug, PartialEq)]
pub enum DeviceError {
    /// Bad user input or a read-only register passed to a write.
    Config(String),
    /// A bus operation failed. `operation` names the step that failed.
    Io {
        operation: &'static str,
        message: String,
    },
}

impl DeviceError {
    pub fn config(message: String) -> DeviceError {
        DeviceError::Config(message)
    }

    pub fn io(operation: &'static str, message: String) -> DeviceError {
        DeviceError::Io { operation, message }
    }

    pub fn is_config(&self) -> bool {
        match self {
            DeviceError::Config(_) => true,
            DeviceError::Io { .. } => false,
        }
    }
}

impl Display for DeviceError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            DeviceError::Config(message) => write!(f, "{}", message),
            DeviceError::Io { operation, message } => {
                write!(f, "I2C {} failed: {}", operation, message)
            }
        }
    }
}

impl error::Error for DeviceError {}

impl From<io::Error> for DeviceError {
    fn from(err: io::Error) -> DeviceError {
        DeviceError::io("I/O", format!("{}", err))
    }
}

impl From<serde_yaml::Error> for DeviceError {
    fn from(err: serde_yaml::Error) -> DeviceError {
        DeviceError::config(format!("Invalid config file: {}", err))
    }
}

/// The raw byte-level capability a `DeviceSession` drives. The slave address
/// is selected when the transport is opened.
pub trait Transport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), DeviceError>;

    fn read(&mut self, count: usize) -> Result<Vec<u8>, DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::DeviceError;

    #[test]
    fn test_io_error_names_operation() {
        let err = DeviceError::io("read registers", String::from("Remote I/O error"));
        assert_eq!(
            format!("{}", err),
            "I2C read registers failed: Remote I/O error"
        );
        assert!(!err.is_config());
    }

    #[test]
    fn test_yaml_error_is_config() {
        let err: DeviceError = serde_yaml::from_str::<u8>("[1, 2]").unwrap_err().into();
        assert!(err.is_config());
    }
}
