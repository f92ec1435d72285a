use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};

use std::path::{Path, PathBuf};

use super::{DeviceError, Transport};

impl From<LinuxI2CError> for DeviceError {
    fn from(err: LinuxI2CError) -> DeviceError {
        DeviceError::io("transfer", format!("{}", err))
    }
}

pub fn bus_path(bus: u8) -> Result<PathBuf, DeviceError> {
    match bus {
        0 | 1 => Ok(PathBuf::from(format!("/dev/i2c-{}", bus))),
        invalid => Err(DeviceError::config(format!(
            "Invalid i2c bus {}, expected 0 or 1",
            invalid
        ))),
    }
}

/// An open `/dev/i2c-N` handle with the slave address selected. The handle
/// closes when the inner `LinuxI2CDevice` is dropped along with this.
pub struct LinuxBus {
    dev: LinuxI2CDevice,
    path: PathBuf,
}

impl LinuxBus {
    pub fn open<P: AsRef<Path>>(path: P, address: u8) -> Result<LinuxBus, DeviceError> {
        let path = path.as_ref().to_path_buf();
        debug!("Opening {} for 0x{:02x}", path.display(), address);

        let dev = LinuxI2CDevice::new(&path, u16::from(address)).map_err(|err| {
            DeviceError::io("open", format!("{}: {}", path.display(), err))
        })?;

        Ok(LinuxBus { dev, path })
    }
}

pub fn open_bus(bus: u8, address: u8) -> Result<LinuxBus, DeviceError> {
    LinuxBus::open(bus_path(bus)?, address)
}

impl Transport for LinuxBus {
    fn write(&mut self, bytes: &[u8]) -> Result<(), DeviceError> {
        I2CDevice::write(&mut self.dev, bytes)
            .map_err(|err| DeviceError::io("write", format!("{}", err)))
    }

    fn read(&mut self, count: usize) -> Result<Vec<u8>, DeviceError> {
        let mut data = vec![0u8; count];
        I2CDevice::read(&mut self.dev, &mut data)?;
        Ok(data)
    }
}

impl Drop for LinuxBus {
    fn drop(&mut self) {
        debug!("Closing {}", self.path.display());
    }
}
