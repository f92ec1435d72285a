use serde::Deserialize;

use std::fs;
use std::path::Path;

use crate::device::DeviceError;

pub const DEFAULT_ADDRESS: u8 = 0x62;
pub const DEFAULT_BUS: u8 = 1;

/// Connection settings, optionally loaded from a YAML file. Command-line
/// flags take precedence over anything set here.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    pub address: u8,
    pub bus: u8,
    pub retries: u32,
}

impl Default for DeviceConfig {
    fn default() -> DeviceConfig {
        DeviceConfig {
            address: DEFAULT_ADDRESS,
            bus: DEFAULT_BUS,
            retries: 0,
        }
    }
}

impl DeviceConfig {
    pub fn from_yaml(contents: &str) -> Result<DeviceConfig, DeviceError> {
        if contents.trim().is_empty() {
            return Ok(DeviceConfig::default());
        }

        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<DeviceConfig, DeviceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            DeviceError::config(format!(
                "Could not read config file {}: {}",
                path.display(),
                err
            ))
        })?;

        debug!("Loaded config from {}", path.display());
        DeviceConfig::from_yaml(&contents)
    }
}
