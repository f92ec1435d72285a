use clap::Parser;

use std::path::PathBuf;

use crate::config::DeviceConfig;
use crate::device::registers::Led;
use crate::device::session::PendingChange;
use crate::device::DeviceError;

/// Set PCA9553 via i2c. Prints the registers, writes any that were given, and
/// prints them again if anything changed.
#[derive(Parser, Debug)]
#[command(name = "set-pca9553", version)]
pub struct Args {
    /// i2c address of the PCA9553 [default: 0x62]
    #[arg(short = 'a', long = "address", value_name = "0xXX", value_parser = parse_hex_byte)]
    pub address: Option<u8>,

    /// Use /dev/i2c-0 or /dev/i2c-1 (hint: see i2cdetect) [default: 1]
    #[arg(short = 'y', long = "i2cbus", value_name = "0|1",
          value_parser = clap::value_parser!(u8).range(0..=1))]
    pub bus: Option<u8>,

    /// Set LED0 to ON, high-impedance, PWM0, or PWM1
    #[arg(short = 'l', long = "led0", value_name = "ON|Z|PWM0|PWM1")]
    pub led0: Option<String>,

    /// Set LED1 to ON, high-impedance, PWM0, or PWM1
    #[arg(short = 'm', long = "led1", value_name = "ON|Z|PWM0|PWM1")]
    pub led1: Option<String>,

    /// Set LED2 to ON, high-impedance, PWM0, or PWM1
    #[arg(short = 'n', long = "led2", value_name = "ON|Z|PWM0|PWM1")]
    pub led2: Option<String>,

    /// Set LED3 to ON, high-impedance, PWM0, or PWM1
    #[arg(short = 'o', long = "led3", value_name = "ON|Z|PWM0|PWM1")]
    pub led3: Option<String>,

    /// Set PWM0 to 0xXX
    #[arg(short = 'p', long = "pwm0", value_name = "0xXX", value_parser = parse_hex_byte)]
    pub pwm0: Option<u8>,

    /// Set PWM1 to 0xXX
    #[arg(short = 'q', long = "pwm1", value_name = "0xXX", value_parser = parse_hex_byte)]
    pub pwm1: Option<u8>,

    /// Set PSC0 to 0xXX
    #[arg(short = 's', long = "psc0", value_name = "0xXX", value_parser = parse_hex_byte)]
    pub psc0: Option<u8>,

    /// Set PSC1 to 0xXX
    #[arg(short = 't', long = "psc1", value_name = "0xXX", value_parser = parse_hex_byte)]
    pub psc1: Option<u8>,

    /// YAML file with address, bus, and retries defaults
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra attempts for a failed bus transfer [default: 0]
    #[arg(short = 'r', long = "retries", value_name = "N")]
    pub retries: Option<u32>,
}

/// Accepts `62`, `0x62` or `0X62`.
pub fn parse_hex_byte(value: &str) -> Result<u8, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    u8::from_str_radix(digits, 16).map_err(|err| format!("'{}' is not a hex byte: {}", value, err))
}

impl Args {
    /// Merge flags over the config file (if any) over the defaults.
    pub fn resolve_config(&self) -> Result<DeviceConfig, DeviceError> {
        let file = match self.config {
            Some(ref path) => DeviceConfig::load(path)?,
            None => DeviceConfig::default(),
        };

        let config = DeviceConfig {
            address: self.address.unwrap_or(file.address),
            bus: self.bus.unwrap_or(file.bus),
            retries: self.retries.unwrap_or(file.retries),
        };

        if config.bus > 1 {
            return Err(DeviceError::config(format!(
                "Invalid i2c bus {}, expected 0 or 1",
                config.bus
            )));
        }

        Ok(config)
    }

    pub fn to_changes(&self) -> Result<PendingChange, DeviceError> {
        let mut changes = PendingChange::new();
        changes.psc0 = self.psc0;
        changes.pwm0 = self.pwm0;
        changes.psc1 = self.psc1;
        changes.pwm1 = self.pwm1;

        let tokens = [&self.led0, &self.led1, &self.led2, &self.led3];
        for (led, token) in Led::ALL.iter().zip(tokens.iter()) {
            if let Some(token) = token {
                changes.set_led_token(*led, token)?;
            }
        }

        Ok(changes)
    }
}
