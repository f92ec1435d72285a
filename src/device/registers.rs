//! Register layout of the PCA9553 and the packing of the four LED modes into
//! the shared LS0 byte.

use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

/// Set in a command byte to walk the register file on consecutive reads.
pub const AUTO_INCREMENT: u8 = 0x10;

const LED_FIELD_MASK: u8 = 0b11;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    Input,
    Psc0,
    Pwm0,
    Psc1,
    Pwm1,
    Ls0,
}

impl Register {
    /// The command byte addressing this register with autoincrement off.
    pub fn command(self) -> u8 {
        match self {
            Register::Input => 0x00,
            Register::Psc0 => 0x01,
            Register::Pwm0 => 0x02,
            Register::Psc1 => 0x03,
            Register::Pwm1 => 0x04,
            Register::Ls0 => 0x05,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::Input => "INPUT",
            Register::Psc0 => "PSC0",
            Register::Pwm0 => "PWM0",
            Register::Psc1 => "PSC1",
            Register::Pwm1 => "PWM1",
            Register::Ls0 => "LS0",
        }
    }

    pub fn is_writable(self) -> bool {
        self != Register::Input
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.name())
    }
}

/// One of the four LED outputs. Only these four exist, so an out-of-range
/// slot cannot be expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Led {
    Led0,
    Led1,
    Led2,
    Led3,
}

impl Led {
    pub const ALL: [Led; 4] = [Led::Led0, Led::Led1, Led::Led2, Led::Led3];

    pub fn index(self) -> u8 {
        match self {
            Led::Led0 => 0,
            Led::Led1 => 1,
            Led::Led2 => 2,
            Led::Led3 => 3,
        }
    }

    fn shift(self) -> u8 {
        self.index() * 2
    }
}

impl Display for Led {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "LED{}", self.index())
    }
}

/// Output state of a single LED, with its two bit code in LS0:
///
/// | mode             | code |
/// |------------------|------|
/// | `On`             | 00   |
/// | `HighImpedance`  | 01   |
/// | `Pwm0`           | 10   |
/// | `Pwm1`           | 11   |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedMode {
    /// Output driven low, LED lit.
    On,
    /// Output released, LED off. Power-on default.
    HighImpedance,
    /// Blinks at the PSC0/PWM0 rate.
    Pwm0,
    /// Blinks at the PSC1/PWM1 rate.
    Pwm1,
}

impl LedMode {
    pub const ALL: [LedMode; 4] = [
        LedMode::On,
        LedMode::HighImpedance,
        LedMode::Pwm0,
        LedMode::Pwm1,
    ];

    pub fn code(self) -> u8 {
        match self {
            LedMode::On => 0b00,
            LedMode::HighImpedance => 0b01,
            LedMode::Pwm0 => 0b10,
            LedMode::Pwm1 => 0b11,
        }
    }

    /// Only the low two bits of `code` are considered.
    pub fn from_code(code: u8) -> LedMode {
        match code & LED_FIELD_MASK {
            0b00 => LedMode::On,
            0b01 => LedMode::HighImpedance,
            0b10 => LedMode::Pwm0,
            _ => LedMode::Pwm1,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct ParseLedModeError(pub String);

impl Display for ParseLedModeError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(
            f,
            "Unknown LED mode {:?}, expected one of ON, Z, PWM0, PWM1",
            self.0
        )
    }
}

impl FromStr for LedMode {
    type Err = ParseLedModeError;

    fn from_str(token: &str) -> Result<LedMode, ParseLedModeError> {
        parse_led_mode_token(token)
    }
}

impl Display for LedMode {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        // Pass through the formatter so width/alignment flags apply
        f.pad(format_led_mode(*self))
    }
}

pub fn decode_led_mode(led_select: u8, led: Led) -> LedMode {
    LedMode::from_code(led_select >> led.shift())
}

/// Replace the field for `led` and leave the other three untouched.
pub fn encode_led_select(old_led_select: u8, led: Led, mode: LedMode) -> u8 {
    (old_led_select & !(LED_FIELD_MASK << led.shift())) | (mode.code() << led.shift())
}

/// Tokens are case-sensitive.
pub fn parse_led_mode_token(token: &str) -> Result<LedMode, ParseLedModeError> {
    match token {
        "ON" => Ok(LedMode::On),
        "Z" => Ok(LedMode::HighImpedance),
        "PWM0" => Ok(LedMode::Pwm0),
        "PWM1" => Ok(LedMode::Pwm1),
        other => Err(ParseLedModeError(other.to_string())),
    }
}

pub fn format_led_mode(mode: LedMode) -> &'static str {
    match mode {
        LedMode::On => "ON",
        LedMode::HighImpedance => "Z",
        LedMode::Pwm0 => "PWM0",
        LedMode::Pwm1 => "PWM1",
    }
}

/// Snapshot of the device's register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterBank {
    pub input: u8,
    pub psc0: u8,
    pub pwm0: u8,
    pub psc1: u8,
    pub pwm1: u8,
    pub led_select: u8,
}

impl RegisterBank {
    pub fn get(&self, register: Register) -> u8 {
        match register {
            Register::Input => self.input,
            Register::Psc0 => self.psc0,
            Register::Pwm0 => self.pwm0,
            Register::Psc1 => self.psc1,
            Register::Pwm1 => self.pwm1,
            Register::Ls0 => self.led_select,
        }
    }

    pub fn led_mode(&self, led: Led) -> LedMode {
        decode_led_mode(self.led_select, led)
    }
}

fn register_hint(register: Register) -> &'static str {
    match register {
        Register::Input => " (read-only)",
        Register::Psc0 => " (use -s to set)",
        Register::Pwm0 => " (use -p to set)",
        Register::Psc1 => " (use -t to set)",
        Register::Pwm1 => " (use -q to set)",
        Register::Ls0 => "",
    }
}

fn led_flag(led: Led) -> char {
    match led {
        Led::Led0 => 'l',
        Led::Led1 => 'm',
        Led::Led2 => 'n',
        Led::Led3 => 'o',
    }
}

impl Display for RegisterBank {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        const REPORT_ORDER: [Register; 6] = [
            Register::Input,
            Register::Psc0,
            Register::Pwm0,
            Register::Psc1,
            Register::Pwm1,
            Register::Ls0,
        ];

        for register in REPORT_ORDER.iter() {
            writeln!(
                f,
                "  {:<6} 0x{:02X}{}",
                register.name(),
                self.get(*register),
                register_hint(*register)
            )?;
        }

        for led in Led::ALL.iter() {
            writeln!(
                f,
                "    {} {:>4} (use -{} to set)",
                led,
                self.led_mode(*led),
                led_flag(*led)
            )?;
        }

        Ok(())
    }
}
