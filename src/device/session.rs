use super::registers::*;
use super::{DeviceError, Transport};

/// Bytes returned by the autoincrement read. The first one echoes INPUT and is ignored.
const BLOCK_LEN: usize = 6;

/// Requested register values. Anything left as `None` is not touched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PendingChange {
    pub psc0: Option<u8>,
    pub pwm0: Option<u8>,
    pub psc1: Option<u8>,
    pub pwm1: Option<u8>,
    leds: [Option<LedMode>; 4],
}

impl PendingChange {
    pub fn new() -> PendingChange {
        PendingChange::default()
    }

    pub fn set_led(&mut self, led: Led, mode: LedMode) {
        self.leds[led.index() as usize] = Some(mode);
    }

    /// Parse a user supplied mode token for `led`. The error names the slot.
    pub fn set_led_token(&mut self, led: Led, token: &str) -> Result<(), DeviceError> {
        let mode = parse_led_mode_token(token).map_err(|err| {
            DeviceError::config(format!("Invalid led string for {}: {}", led, err))
        })?;
        self.set_led(led, mode);
        Ok(())
    }

    pub fn led(&self, led: Led) -> Option<LedMode> {
        self.leds[led.index() as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.register_writes().is_empty() && self.leds.iter().all(Option::is_none)
    }

    /// Prescaler and duty cycle writes, in the order they go on the bus.
    pub fn register_writes(&self) -> Vec<(Register, u8)> {
        vec![
            (Register::Psc0, self.psc0),
            (Register::Psc1, self.psc1),
            (Register::Pwm0, self.pwm0),
            (Register::Pwm1, self.pwm1),
        ]
        .into_iter()
        .filter_map(|(register, value)| value.map(|value| (register, value)))
        .collect()
    }

    pub fn fold_led_select(&self, current: u8) -> u8 {
        Led::ALL.iter().fold(current, |value, led| match self.led(*led) {
            Some(mode) => encode_led_select(value, *led, mode),
            None => value,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChangeOutcome {
    pub led_select: u8,
    pub writes: Vec<(Register, u8)>,
}

impl ChangeOutcome {
    pub fn writes_performed(&self) -> usize {
        self.writes.len()
    }
}

/// Exclusive owner of the bus handle for one device. Dropping the session
/// closes the handle.
pub struct DeviceSession<T: Transport> {
    transport: T,
    address: u8,
    retries: u32,
    last_read: Option<RegisterBank>,
}

impl<T: Transport> DeviceSession<T> {
    pub fn new(transport: T, address: u8) -> DeviceSession<T> {
        DeviceSession {
            transport,
            address,
            retries: 0,
            last_read: None,
        }
    }

    /// Allow up to `retries` extra attempts of a failed read or write.
    pub fn with_retries(mut self, retries: u32) -> DeviceSession<T> {
        self.retries = retries;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn last_read(&self) -> Option<&RegisterBank> {
        self.last_read.as_ref()
    }

    pub fn read_all(&mut self) -> Result<RegisterBank, DeviceError> {
        let address = self.address;
        let bank = self.retrying("register read", |transport| read_bank(transport, address))?;
        self.last_read = Some(bank);
        Ok(bank)
    }

    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), DeviceError> {
        if !register.is_writable() {
            return Err(DeviceError::config(format!("{} is read-only", register)));
        }

        let frame = [register.command(), value];
        debug!(
            "Writing 0x{:02x} to {} at 0x{:02x}",
            value, register, self.address
        );
        self.retrying("register write", |transport| {
            transport
                .write(&frame)
                .map_err(|err| with_operation(err, "write register"))
        })
    }

    pub fn apply_changes(
        &mut self,
        current: &RegisterBank,
        changes: &PendingChange,
    ) -> Result<ChangeOutcome, DeviceError> {
        self.apply_changes_with(current, changes, |_, _| {})
    }

    /// As `apply_changes`, calling `on_write` before each register write.
    pub fn apply_changes_with<F>(
        &mut self,
        current: &RegisterBank,
        changes: &PendingChange,
        mut on_write: F,
    ) -> Result<ChangeOutcome, DeviceError>
    where
        F: FnMut(Register, u8),
    {
        let mut writes = changes.register_writes();

        let led_select = changes.fold_led_select(current.led_select);
        if led_select != current.led_select {
            writes.push((Register::Ls0, led_select));
        } else {
            debug!("LS0 unchanged at 0x{:02x}", led_select);
        }

        for (register, value) in &writes {
            on_write(*register, *value);
            self.write_register(*register, *value)?;
        }

        Ok(ChangeOutcome { led_select, writes })
    }

    fn retrying<R, F>(&mut self, what: &str, mut operation: F) -> Result<R, DeviceError>
    where
        F: FnMut(&mut T) -> Result<R, DeviceError>,
    {
        let mut attempt = 0;
        loop {
            match operation(&mut self.transport) {
                Err(ref err) if !err.is_config() && attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        "{} at 0x{:02x} failed ({}), retry {} of {}",
                        what, self.address, err, attempt, self.retries
                    );
                }
                result => return result,
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> T {
        self.transport
    }
}

fn with_operation(err: DeviceError, operation: &'static str) -> DeviceError {
    match err {
        DeviceError::Io { message, .. } => DeviceError::io(operation, message),
        config => config,
    }
}

fn read_exact<T: Transport>(
    transport: &mut T,
    count: usize,
    operation: &'static str,
) -> Result<Vec<u8>, DeviceError> {
    let data = transport
        .read(count)
        .map_err(|err| with_operation(err, operation))?;

    if data.len() != count {
        return Err(DeviceError::io(
            operation,
            format!("short read, {} of {} bytes", data.len(), count),
        ));
    }

    Ok(data)
}

fn read_bank<T: Transport>(transport: &mut T, address: u8) -> Result<RegisterBank, DeviceError> {
    transport
        .write(&[AUTO_INCREMENT | Register::Input.command()])
        .map_err(|err| with_operation(err, "write command byte"))?;
    let block = read_exact(transport, BLOCK_LEN, "read registers")?;
    debug!("Read block {:02x?} from 0x{:02x}", block, address);

    transport
        .write(&[Register::Input.command()])
        .map_err(|err| with_operation(err, "write command byte"))?;
    let input = read_exact(transport, 1, "read input")?;
    debug!("Read input 0x{:02x} from 0x{:02x}", input[0], address);

    Ok(RegisterBank {
        input: input[0],
        psc0: block[1],
        pwm0: block[2],
        psc1: block[3],
        pwm1: block[4],
        led_select: block[5],
    })
}
