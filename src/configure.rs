use std::io::Write;

use crate::device::session::{ChangeOutcome, DeviceSession, PendingChange};
use crate::device::{DeviceError, Transport};

/// Read the device, apply `changes`, and re-read if anything was written,
/// reporting each step to `out`.
pub fn configure<T, W>(
    session: &mut DeviceSession<T>,
    changes: &PendingChange,
    out: &mut W,
) -> Result<ChangeOutcome, DeviceError>
where
    T: Transport,
    W: Write,
{
    writeln!(out, "Current Register Status:")?;
    let current = session.read_all()?;
    write!(out, "{}", current)?;

    let outcome = session.apply_changes_with(&current, changes, |register, value| {
        if let Err(err) = writeln!(out, "Writing {} value of 0x{:02X}", register, value) {
            warn!("Could not report write of {}: {}", register, err);
        }
    })?;

    if outcome.writes_performed() > 0 {
        info!(
            "{} register(s) written at 0x{:02x}",
            outcome.writes_performed(),
            session.address()
        );
        writeln!(out, "New Register Status:")?;
        let updated = session.read_all()?;
        write!(out, "{}", updated)?;
    } else {
        writeln!(out, "Not updating any registers.")?;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::configure;
    use crate::device::mock::MockBus;
    use crate::device::registers::{Led, LedMode};
    use crate::device::session::{DeviceSession, PendingChange};

    fn run(bus: MockBus, changes: &PendingChange) -> (usize, String, MockBus) {
        let mut session = DeviceSession::new(bus, 0x62);
        let mut out = Vec::new();
        let outcome = configure(&mut session, changes, &mut out).unwrap();
        (
            outcome.writes_performed(),
            String::from_utf8(out).unwrap(),
            session.into_inner(),
        )
    }

    #[test]
    fn test_report_without_changes() {
        let mut bus = MockBus::new();
        bus.push_bank([0x00, 0x10, 0x20, 0x30, 0x40, 0x55], 0x01);

        let (writes, report, bus) = run(bus, &PendingChange::new());

        assert_eq!(writes, 0);
        assert_eq!(
            report,
            "Current Register Status:\n\
             \x20 INPUT  0x01 (read-only)\n\
             \x20 PSC0   0x10 (use -s to set)\n\
             \x20 PWM0   0x20 (use -p to set)\n\
             \x20 PSC1   0x30 (use -t to set)\n\
             \x20 PWM1   0x40 (use -q to set)\n\
             \x20 LS0    0x55\n\
             \x20   LED0    Z (use -l to set)\n\
             \x20   LED1    Z (use -m to set)\n\
             \x20   LED2    Z (use -n to set)\n\
             \x20   LED3    Z (use -o to set)\n\
             Not updating any registers.\n"
        );
        assert_eq!(bus.writes, vec![vec![0x10], vec![0x00]]);
    }

    #[test]
    fn test_report_with_changes_rereads() {
        let mut bus = MockBus::new();
        bus.push_bank([0x00, 0x10, 0x20, 0x30, 0x40, 0x55], 0x01);
        bus.push_bank([0x01, 0x10, 0x20, 0x30, 0x80, 0x75], 0x01);

        let mut changes = PendingChange::new();
        changes.pwm1 = Some(0x80);
        changes.set_led(Led::Led2, LedMode::Pwm1);

        let (writes, report, bus) = run(bus, &changes);

        assert_eq!(writes, 2);
        assert!(report.contains("Writing PWM1 value of 0x80\nWriting LS0 value of 0x75\nNew Register Status:\n"));
        assert!(report.contains("  PWM1   0x80 (use -q to set)\n"));
        assert!(report.contains("    LED2 PWM1 (use -n to set)\n"));
        assert!(!report.contains("Not updating"));
        assert_eq!(
            bus.writes,
            vec![
                vec![0x10],
                vec![0x00],
                vec![0x04, 0x80],
                vec![0x05, 0x75],
                vec![0x10],
                vec![0x00],
            ]
        );
        assert_eq!(bus.pending_responses(), 0);
    }

    #[test]
    fn test_read_failure_aborts_before_writes() {
        let mut bus = MockBus::new();
        bus.fail_reads = 1;
        let mut changes = PendingChange::new();
        changes.psc0 = Some(0x20);

        let mut session = DeviceSession::new(bus, 0x62);
        let mut out = Vec::new();

        assert!(configure(&mut session, &changes, &mut out).is_err());
        assert_eq!(session.into_inner().writes, vec![vec![0x10]]);
    }
}
