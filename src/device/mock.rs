use std::collections::VecDeque;

use super::{DeviceError, Transport};

/// In-memory transport for exercising the session protocol without hardware.
#[derive(Default)]
pub struct MockBus {
    pub writes: Vec<Vec<u8>>,
    pub read_counts: Vec<usize>,
    responses: VecDeque<Vec<u8>>,
    pub fail_writes: usize,
    pub fail_reads: usize,
}

impl MockBus {
    pub fn new() -> MockBus {
        MockBus::default()
    }

    pub fn with_responses(responses: &[&[u8]]) -> MockBus {
        let mut bus = MockBus::new();
        for response in responses {
            bus.push_response(response);
        }
        bus
    }

    /// Script a full register read: the 6 byte autoincrement block followed by the input byte.
    pub fn push_bank(&mut self, block: [u8; 6], input: u8) {
        self.push_response(&block);
        self.push_response(&[input]);
    }

    pub fn push_response(&mut self, response: &[u8]) {
        self.responses.push_back(response.to_vec());
    }

    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }
}

impl Transport for MockBus {
    fn write(&mut self, bytes: &[u8]) -> Result<(), DeviceError> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(DeviceError::io("write", String::from("injected failure")));
        }

        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn read(&mut self, count: usize) -> Result<Vec<u8>, DeviceError> {
        if self.fail_reads > 0 {
            self.fail_reads -= 1;
            return Err(DeviceError::io("read", String::from("injected failure")));
        }

        self.read_counts.push(count);
        self.responses
            .pop_front()
            .map(|mut response| {
                response.truncate(count);
                response
            })
            .ok_or_else(|| DeviceError::io("read", String::from("no scripted response")))
    }
}
