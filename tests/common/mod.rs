//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use embedded_hal::delay::DelayNs;
use ili9163c::command::Command;
use ili9163c::interface::RESET_HOLD_MS;
use ili9163c::{DisplayError, DisplayInterface};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Reset,
    Command(Command),
    Data(Vec<u8>),
}

/// Records every transfer instead of driving a bus.
#[derive(Default)]
pub struct Recorder {
    pub ops: Vec<Op>,
    pub reset_wired: bool,
}

impl Recorder {
    pub fn with_reset() -> Self {
        Recorder {
            ops: Vec::new(),
            reset_wired: true,
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn commands(&self) -> Vec<Command> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Command(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// Data bytes following the `nth` occurrence of `cmd`, up to the next command.
    pub fn data_of(&self, cmd: Command, nth: usize) -> Vec<u8> {
        let start = self
            .ops
            .iter()
            .enumerate()
            .filter(|(_, op)| **op == Op::Command(cmd))
            .nth(nth)
            .map(|(i, _)| i + 1)
            .expect("command not sent");
        self.ops[start..]
            .iter()
            .take_while(|op| !matches!(op, Op::Command(_)))
            .flat_map(|op| match op {
                Op::Data(d) => d.clone(),
                _ => Vec::new(),
            })
            .collect()
    }
}

impl DisplayInterface for Recorder {
    fn send_command(&mut self, command: Command) -> Result<(), DisplayError> {
        self.ops.push(Op::Command(command));
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.ops.push(Op::Data(data.to_vec()));
        Ok(())
    }

    fn send_words_from_iter<I>(&mut self, iter: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        let bytes: Vec<u8> = iter.into_iter().flat_map(u16::to_be_bytes).collect();
        let n = bytes.len() / 2;
        self.ops.push(Op::Data(bytes));
        Ok(n)
    }

    fn reset<D>(&mut self, delay: &mut D) -> Result<bool, DisplayError>
    where
        D: DelayNs,
    {
        if self.reset_wired {
            self.ops.push(Op::Reset);
            for _ in 0..3 {
                delay.delay_ms(RESET_HOLD_MS);
            }
        }
        Ok(self.reset_wired)
    }
}

/// Keeps the millisecond delays requested, in order.
#[derive(Default)]
pub struct RecordingDelay {
    pub ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}

/// `[hi, lo]` pairs for a sequence of words.
pub fn words(ws: &[u16]) -> Vec<u8> {
    ws.iter().flat_map(|w| w.to_be_bytes()).collect()
}
