//! Scripted stand-in for an instrument, used by the unit tests.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;

use super::channel::ByteChannel;

const NO_ERROR: &str = "0,No error";

/// Records every byte written and answers queries from per-command queues.
///
/// `:SYST:ERR?` answers `0,No error` once its queue is empty. Any other query
/// without a scripted reply leaves nothing to read.
#[derive(Default)]
pub struct FakeScope {
    written: Vec<u8>,
    commands: Vec<String>,
    replies: HashMap<String, VecDeque<Vec<u8>>>,
    pending: VecDeque<u8>,
    fail_writes: bool,
    closes: Rc<Cell<usize>>,
}

impl FakeScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&mut self, query: &str, text: &str) -> &mut Self {
        let mut bytes = text.as_bytes().to_vec();
        if !text.ends_with('\n') {
            bytes.push(b'\n');
        }
        self.reply_bytes(query, bytes)
    }

    pub fn reply_bytes(&mut self, query: &str, bytes: Vec<u8>) -> &mut Self {
        self.replies
            .entry(query.to_string())
            .or_default()
            .push_back(bytes);
        self
    }

    pub fn fail_writes(&mut self) -> &mut Self {
        self.fail_writes = true;
        self
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Every command line received, in order, without terminators.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Commands received, leaving out the `:SYST:ERR?` checks.
    pub fn commands_without_error_checks(&self) -> Vec<&str> {
        self.commands
            .iter()
            .map(String::as_str)
            .filter(|c| *c != ":SYST:ERR?")
            .collect()
    }

    /// Shared counter of `close` calls, readable after the channel is dropped.
    pub fn close_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.closes)
    }
}

impl ByteChannel for FakeScope {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }

        self.written.extend_from_slice(bytes);
        let text = String::from_utf8_lossy(bytes).into_owned();

        for line in text.split('\n').filter(|l| !l.is_empty()) {
            self.commands.push(line.to_string());

            if !line.ends_with('?') {
                continue;
            }
            let scripted = self.replies.get_mut(line).and_then(VecDeque::pop_front);
            match scripted {
                Some(reply) => self.pending.extend(reply),
                None if line == ":SYST:ERR?" => {
                    self.pending.extend(NO_ERROR.bytes().chain(std::iter::once(b'\n')))
                }
                None => {}
            }
        }
        Ok(())
    }

    fn receive(&mut self, max_bytes: usize) -> io::Result<Vec<u8>> {
        let n = max_bytes.min(self.pending.len());
        Ok(self.pending.drain(..n).collect())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closes.set(self.closes.get() + 1);
        Ok(())
    }
}
