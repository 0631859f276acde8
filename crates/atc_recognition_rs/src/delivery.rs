//! Handing finished commands to the simulator client

use std::io::Write;

use crate::Error;

pub trait CommandSink {
    fn deliver(&mut self, command: &str) -> Result<(), Error>;
}

/// Writes one command per line and flushes after each, so a consumer on the other end of a
/// pipe sees commands as they are produced.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for WriterSink<W> {
    fn deliver(&mut self, command: &str) -> Result<(), Error> {
        let command = command.trim();
        if command.is_empty() {
            log::debug!("Skipping empty command");
            return Ok(());
        }
        writeln!(self.writer, "{command}").map_err(|err| Error::Delivery(err.to_string()))?;
        self.writer
            .flush()
            .map_err(|err| Error::Delivery(err.to_string()))
    }
}

/// Collects commands in memory.
impl CommandSink for Vec<String> {
    fn deliver(&mut self, command: &str) -> Result<(), Error> {
        let command = command.trim();
        if !command.is_empty() {
            self.push(command.to_owned());
        }
        Ok(())
    }
}
