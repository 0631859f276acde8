use std::{collections::VecDeque, sync::mpsc::Receiver};

use atc_recognition_rs::{CommandPipeline, CommandSink, Error};

/// Feeds transcripts through the pipeline one at a time and delivers the resulting commands.
pub struct Session<S: CommandSink> {
    pipeline: CommandPipeline,
    sink: S,
    history: VecDeque<String>,
    history_size: usize,
}

impl<S: CommandSink> Session<S> {
    pub fn new(pipeline: CommandPipeline, sink: S, history_size: usize) -> Self {
        Self {
            pipeline,
            sink,
            history: VecDeque::with_capacity(history_size),
            history_size,
        }
    }

    /// Delivered command for one transcript, if any.
    pub fn handle(&mut self, transcript: &str) -> Result<Option<String>, Error> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Ok(None);
        }
        let Some(command) = self.pipeline.process(transcript) else {
            return Ok(None);
        };
        let command = command.to_string();
        self.sink.deliver(&command)?;

        if self.history_size > 0 {
            if self.history.len() == self.history_size {
                self.history.pop_front();
            }
            self.history.push_back(command.clone());
        }
        Ok(Some(command))
    }

    /// Processes transcripts in arrival order until every sender is gone. Returns the number of
    /// delivered commands.
    pub fn run(&mut self, transcripts: Receiver<String>) -> Result<usize, Error> {
        let mut delivered = 0;
        for transcript in transcripts {
            if self.handle(&transcript)?.is_some() {
                delivered += 1;
            }
        }
        Ok(delivered)
    }

    /// Most recent command last.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, thread};

    use super::*;

    fn new_session(history_size: usize) -> Session<Vec<String>> {
        let pipeline = CommandPipeline::builder().build().unwrap();
        Session::new(pipeline, Vec::new(), history_size)
    }

    #[test]
    fn test_arrival_order() {
        let (tx, rx) = mpsc::channel();
        let sender = thread::spawn(move || {
            for transcript in [
                "SkyWest four five two, descend and maintain five thousand",
                "Delta one two three disregard",
                "Delta one two three turn left heading two seven zero",
                "",
            ] {
                tx.send(transcript.to_owned()).unwrap();
            }
        });

        let mut session = new_session(8);
        let delivered = session.run(rx).unwrap();
        sender.join().unwrap();

        assert_eq!(delivered, 2);
        assert_eq!(
            session.history().collect::<Vec<_>>(),
            [";452 D050", ";123 l270"]
        );
        assert_eq!(session.into_sink(), [";452 D050", ";123 l270"]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = new_session(1);
        session
            .handle("Delta one two three turn left heading two seven zero")
            .unwrap();
        assert_eq!(
            session
                .handle("SkyWest four five two, descend and maintain five thousand")
                .unwrap()
                .as_deref(),
            Some(";452 D050")
        );
        assert_eq!(session.history().collect::<Vec<_>>(), [";452 D050"]);

        let mut session = new_session(0);
        session
            .handle("SkyWest four five two, descend and maintain five thousand")
            .unwrap();
        assert_eq!(session.history().count(), 0);
        assert_eq!(session.into_sink().len(), 1);
    }
}
