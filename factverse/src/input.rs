//! Line input for the shell.
//!
//! Stdin is read on a plain thread and forwarded over a channel, so a read
//! that is still blocked when the shell exits never holds up runtime
//! shutdown.

use std::io::{self, BufRead};
use tokio::sync::mpsc;

pub struct LineInput {
    rx: mpsc::UnboundedReceiver<io::Result<String>>,
}

impl LineInput {
    /// Lines typed on stdin.
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }

    /// A fixed sequence of lines followed by end of input.
    #[cfg(test)]
    pub fn scripted<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        for line in lines {
            let _ = tx.send(Ok(line.into()));
        }
        Self { rx }
    }

    /// Next line, or `None` at end of input.
    pub async fn next_line(&mut self) -> Option<io::Result<String>> {
        self.rx.recv().await
    }
}
