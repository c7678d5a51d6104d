//! Line-oriented terminal input.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads learner input one line at a time. `None` means end of input.
pub struct Prompter<R> {
    lines: Lines<R>,
}

impl Prompter<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `prompt` without a newline and read the reply.
    pub async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush().context("failed to flush stdout")?;
        self.next_line().await
    }

    pub async fn next_line(&mut self) -> Result<Option<String>> {
        self.lines
            .next_line()
            .await
            .context("failed to read from stdin")
    }

    /// Collect lines until one that reads `terminator` (after trimming).
    ///
    /// Returns `None` if input ends before the terminator.
    pub async fn read_block(&mut self, terminator: &str) -> Result<Option<String>> {
        let mut block = Vec::new();
        while let Some(line) = self.next_line().await? {
            if line.trim() == terminator {
                return Ok(Some(block.join("\n")));
            }
            block.push(line);
        }
        Ok(None)
    }
}
