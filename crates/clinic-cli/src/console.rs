//! Line-oriented operator I/O.
//!
//! [`Console`] is generic over its reader and writer so scripted sessions can
//! drive the menu in tests. Every `prompt_until` call re-asks until the
//! validator accepts the line; end of input surfaces as [`EndOfInput`].

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::Result;
use colored::Colorize;

use crate::output;

/// The input stream closed while a prompt was waiting.
#[derive(Debug, thiserror::Error)]
#[error("end of input")]
pub struct EndOfInput;

pub fn is_end_of_input(err: &anyhow::Error) -> bool {
    err.is::<EndOfInput>()
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn heading(&mut self, title: &str) -> Result<()> {
        self.say(format!("\n{}", format!("=== {title} ===").cyan()))
    }

    pub fn success(&mut self, msg: &str) -> Result<()> {
        self.say(output::success_line(msg))
    }

    pub fn error(&mut self, msg: &str) -> Result<()> {
        self.say(output::error_line(msg))
    }

    pub fn notice(&mut self, msg: &str) -> Result<()> {
        self.say(msg.yellow())
    }

    /// Reads one line, trimmed. Fails with [`EndOfInput`] when the stream is exhausted.
    pub fn prompt_line(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{} ", format!("{label}:").yellow())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(EndOfInput.into());
        }
        Ok(line.trim().to_string())
    }

    /// Re-prompts until `parse` accepts the input.
    pub fn prompt_until<T, E>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> std::result::Result<T, E>,
    ) -> Result<T>
    where
        E: Display,
    {
        loop {
            let line = self.prompt_line(label)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(err) => self.error(&err.to_string())?,
            }
        }
    }

    /// Lists `options` as `1. ...` and returns the selected one.
    pub fn choose<T: Copy + Display>(
        &mut self,
        title: &str,
        options: &[T],
        label: &str,
    ) -> Result<T> {
        self.say(format!("\n{}", title.cyan()))?;
        for (i, option) in options.iter().enumerate() {
            self.say(format!("{}. {option}", i + 1))?;
        }
        let index = self.prompt_until(label, |s| {
            clinic_core::validation::parse_menu_index(s, options.len())
        })?;
        Ok(options[index])
    }

    /// `y` or `yes` (any case) confirms; anything else declines.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt_line(&format!("{question} (y/n)"))?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}
