use std::io::{Read, Write};
use std::os::fd::RawFd;

use anyhow::{Context, Result};
use log::debug;

use crate::builtins::Signal;
use crate::interpreter::Interpreter;
use crate::prompt::Prompt;
use crate::readline::{ReadLine, Reader};
use crate::tokenizer::split_line;
use crate::utils::RawMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

/// The read, tokenize, dispatch loop.
///
/// Normal output goes to the reader's output, diagnostics to `err`.
pub struct Shell<R, W, E> {
    reader: Reader<R, W>,
    err: E,
    interpreter: Interpreter,
    prompt: Prompt,
    raw_terminal: Option<RawFd>,
    state: State,
}

impl<R: Read, W: Write, E: Write> Shell<R, W, E> {
    pub fn new (reader: Reader<R, W>, err: E, interpreter: Interpreter, prompt: Prompt) -> Self {
        Self { reader, err, interpreter, prompt, raw_terminal: None, state: State::Running }
    }

    /// Switch `fd` into raw mode while a line is being read.
    pub fn with_raw_terminal (mut self, fd: RawFd) -> Self {
        self.raw_terminal = Some(fd);
        self
    }

    pub fn clear_screen (&mut self) -> Result<()> {
        let out = self.reader.output();
        out.write_all(b"\x1b[H\x1b[2J")?;
        out.flush()?;
        Ok(())
    }

    /// Loops until `exit` or end of input.
    pub fn run (&mut self) -> Result<()> {
        while self.state == State::Running {
            self.step()?;
        }

        Ok(())
    }

    /// One iteration: prompt, read, dispatch.
    ///
    /// End of input stops the loop after the last partial line has run, so a
    /// closed stdin never spins on empty reads.
    pub fn step (&mut self) -> Result<State> {
        let prompt = self.prompt.render();

        let read = {
            let _raw = self.raw_terminal.and_then(RawMode::enable);
            self.reader.read_line(&prompt)
        };

        let (line, eof) = match read.context("failed to read input")? {
            ReadLine::Line(line) => (line, false),
            ReadLine::Eof(line) => (line, true),
        };

        let signal = self.run_line(&line);

        if signal == Signal::Stop || eof {
            debug!("stopping: {}", if eof { "end of input" } else { "exit" });
            self.state = State::Stopped;
        }

        Ok(self.state)
    }

    /// Tokenizes and dispatches a single line.
    pub fn run_line (&mut self, line: &str) -> Signal {
        let argv = split_line(line);
        self.interpreter.dispatch(&argv, self.reader.output(), &mut self.err)
    }
}
