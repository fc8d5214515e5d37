use std::io::{self, Read, Write};

use bytes::BufMut;

use crate::trie::{longest_common_prefix, Trie};
use crate::utils::allocation_failure;

const BLOCK: usize = 1024;

const BELL: &[u8] = b"\x07";
const ERASE: &[u8] = b"\x08 \x08";

/// One acquired line, without its terminating newline.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadLine {
    Line(String),
    /// Input ended. Holds whatever followed the last newline, possibly nothing.
    Eof(String),
}

/// Unbuffered reader over file descriptor 0.
///
/// Bytes after the current line stay in the kernel for the next read or for a
/// child process that inherits stdin.
pub struct Stdin;

impl Read for Stdin {
    fn read (&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };

        if n < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(n as usize)
    }
}

/// Reads lines one byte at a time.
///
/// In interactive mode the terminal is expected to be in raw mode: the reader
/// echoes input itself, handles backspace and completes command names on TAB.
pub struct Reader<R, W> {
    input: R,
    output: W,
    interactive: bool,
    command_tree: Trie,
}

impl<R: Read, W: Write> Reader<R, W> {
    pub fn new (input: R, output: W, interactive: bool) -> Self {
        Self { input, output, interactive, command_tree: Trie::new() }
    }

    pub fn update_trie <I, T>(&mut self, words: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>
    {
        self.command_tree.extend(words);
    }

    pub fn output (&mut self) -> &mut W {
        &mut self.output
    }

    /// Shows `prompt` and blocks until a full line or end of input.
    pub fn read_line (&mut self, prompt: &str) -> io::Result<ReadLine> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut input = Vec::<u8>::new();
        let mut bell = false;

        loop {
            let Some(byte) = self.next_byte()? else {
                return Ok(ReadLine::Eof(Self::finish(input)));
            };

            if !self.interactive {
                if byte == b'\n' {
                    return Ok(ReadLine::Line(Self::finish(input)));
                }
                push(&mut input, &[byte]);
                continue;
            }

            let tab = byte == b'\t';

            match byte {
                b'\n' | b'\r' => {
                    self.echo(b"\n")?;
                    return Ok(ReadLine::Line(Self::finish(input)));
                }
                0x04 if input.is_empty() => {
                    self.echo(b"\n")?;
                    return Ok(ReadLine::Eof(String::new()));
                }
                0x04 => self.echo(BELL)?,
                0x7F | 0x08 => {
                    if pop_char(&mut input) {
                        self.echo(ERASE)?;
                    }
                }
                b'\t' => self.complete(prompt, &mut input, bell)?,
                byte => {
                    push(&mut input, &[byte]);
                    self.echo(&[byte])?;
                }
            }

            // A second TAB in a row lists the candidates.
            bell = tab && !bell;
        }
    }

    fn next_byte (&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];

        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    fn complete (&mut self, prompt: &str, input: &mut Vec<u8>, list: bool) -> io::Result<()> {
        let word = String::from_utf8_lossy(input).to_string();
        if word.contains(' ') {
            return self.echo(BELL);
        }

        let completions = self.command_tree.complete(&word);

        match completions.as_slice() {
            [] => self.echo(BELL),
            [only] => {
                let rest = format!("{} ", &only[word.len()..]);
                push(input, rest.as_bytes());
                self.echo(rest.as_bytes())
            }
            many if list => {
                writeln!(self.output)?;
                writeln!(self.output, "{}", many.join("  "))?;
                write!(self.output, "{prompt}{word}")?;
                self.output.flush()
            }
            many => {
                let lcp = longest_common_prefix(many);

                if lcp.len() > word.len() {
                    let rest = &lcp[word.len()..];
                    push(input, rest.as_bytes());
                    self.echo(rest.as_bytes())
                } else {
                    self.echo(BELL)
                }
            }
        }
    }

    fn echo (&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.write_all(bytes)?;
        self.output.flush()
    }

    fn finish (input: Vec<u8>) -> String {
        String::from_utf8_lossy(&input).into_owned()
    }
}

/// Appends to the line buffer, growing it a block at a time.
fn push (input: &mut Vec<u8>, bytes: &[u8]) {
    if input.capacity() - input.len() < bytes.len() {
        let additional = bytes.len().max(BLOCK);
        if input.try_reserve_exact(additional).is_err() {
            allocation_failure();
        }
    }

    input.put_slice(bytes);
}

/// Removes the last UTF-8 character. Returns false when the buffer was empty.
fn pop_char (input: &mut Vec<u8>) -> bool {
    let Some(mut byte) = input.pop() else {
        return false;
    };

    while byte & 0xC0 == 0x80 {
        match input.pop() {
            Some(prev) => byte = prev,
            None => break,
        }
    }

    true
}
