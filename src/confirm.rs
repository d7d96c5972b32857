//! Per-dataset confirmation used by the recursive delete.

use std::io::{self, Read, Write};

use tokio::task;

/// Decides whether a single dataset gets deleted.
pub trait Confirm {
    /// Ask about the dataset at `path`, writing any prompt or notice to `out`.
    ///
    /// Only failures to write to `out` are returned as errors; a failed answer
    /// counts as "no".
    async fn confirm(&mut self, path: &str, out: &mut dyn Write) -> io::Result<bool>;
}

/// Prompts `Delete dataset <path>? ` and reads a single character answer.
///
/// `y` or `Y` proceeds, anything else skips. Line terminators left over from a
/// previous answer are ignored. Reads run on the blocking thread pool.
pub struct ReaderConfirm<R> {
    input: Option<R>,
}

impl<R: Read + Send + 'static> ReaderConfirm<R> {
    pub fn new(input: R) -> Self {
        Self { input: Some(input) }
    }

    async fn next_answer(&mut self) -> io::Result<char> {
        let mut input = self
            .input
            .take()
            .ok_or_else(|| io::Error::other("confirmation input is closed"))?;
        let (input, answer) = task::spawn_blocking(move || {
            let answer = read_answer(&mut input);
            (input, answer)
        })
        .await
        .map_err(io::Error::other)?;
        self.input = Some(input);
        answer
    }
}

fn read_byte(input: &mut impl Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "no answer on input",
                ));
            }
            Ok(_) => return Ok(buf[0]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

fn read_answer(input: &mut impl Read) -> io::Result<char> {
    let mut first = read_byte(input)?;
    while first == b'\n' || first == b'\r' {
        first = read_byte(input)?;
    }

    let width = match first {
        0x00..=0x7f => return Ok(first as char),
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return Ok(char::REPLACEMENT_CHARACTER),
    };
    let mut bytes = vec![first];
    for _ in 1..width {
        bytes.push(read_byte(input)?);
    }
    Ok(std::str::from_utf8(&bytes)
        .ok()
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER))
}

impl<R: Read + Send + 'static> Confirm for ReaderConfirm<R> {
    async fn confirm(&mut self, path: &str, out: &mut dyn Write) -> io::Result<bool> {
        write!(out, "Delete dataset {path}? ")?;
        out.flush()?;

        match self.next_answer().await {
            Ok('y' | 'Y') => Ok(true),
            Ok(answer) => {
                log::debug!("confirm path={} answer={:?}", path, answer);
                writeln!(out, "... skipped")?;
                Ok(false)
            }
            Err(err) => {
                writeln!(out, "{err}")?;
                writeln!(out, "... skipped")?;
                Ok(false)
            }
        }
    }
}

/// "Yes to all": confirms every dataset without asking.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    async fn confirm(&mut self, path: &str, _out: &mut dyn Write) -> io::Result<bool> {
        log::debug!("confirm path={} answer=assumed", path);
        Ok(true)
    }
}
