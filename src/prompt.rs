// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

// Interactive console input. Everything is generic over the reader and writer so the prompting
// logic can be driven from byte buffers in tests.

use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::errors::SeqforgeError;

fn unsigned_int_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("valid regex"))
}

/// Accepts a positive decimal integer (surrounding whitespace ignored). Signs, decimals, zero and
/// values that overflow `usize` are all `InvalidLength`.
pub fn validate_length(input: &str) -> Result<usize, SeqforgeError> {
    let trimmed = input.trim();
    if !unsigned_int_re().is_match(trimmed) {
        return Err(SeqforgeError::InvalidLength(trimmed.to_string()));
    }
    match trimmed.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SeqforgeError::InvalidLength(trimmed.to_string())),
    }
}

/// Like `validate_length`, but zero is allowed (length-filter bounds).
pub fn validate_bound(input: &str) -> Result<usize, SeqforgeError> {
    let trimmed = input.trim();
    if !unsigned_int_re().is_match(trimmed) {
        return Err(SeqforgeError::Format(format!(
            "Length bound must be a non-negative integer (got '{}')",
            trimmed
        )));
    }
    trimmed
        .parse::<usize>()
        .map_err(|e| SeqforgeError::Format(format!("Length bound '{}': {}", trimmed, e)))
}

pub fn validate_taxid(input: &str) -> Result<String, SeqforgeError> {
    let trimmed = input.trim();
    if unsigned_int_re().is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(SeqforgeError::Format(format!(
            "Taxonomic identifier must be numeric (got '{}')",
            trimmed
        )))
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn say(&mut self, msg: &str) -> Result<(), SeqforgeError> {
        writeln!(self.output, "{}", msg)?;
        Ok(())
    }

    /// Shows `prompt` and returns the next line without its line terminator. Running out of input
    /// is an error, so a closed stdin cannot make a validation loop spin. Bytes that are not UTF-8
    /// become U+FFFD and are left for the validator to reject.
    pub fn ask(&mut self, prompt: &str) -> Result<String, SeqforgeError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut buf: Vec<u8> = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no input for prompt '{}'", prompt.trim()),
            )
            .into());
        }
        let mut line = String::from_utf8_lossy(&buf).into_owned();
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Asks until `validate` accepts the answer, reporting each rejection.
    pub fn ask_validated<T, F>(&mut self, prompt: &str, validate: F) -> Result<T, SeqforgeError>
    where
        F: Fn(&str) -> Result<T, SeqforgeError>,
    {
        loop {
            let answer = self.ask(prompt)?;
            match validate(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!("Rejected input {:?}", answer);
                    self.say(&format!("Error: {}", e))?;
                }
            }
        }
    }

    pub fn ask_length(&mut self, prompt: &str) -> Result<usize, SeqforgeError> {
        self.ask_validated(prompt, validate_length)
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
