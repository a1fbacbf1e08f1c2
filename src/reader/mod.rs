//! Reads line-structured text token by token.

use std::fmt::Display;
use std::fs::File;
use std::io::{ self, BufRead, BufReader };
use std::mem;
use std::path::Path;
use std::str::FromStr;

use regex::Regex;

use crate::errors::{ ReadError, ReadResult };
use crate::util::LocationTracker;

mod token_grammar;

use self::token_grammar::grammar;

/// How a line is split into tokens.
#[derive(Debug, Clone, Default)]
pub enum Delimiter {
    /// Runs of whitespace separate tokens. Leading and trailing whitespace is ignored.
    #[default]
    Whitespace,
    /// Every match of the pattern separates tokens. Empty fields between two
    /// delimiters are kept as empty tokens; a delimiter at the start or end of
    /// the line does not produce one.
    Pattern(Regex),
}

impl Delimiter {
    /// Compiles `pattern` into a [`Delimiter::Pattern`].
    ///
    /// A pattern that does not compile is reported as [`ReadError::InvalidArgument`].
    pub fn pattern(pattern: &str) -> ReadResult<Delimiter> {
        Regex::new(pattern)
            .map(Delimiter::Pattern)
            .map_err(|e| ReadError::InvalidArgument(format!("invalid delimiter pattern '{}': {}", pattern, e)))
    }

    fn split(&self, line: &str) -> ReadResult<Vec<String>> {
        match self {
            Delimiter::Whitespace => match grammar::tokens(line) {
                Ok(tokens) => Ok(tokens.into_iter().map(str::to_string).collect()),
                Err(e) => Err(ReadError::custom(
                    format!("Couldn't split line into tokens.\n\tString: '{}'\n\tError: {}", line, e)
                )),
            },
            Delimiter::Pattern(re) => {
                let mut tokens: Vec<String> = re.split(line).map(str::to_string).collect();
                // only a delimiter at either end of the line produces no token
                if tokens.last().is_some_and(String::is_empty) {
                    tokens.pop();
                }
                if tokens.first().is_some_and(String::is_empty) {
                    tokens.remove(0);
                }
                Ok(tokens)
            }
        }
    }
}

/// Reads tokens and whole lines from a `BufRead`, with strict consumption checks.
///
/// Token reads ([`read_token`](Self::read_token) and the typed variants) search forward
/// for content and silently pass over blank lines. Whole-line reads
/// ([`next_line_text`](Self::next_line_text), [`next_line_tokens`](Self::next_line_tokens))
/// are positional: they return the literal next line, blank or not, and refuse to run
/// while the current line still has unread tokens.
///
/// [`close`](Self::close) verifies that the whole input was consumed.
///
/// A reader is meant to be driven by a single call stack; it is not `Sync` and
/// concurrent use of one instance is not supported.
///
/// # Examples
///
/// ```rust
/// # use hashcode_io::reader::TokenReader;
/// let input = "this is a test\n42 43 -44\n\nsomething\n";
/// let mut reader = TokenReader::new(input.as_bytes());
///
/// assert_eq!(reader.read_token().unwrap(), "this");
/// reader.skip(3).unwrap();
/// assert_eq!(reader.read_int().unwrap(), 42);
/// assert_eq!(reader.read_int().unwrap(), 43);
/// assert_eq!(reader.read_int().unwrap(), -44);
/// assert_eq!(reader.line_number(), 2);
///
/// // whole-line reads do not skip blank lines
/// assert_eq!(reader.next_line_text().unwrap(), "");
///
/// // "something" is still unread
/// assert!(reader.close().is_err());
/// ```
///
/// Usually the reader is not driven by hand but through [`read_text`] or [`read_file`],
/// which close it for you:
///
/// ```rust
/// # use hashcode_io::reader::read_text;
/// let (num, items) = read_text("42\nabc def ghi", |r| {
///     let num = r.read_int()?;
///     let items = r.next_line_tokens()?;
///     Ok((num, items))
/// }).unwrap();
/// assert_eq!(num, 42);
/// assert_eq!(items, vec!["abc", "def", "ghi"]);
/// ```
#[derive(Debug)]
pub struct TokenReader<R: BufRead> {
    source: R,
    delimiter: Delimiter,
    location: LocationTracker,
    current_line_text: String,
    current_line_tokens: Vec<String>,
}

impl<R: BufRead> TokenReader<R> {
    /// Creates a reader splitting tokens on runs of whitespace.
    pub fn new(source: R) -> Self {
        Self::with_delimiter(source, Delimiter::Whitespace)
    }

    /// Creates a reader splitting tokens with the given delimiter.
    pub fn with_delimiter(source: R, delimiter: Delimiter) -> Self {
        TokenReader {
            source,
            delimiter,
            location: LocationTracker::new(),
            current_line_text: String::new(),
            current_line_tokens: Vec::new(),
        }
    }

    /// Number of lines fetched so far, 0 before the first read.
    pub fn line_number(&self) -> usize {
        self.location.line_index
    }

    /// Delimiter used to split lines.
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Returns the next unread token, fetching lines (and passing over blank ones) as needed.
    pub fn read_token(&mut self) -> ReadResult<String> {
        while !self.has_more_tokens() {
            self.fetch_next_line()?;
        }
        // consumed tokens are never looked at again
        let token = mem::take(&mut self.current_line_tokens[self.location.token_index]);
        self.location.next_token();
        Ok(token)
    }

    /// Same as [`read_token`](Self::read_token).
    pub fn read_string(&mut self) -> ReadResult<String> {
        self.read_token()
    }

    /// Reads the next token as a 32-bit signed integer.
    pub fn read_int(&mut self) -> ReadResult<i32> {
        self.parse_next("integer")
    }

    /// Reads the next token as a 64-bit signed integer.
    pub fn read_long(&mut self) -> ReadResult<i64> {
        self.parse_next("long integer")
    }

    /// Reads the next token as a double. Integer notation is accepted.
    pub fn read_double(&mut self) -> ReadResult<f64> {
        self.parse_next("double")
    }

    /// Reads the next token as `true` or `false`, ignoring letter case.
    pub fn read_bool(&mut self) -> ReadResult<bool> {
        let token = self.read_token()?;
        grammar::boolean(&token).map_err(|_| self.malformed("boolean", token))
    }

    /// Reads the next token as any `FromStr` type.
    pub fn read_parsed<D: FromStr>(&mut self) -> ReadResult<D> {
        self.parse_next(std::any::type_name::<D>())
    }

    /// Consumes and discards the next `n` tokens.
    ///
    /// A negative (or otherwise unrepresentable) count fails with
    /// [`ReadError::InvalidArgument`] without consuming anything.
    pub fn skip<N>(&mut self, n: N) -> ReadResult<()>
    where N: TryInto<usize> + Display + Copy {
        let count: usize = n.try_into().map_err(|_| ReadError::InvalidArgument(
            format!("the number of tokens to skip cannot be negative, got {}", n)
        ))?;
        for _ in 0..count {
            self.read_token()?;
        }
        Ok(())
    }

    /// Fetches the next line, even if blank, and returns its raw text.
    ///
    /// Fails with [`ReadError::IncompleteLineRead`] if the current line has unread tokens.
    pub fn next_line_text(&mut self) -> ReadResult<String> {
        self.fetch_next_line()?;
        self.location.consume_line(self.current_line_tokens.len());
        Ok(self.current_line_text.clone())
    }

    /// Fetches the next line, even if blank, and returns its tokens.
    ///
    /// Fails with [`ReadError::IncompleteLineRead`] if the current line has unread tokens.
    pub fn next_line_tokens(&mut self) -> ReadResult<Vec<String>> {
        self.fetch_next_line()?;
        self.location.consume_line(self.current_line_tokens.len());
        Ok(self.current_line_tokens.clone())
    }

    /// Fetches the next line, even if blank, and parses each of its tokens.
    pub fn next_line_parsed<D: FromStr>(&mut self) -> ReadResult<Vec<D>> {
        self.fetch_next_line()?;
        let mut values = Vec::with_capacity(self.current_line_tokens.len());
        for (i, token) in self.current_line_tokens.iter().enumerate() {
            match token.parse() {
                Ok(v) => values.push(v),
                Err(_) => return Err(ReadError::MalformedToken {
                    line: self.location.line_index,
                    token: i + 1,
                    expected: std::any::type_name::<D>(),
                    text: token.clone(),
                }),
            }
        }
        self.location.consume_line(self.current_line_tokens.len());
        Ok(values)
    }

    /// Releases the source, failing if it still has unread lines.
    ///
    /// Unread tokens on the current line are not checked, only lines the source
    /// has not handed out yet. The source is dropped on every path.
    pub fn close(mut self) -> ReadResult<()> {
        let mut lines_remaining = 0;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let found = read_raw_line(&mut self.source, &mut buf).map_err(|source| ReadError::Io {
                line: self.location.line_index + lines_remaining,
                source,
            })?;
            if !found {
                break;
            }
            lines_remaining += 1;
        }
        if lines_remaining > 0 {
            return Err(ReadError::IncompleteInputRead { lines_remaining });
        }
        Ok(())
    }

    fn has_more_tokens(&self) -> bool {
        self.location.token_index < self.current_line_tokens.len()
    }

    fn remaining_tokens(&self) -> String {
        self.current_line_tokens[self.location.token_index..].join(" ")
    }

    fn fetch_next_line(&mut self) -> ReadResult<()> {
        if self.has_more_tokens() {
            return Err(ReadError::IncompleteLineRead {
                line: self.location.line_index,
                remaining: self.remaining_tokens(),
            });
        }
        let mut buf = Vec::new();
        let found = read_raw_line(&mut self.source, &mut buf).map_err(|source| ReadError::Io {
            line: self.location.line_index,
            source,
        })?;
        if !found {
            return Err(ReadError::EndOfInput { line: self.location.line_index });
        }
        // the bytes are gone from the source, so the line counts as fetched even if it is unusable
        self.location.next_line();
        self.current_line_tokens.clear();
        self.current_line_text.clear();
        let line = String::from_utf8(buf).map_err(|e| ReadError::Io {
            line: self.location.line_index,
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        self.current_line_tokens = self.delimiter.split(&line)?;
        self.current_line_text = line;
        Ok(())
    }

    fn parse_next<D: FromStr>(&mut self, expected: &'static str) -> ReadResult<D> {
        let token = self.read_token()?;
        match token.parse() {
            Ok(v) => Ok(v),
            Err(_) => Err(self.malformed(expected, token)),
        }
    }

    fn malformed(&self, expected: &'static str, text: String) -> ReadError {
        ReadError::MalformedToken {
            line: self.location.line_index,
            token: self.location.token_index,
            expected,
            text,
        }
    }
}

/// Appends the next line of `source` to `line`, without its terminator.
///
/// Lines end with `\n`, `\r\n` or a lone `\r`. Returns `false` if the source
/// was already exhausted.
fn read_raw_line<R: BufRead>(source: &mut R, line: &mut Vec<u8>) -> io::Result<bool> {
    let mut found = false;
    loop {
        let (terminator, used) = {
            let available = match source.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(found);
            }
            found = true;
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    line.extend_from_slice(&available[..i]);
                    (Some(available[i]), i + 1)
                }
                None => {
                    line.extend_from_slice(available);
                    (None, available.len())
                }
            }
        };
        source.consume(used);
        match terminator {
            Some(b'\r') => {
                if source.fill_buf()?.first() == Some(&b'\n') {
                    source.consume(1);
                }
                return Ok(true);
            }
            Some(_) => return Ok(true),
            None => {}
        }
    }
}

/// Runs `routine` on `reader`, then closes it.
///
/// The reader is closed (and the completeness check performed) only if the
/// routine succeeded; on failure the routine's error is returned and the
/// reader is simply dropped.
pub fn read_with<R, T, F>(mut reader: TokenReader<R>, routine: F) -> ReadResult<T>
where
    R: BufRead,
    F: FnOnce(&mut TokenReader<R>) -> ReadResult<T>,
{
    let value = routine(&mut reader)?;
    reader.close()?;
    Ok(value)
}

/// Reads a value from `input` using whitespace separated tokens.
pub fn read_text<T, F>(input: &str, routine: F) -> ReadResult<T>
where F: FnOnce(&mut TokenReader<&[u8]>) -> ReadResult<T> {
    read_text_with(input, Delimiter::Whitespace, routine)
}

/// Reads a value from `input` using the given delimiter.
pub fn read_text_with<T, F>(input: &str, delimiter: Delimiter, routine: F) -> ReadResult<T>
where F: FnOnce(&mut TokenReader<&[u8]>) -> ReadResult<T> {
    read_with(TokenReader::with_delimiter(input.as_bytes(), delimiter), routine)
}

/// Reads a value from the file at `path` using whitespace separated tokens.
///
/// Any failure, from opening the file to the final completeness check, is
/// wrapped into [`ReadError::FileAccess`] carrying the path.
pub fn read_file<P, T, F>(path: P, routine: F) -> ReadResult<T>
where
    P: AsRef<Path>,
    F: FnOnce(&mut TokenReader<BufReader<File>>) -> ReadResult<T>,
{
    read_file_with(path, Delimiter::Whitespace, routine)
}

/// Reads a value from the file at `path` using the given delimiter.
pub fn read_file_with<P, T, F>(path: P, delimiter: Delimiter, routine: F) -> ReadResult<T>
where
    P: AsRef<Path>,
    F: FnOnce(&mut TokenReader<BufReader<File>>) -> ReadResult<T>,
{
    let path = path.as_ref();
    File::open(path)
        .map_err(|source| ReadError::Io { line: 0, source })
        .and_then(|f| read_with(TokenReader::with_delimiter(BufReader::new(f), delimiter), routine))
        .map_err(|e| ReadError::FileAccess { path: path.to_path_buf(), source: Box::new(e) })
}
