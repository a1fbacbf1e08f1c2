//! Strict reading of line-structured text input for "read, solve, write" batch programs.
//!
//! The centerpiece is [`TokenReader`](reader::TokenReader): a tokenizer over numbered lines
//! that refuses to silently drop input. Token reads search forward for content, whole-line
//! reads are positional and fail while the current line still has unread tokens, and closing
//! the reader fails if lines were left unread. Every error carries the line (and token)
//! where it happened.
//!
//! Around the reader the crate offers
//!
//! - a serde [`Deserializer`](serde::Deserializer) reading typed values straight off the tokens ([`from_str`], [`from_reader`]),
//! - an output [`writer`] that creates missing directories and derives output paths from input paths,
//! - a parallel [`runner`] that solves many inputs at once and collects per-input failures,
//! - the [`solve`] glue tying all of it together.
//!
//! # Examples
//!
//! ```rust
//! use hashcode_io::reader::read_text;
//!
//! let lines = read_text("42\nabc def ghi", |r| {
//!     let num = r.read_int()?;
//!     let items: Vec<String> = (0..3).map(|_| r.read_string()).collect::<Result<_, _>>()?;
//!     Ok(items.into_iter().map(|s| format!("{}{}", s, num)).collect::<Vec<_>>())
//! }).unwrap();
//! assert_eq!(lines, vec!["abc42", "def42", "ghi42"]);
//! ```
#![deny(missing_docs)]

mod errors;
pub use errors::{ ReadError, ReadResult, SolveError, WriteError };

pub mod reader;
pub mod runner;
pub mod solve;
pub mod writer;

mod serde_impl;
pub use serde_impl::{ from_reader, from_str };

mod util;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
