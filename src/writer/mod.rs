//! Writes result lines to output files.

use std::fs::{ self, File };
use std::io::{ self, BufWriter, Write };
use std::path::Path;

use crate::errors::WriteError;

mod output_path;

pub use self::output_path::{ output_path_for, INPUTS_DIR, INPUT_EXTENSION, OUTPUTS_DIR, OUTPUT_EXTENSION };

/// Writes every line followed by `\n`.
///
/// ```rust
/// # use hashcode_io::writer::write_lines;
/// let mut buf = Vec::<u8>::new();
/// write_lines(&mut buf, ["abc42", "def42"]).unwrap();
/// assert_eq!(buf, b"abc42\ndef42\n");
/// ```
pub fn write_lines<W, I>(out: &mut W, lines: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for line in lines {
        out.write_all(line.as_ref().as_bytes())?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Writes `lines` to the file at `path`.
///
/// Missing parent directories are created and an existing file is overwritten.
pub fn write_output_file<P, I>(path: P, lines: I) -> Result<(), WriteError>
where
    P: AsRef<Path>,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let path = path.as_ref();
    __write_output_file(path, lines).map_err(|source| WriteError { path: path.to_path_buf(), source })
}

fn __write_output_file<I>(path: &Path, lines: I) -> io::Result<()>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_lines(&mut out, lines)?;
    out.flush()
}
