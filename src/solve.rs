//! Glue for "read an input file, solve it, write the output file" programs.

use std::fs::File;
use std::io::BufReader;
use std::path::{ Path, PathBuf };

use crate::errors::{ ReadResult, SolveError };
use crate::reader::{ self, TokenReader };
use crate::runner::{ self, RunReport, RunnerOptions };
use crate::writer::{ self, output_path_for };

/// Reader handed to solving routines working on files.
pub type FileReader = TokenReader<BufReader<File>>;

/// Reads the file at `input` with `read_and_solve` and writes the returned lines
/// next to it, at the path given by [`output_path_for`].
///
/// Returns the path of the written output file.
pub fn solve_file<P, F, L>(input: P, read_and_solve: F) -> Result<PathBuf, SolveError>
where
    P: AsRef<Path>,
    F: FnOnce(&mut FileReader) -> ReadResult<L>,
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    let input = input.as_ref();
    solve_file_to(input, output_path_for(input), read_and_solve)
}

/// Reads the file at `input` with `read_and_solve` and writes the returned lines to `output`.
///
/// Returns the path of the written output file.
pub fn solve_file_to<P, Q, F, L>(input: P, output: Q, read_and_solve: F) -> Result<PathBuf, SolveError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnOnce(&mut FileReader) -> ReadResult<L>,
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    let (input, output) = (input.as_ref(), output.as_ref());
    tracing::debug!(input = %input.display(), "reading input file");
    let lines = reader::read_file(input, read_and_solve)?;
    tracing::debug!(output = %output.display(), "writing output file");
    writer::write_output_file(output, lines)?;
    Ok(output.to_path_buf())
}

/// Solves every input file on its own thread, writing each output with [`solve_file`].
///
/// Failures of individual files are logged according to `options` and returned
/// in the report; they never stop the other files.
pub fn solve_files_in_parallel<P, F, L>(inputs: impl IntoIterator<Item = P>, options: &RunnerOptions, read_and_solve: F) -> RunReport<PathBuf, SolveError>
where
    P: AsRef<Path>,
    F: Fn(&mut FileReader) -> ReadResult<L> + Sync,
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    let inputs = inputs.into_iter().map(|p| p.as_ref().to_path_buf());
    runner::run_in_parallel(inputs, options, |input: &PathBuf| {
        solve_file(input, &read_and_solve).map(|output| {
            tracing::debug!(input = %input.display(), output = %output.display(), "input solved");
        })
    })
}
