//! Derives the output file path from an input file path.

use std::path::{ Component, Path, PathBuf };

/// Extension stripped from input file names.
pub const INPUT_EXTENSION: &str = ".in";
/// Extension appended to output file names.
pub const OUTPUT_EXTENSION: &str = ".out";
/// Name of the directory holding inputs.
pub const INPUTS_DIR: &str = "inputs";
/// Name of the directory receiving outputs.
pub const OUTPUTS_DIR: &str = "outputs";

/// Computes where the output of `input` goes.
///
/// A trailing `.in` is replaced by `.out`, otherwise `.out` is appended. If the
/// immediate parent directory is named exactly `inputs`, it becomes `outputs`.
///
/// ```rust
/// # use std::path::Path;
/// # use hashcode_io::writer::output_path_for;
/// assert_eq!(output_path_for(Path::new("inputs/a.in")), Path::new("outputs/a.out"));
/// assert_eq!(output_path_for(Path::new("a")), Path::new("a.out"));
/// ```
pub fn output_path_for(input: &Path) -> PathBuf {
    let normalized: PathBuf = input.components().filter(|c| *c != Component::CurDir).collect();

    let file_name = normalized.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let stem = file_name.strip_suffix(INPUT_EXTENSION).unwrap_or(&file_name);
    let new_file_name = format!("{}{}", stem, OUTPUT_EXTENSION);

    match normalized.parent() {
        None => PathBuf::from(new_file_name),
        Some(parent) if parent.file_name().is_some_and(|n| n == INPUTS_DIR) => {
            parent.with_file_name(OUTPUTS_DIR).join(new_file_name)
        }
        Some(parent) => parent.join(new_file_name),
    }
}
