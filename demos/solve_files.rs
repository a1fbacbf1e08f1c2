use hashcode_io::runner::{ ErrorLogPolicy, RunnerOptions };
use hashcode_io::solve::solve_files_in_parallel;

/// Solves every file passed on the command line, writing `<name>.out` next to
/// each input (or into `outputs/` for files living in `inputs/`).
fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        eprintln!("usage: solve_files <input>...");
        return;
    }

    let options = RunnerOptions::default().with_log_policy(ErrorLogPolicy::StderrAndTracing);
    let report = solve_files_in_parallel(&inputs, &options, |r| {
        let num = r.read_int()?;
        let items = r.next_line_tokens()?;
        Ok(items.into_iter().map(|s| format!("{}{}", s, num)).collect::<Vec<_>>())
    });

    println!("{} solved, {} failed", report.completed(), report.failures().len());
    if !report.is_success() {
        std::process::exit(1);
    }
}
