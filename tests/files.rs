use hashcode_io::*;
use hashcode_io::reader::{ read_file, read_file_with, Delimiter, TokenReader };
use hashcode_io::runner::{ ErrorLogPolicy, RunnerOptions, TaskError };
use hashcode_io::solve::{ solve_file, solve_file_to, solve_files_in_parallel };
use hashcode_io::writer::output_path_for;

use std::fs;
use std::io::BufRead;
use std::path::Path;

struct Problem {
    num: i32,
    items: Vec<String>,
}

impl Problem {
    fn solve(&self) -> Vec<String> {
        self.items.iter().map(|s| format!("{}{}", s, self.num)).collect()
    }
}

fn read_problem<R: BufRead>(r: &mut TokenReader<R>) -> ReadResult<Problem> {
    let num = r.read_int()?;
    let items: Vec<String> = (0..3).map(|_| r.read_string()).collect::<ReadResult<_>>()?;
    Ok(Problem { num, items })
}

fn quiet() -> RunnerOptions {
    RunnerOptions::default().with_log_policy(ErrorLogPolicy::Noop)
}

#[test]
fn read_file_ok() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("testfile.in");
    fs::write(&path, "42\nabc def ghi\n").unwrap();

    let problem = read_file(&path, |r| read_problem(r)).unwrap();
    assert_eq!(problem.solve(), vec!["abc42", "def42", "ghi42"]);
}

#[test]
fn read_file_with_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("csv.in");
    fs::write(&path, "1,2,3\n").unwrap();

    let delimiter = Delimiter::pattern(",").unwrap();
    let values = read_file_with(&path, delimiter, |r| r.next_line_parsed::<u32>()).unwrap();
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn read_file_missing_is_file_access_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.in");
    let err = read_file(&path, |r| read_problem(r)).err().expect("file does not exist");
    match &err {
        ReadError::FileAccess { path: p, source } => {
            assert_eq!(p, &path);
            assert!(matches!(**source, ReadError::Io { .. }));
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert!(err.to_string().starts_with("Failed to read input file"));
}

#[test]
fn read_file_parse_failure_is_file_access_with_cause() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.in");
    fs::write(&path, "forty-two\nabc def ghi\n").unwrap();

    match read_file(&path, |r| read_problem(r)) {
        Err(ReadError::FileAccess { source, .. }) => {
            assert!(matches!(*source, ReadError::MalformedToken { line: 1, token: 1, .. }));
        }
        Err(e) => panic!("unexpected: {}", e),
        Ok(_) => panic!("should fail"),
    }
}

#[test]
fn read_file_leftover_is_file_access_with_cause() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.in");
    fs::write(&path, "42\nabc def ghi\nextra\n").unwrap();

    match read_file(&path, |r| read_problem(r)) {
        Err(ReadError::FileAccess { source, .. }) => {
            assert!(matches!(*source, ReadError::IncompleteInputRead { lines_remaining: 1 }));
        }
        Err(e) => panic!("unexpected: {}", e),
        Ok(_) => panic!("should fail"),
    }
}

#[test]
fn output_path_examples() {
    let cases = [
        ("myInput.in", "myInput.out"),
        ("myInput", "myInput.out"),
        ("inputs/myInput.in", "outputs/myInput.out"),
        ("root/inputsweird/myInput", "root/inputsweird/myInput.out"),
    ];
    for (input, expected) in cases {
        assert_eq!(output_path_for(Path::new(input)), Path::new(expected));
    }
}

#[test]
fn solve_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("testfile.in");
    fs::write(&input, "42\nabc def ghi").unwrap();

    let output = solve_file(&input, |r| Ok(read_problem(r)?.solve())).unwrap();
    assert_eq!(output, dir.path().join("testfile.out"));
    let written: Vec<String> = fs::read_to_string(&output).unwrap().lines().map(String::from).collect();
    assert_eq!(written, vec!["abc42", "def42", "ghi42"]);
}

#[test]
fn solve_file_to_explicit_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("testfile.in");
    let output = dir.path().join("deep").join("dir").join("result.txt");
    fs::write(&input, "7\nx y z\n").unwrap();

    let written = solve_file_to(&input, &output, |r| Ok(read_problem(r)?.solve())).unwrap();
    assert_eq!(written, output);
    assert_eq!(fs::read_to_string(&output).unwrap(), "x7\ny7\nz7\n");
}

#[test]
fn solve_files_in_parallel_collects_failures() {
    let dir = tempfile::tempdir().unwrap();
    let inputs_dir = dir.path().join("inputs");
    fs::create_dir_all(&inputs_dir).unwrap();
    let names = ["a.in", "b.in", "c.in", "broken.in"];
    for (i, name) in names.iter().enumerate() {
        let content = if *name == "broken.in" { "x\n".to_string() } else { format!("{}\np q r\n", i) };
        fs::write(inputs_dir.join(name), content).unwrap();
    }

    let inputs: Vec<_> = names.iter().map(|n| inputs_dir.join(n)).collect();
    let report = solve_files_in_parallel(&inputs, &quiet(), |r| Ok(read_problem(r)?.solve()));

    assert_eq!(report.completed(), 3);
    let failures = report.into_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].input, inputs_dir.join("broken.in"));
    assert!(matches!(failures[0].error, TaskError::Failed(SolveError::Read(ReadError::FileAccess { .. }))));

    let outputs_dir = dir.path().join("outputs");
    assert_eq!(fs::read_to_string(outputs_dir.join("b.out")).unwrap(), "p1\nq1\nr1\n");
    assert!(!outputs_dir.join("broken.out").exists());
}
