use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Library {
    books: u32,
    signup_days: u32,
    books_per_day: u32,
    ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct Problem {
    days: u32,
    scores: Vec<u32>,
    libraries: Vec<Library>,
}

/// Demonstrates reading a whole problem with serde. Every `Vec` starts with its length.
fn main() {
    let input = "\
7
6 1 2 3 6 5 4
2
5 2 2 5 0 1 2 3 4
4 3 1 4 3 2 5 0
";
    let problem: Problem = hashcode_io::from_str(input).unwrap();
    println!("{:#?}", problem);
    for (i, lib) in problem.libraries.iter().enumerate() {
        println!(
            "library {}: {} books, {} days to sign up, {} books/day, ids {:?}",
            i, lib.books, lib.signup_days, lib.books_per_day, lib.ids
        );
    }
    println!("total score available: {} over {} days", problem.scores.iter().sum::<u32>(), problem.days);
}
