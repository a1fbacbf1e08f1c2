use hashcode_io::reader::{ read_text, TokenReader };
use hashcode_io::ReadResult;
use std::io::BufRead;

/// A pizza order: the number of slices wanted, then the size of every pizza type.
#[derive(Debug)]
struct Order {
    max_slices: i64,
    pizzas: Vec<i64>,
}

fn read_order<R: BufRead>(r: &mut TokenReader<R>) -> ReadResult<Order> {
    let max_slices = r.read_long()?;
    let count = r.read_int()?;
    let pizzas = r.next_line_parsed::<i64>()?;
    if pizzas.len() != count as usize {
        return Err(hashcode_io::ReadError::custom(format!(
            "Line {}: expected {} pizza types, got {}", r.line_number(), count, pizzas.len()
        )));
    }
    Ok(Order { max_slices, pizzas })
}

/// Picks pizza types greedily from the largest, never exceeding the slice budget.
fn solve(order: &Order) -> Vec<String> {
    let mut total = 0;
    let mut picked = Vec::new();
    for (i, size) in order.pizzas.iter().enumerate().rev() {
        if total + size <= order.max_slices {
            total += size;
            picked.push(i);
        }
    }
    picked.reverse();
    vec![
        picked.len().to_string(),
        picked.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" "),
    ]
}

fn main() {
    let input = "17 4\n2 5 6 8\n";
    let order = read_text(input, |r| read_order(r)).unwrap();
    println!("Order: {:?}", order);
    for line in solve(&order) {
        println!("{}", line);
    }

    // a broken input is reported with its position
    match read_text("17 four\n2 5 6 8\n", |r| read_order(r)) {
        Ok(_) => println!("unexpectedly parsed"),
        Err(e) => println!("Error: {}", e),
    }
}
