use std::env;
use std::fs::File;
use std::io::{stdin, Read};
use std::time::Instant;

use csvstream::CsvReader;

fn main() -> Result<(), csvstream::CsvError> {
    // Reads the file named by the first argument, or stdin if there is none.
    let input: Box<dyn Read> = match env::args_os().nth(1) {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(stdin()),
    };

    let started = Instant::now();
    let mut reader = CsvReader::from_reader(input);
    let mut rows = reader.rows()?;
    while let Some(row) = rows.next_row()? {
        println!("Row {}:", row.number());
        for (i, field) in row.enumerate() {
            println!("Column {}: {}", i, field?);
        }
    }
    println!("Elapsed: {:?}", started.elapsed());
    Ok(())
}
