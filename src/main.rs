// atomc: lexical, syntax, and declaration-time semantic analysis for AtomC

use atomc::driver::{Mode, TestDriver};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut directory = String::from("AtomC-tests");
    let mut mode = Mode::Automatic;

    for arg in &args[1..] {
        match arg.as_str() {
            "--interactive" | "-i" => mode = Mode::Interactive,
            "--help" | "-h" => {
                let program_name = args.first().map(|s| s.as_str()).unwrap_or("atomc");
                eprintln!("Usage: {} [TESTS_DIR] [--interactive]", program_name);
                eprintln!();
                eprintln!("Runs the AtomC analysis pipeline over every .c file in");
                eprintln!("TESTS_DIR (default: AtomC-tests). With --interactive the");
                eprintln!("driver pauses after each file; type 'exit' to stop.");
                return;
            }
            other if other.starts_with('-') => {
                eprintln!("Error: unknown option '{}'", other);
                eprintln!(
                    "Usage: {} [TESTS_DIR] [--interactive]",
                    args.first().map(|s| s.as_str()).unwrap_or("atomc")
                );
                std::process::exit(1);
            }
            other => directory = other.to_string(),
        }
    }

    let driver = TestDriver::new(&directory, mode);
    if let Err(err) = driver.run() {
        eprintln!("Error: cannot read test directory '{}': {}", directory, err);
        std::process::exit(1);
    }
}
