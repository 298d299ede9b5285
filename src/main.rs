//! # queens-sat
//!
//! `queens-sat` is a command-line front end for a small DPLL SAT solver. It
//! solves CNF formulas in DIMACS or JSON form and region-coloured queens puzzles,
//! which it encodes as CNF.
//!
//! ## Usage
//!
//! ```sh
//! queens-sat [OPTIONS] [TARGET] [SUBCOMMAND]
//! ```
//!
//! A bare `TARGET` is solved by extension (`.cnf`, `.json`, `.queens`); a
//! directory is walked and every recognised file in it is solved.
//!
//! ### Subcommands
//!
//! 1.  **`file`**: Solve a DIMACS file. `queens-sat file --path problem.cnf`
//! 2.  **`json`**: Solve a JSON clause list. `queens-sat json --path formula.json`
//! 3.  **`text`**: Solve CNF given inline. `queens-sat text --input "1 -2 0\n2 0"`
//! 4.  **`queens`**: Solve a board. `queens-sat queens --path board.queens` or
//!     `queens-sat queens --example eight`
//! 5.  **`completions`**: Print a shell completion script.
//!
//! ### Common options
//!
//! -   `-v`: More logging; repeat for debug and trace output.
//! -   `--verify <BOOL>`: Check the solution (default: `true`).
//! -   `--stats <BOOL>`: Print statistics (default: `true`).
//! -   `-p, --print-solution`: Print the satisfying assignment.
//! -   `--json`: Print a JSON report instead of the table.
//! -   `--heuristic <least|most|fixed|random>` and `--seed <N>`: Branching strategy.

use clap::Parser;
use command_line::cli::{Cli, run};
use tracing_subscriber::EnvFilter;

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory statistics.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli)
}
