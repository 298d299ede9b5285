#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result, bail};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use queens_sat::queens::board::{
    Board, EXAMPLE_EIGHT, EXAMPLE_FIVE, EXAMPLE_SIX, board_from_regions, parse_board_file,
    validate,
};
use queens_sat::queens::solver::{Encoding, QueensSolver};
use queens_sat::sat::assignment::Assignment;
use queens_sat::sat::dimacs::{self, parse_text};
use queens_sat::sat::dpll::Solution;
use queens_sat::sat::formula::Formula;
use queens_sat::sat::json;
use queens_sat::sat::variable_selection::VariableSelectionType;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{info, warn};

/// Defines the command-line interface for the queens-sat application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "queens-sat",
    version,
    about = "A DPLL SAT solver with a queens puzzle encoder"
)]
pub(crate) struct Cli {
    /// An optional global path. Without a subcommand, a file is solved according to
    /// its extension (`.cnf`, `.json`, `.queens`) and a directory is walked recursively.
    #[arg(global = true)]
    pub target: Option<PathBuf>,

    /// Log verbosity: `-v` info, `-vv` debug, `-vvv` trace. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Specifies the subcommand to execute.
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a JSON clause list: `[[["a", true], ["b", false]], ...]`.
    Json {
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// Literal CNF input as a string (e.g. "1 -2 0\n2 3 0").
        /// Literals are space-separated integers and 0 terminates a clause.
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a queens puzzle, from a `.queens` board file or a bundled example.
    Queens {
        /// Path to the board file.
        #[arg(long, conflicts_with = "example")]
        path: Option<PathBuf>,

        /// Solve one of the bundled boards instead of a file.
        #[arg(long, value_enum)]
        example: Option<ExampleBoard>,

        /// Keep the marks already on the board as fixed clues.
        #[arg(long, default_value_t = false)]
        keep_marks: bool,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Bundled boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExampleBoard {
    Five,
    Six,
    Eight,
}

impl ExampleBoard {
    fn board(self) -> Result<Board> {
        let board = match self {
            Self::Five => board_from_regions(&EXAMPLE_FIVE),
            Self::Six => board_from_regions(&EXAMPLE_SIX),
            Self::Eight => board_from_regions(&EXAMPLE_EIGHT),
        };
        Ok(board?)
    }
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
pub(crate) struct CommonOptions {
    /// Check a found assignment against the formula (and a decoded board against the puzzle rules).
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the satisfying assignment if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// Print one JSON report per input instead of the statistics table.
    #[arg(long, default_value_t = false)]
    pub(crate) json: bool,

    /// Branching strategy. Formulas default to `least`; queens boards default to
    /// branching on their smallest regions first.
    #[arg(long, value_enum)]
    pub(crate) heuristic: Option<VariableSelectionType>,

    /// Seed for the `random` strategy.
    #[arg(long, default_value_t = 0)]
    pub(crate) seed: u64,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            verify: true,
            stats: true,
            print_solution: false,
            json: false,
            heuristic: None,
            seed: 0,
        }
    }
}

impl CommonOptions {
    fn apply_heuristic(&self, formula: Formula) -> Formula {
        match self.heuristic {
            Some(heuristic) => formula.with_shared_selector(heuristic.to_impl(self.seed)),
            None => formula,
        }
    }
}

/// Input formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputFormat {
    Dimacs,
    Json,
    Queens,
}

impl InputFormat {
    pub(crate) fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "cnf" | "dimacs" => Some(Self::Dimacs),
            "json" => Some(Self::Json),
            "queens" => Some(Self::Queens),
            _ => None,
        }
    }
}

/// Machine-readable outcome of one solve.
#[derive(Debug, Serialize)]
pub(crate) struct Report<'a> {
    pub label: Option<String>,
    pub satisfiable: bool,
    pub variables: usize,
    pub clauses: usize,
    pub literals: usize,
    pub decisions: usize,
    pub propagations: usize,
    pub conflicts: usize,
    pub max_depth: usize,
    pub parse_seconds: f64,
    pub solve_seconds: f64,
    pub assignment: Option<&'a Assignment>,
    pub board: Option<String>,
}

impl<'a> Report<'a> {
    fn new(
        label: Option<&Path>,
        formula: &Formula,
        solution: &'a Solution,
        parse_time: Duration,
        board: Option<&Board>,
    ) -> Self {
        Self {
            label: label.map(|path| path.display().to_string()),
            satisfiable: solution.is_sat(),
            variables: formula.num_vars(),
            clauses: formula.len(),
            literals: formula.num_literals(),
            decisions: solution.stats.decisions,
            propagations: solution.stats.propagations,
            conflicts: solution.stats.conflicts,
            max_depth: solution.stats.max_depth,
            parse_seconds: parse_time.as_secs_f64(),
            solve_seconds: solution.elapsed.as_secs_f64(),
            assignment: solution.assignment.as_ref(),
            board: board.map(ToString::to_string),
        }
    }
}

/// Dispatches the parsed command line.
///
/// # Errors
///
/// Any input, encoding, search or verification failure.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::File { path, common }) => solve_file(&path, InputFormat::Dimacs, &common),
        Some(Commands::Json { path, common }) => solve_file(&path, InputFormat::Json, &common),
        Some(Commands::Text { input, common }) => {
            let time = Instant::now();
            let formula = parse_text(&input).context("failed to parse CNF text")?;
            solve_and_report(&formula, &common, None, time.elapsed())
        }
        Some(Commands::Queens {
            path,
            example,
            keep_marks,
            common,
        }) => {
            let time = Instant::now();
            let board = match (path.as_deref(), example) {
                (Some(path), _) => parse_board_file(path)
                    .with_context(|| format!("failed to read board {}", path.display()))?,
                (None, Some(example)) => example.board()?,
                (None, None) => bail!("queens needs --path or --example"),
            };
            solve_queens(&board, path.as_deref(), keep_marks, &common, time.elapsed())
        }
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
        None => match cli.target {
            Some(target) if target.is_dir() => solve_dir(&target, &cli.common),
            Some(target) => {
                let format = InputFormat::from_path(&target).unwrap_or(InputFormat::Dimacs);
                solve_file(&target, format, &cli.common)
            }
            None => bail!("No command provided. Use --help for more information."),
        },
    }
}

/// Solves every recognised file under `path`, in file-name order.
///
/// # Errors
///
/// The first file that fails to parse, encode, solve or verify.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<()> {
    for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", path.display()))?;
        let file_path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(format) = InputFormat::from_path(file_path) else {
            warn!(path = %file_path.display(), "skipping file with unknown extension");
            continue;
        };
        solve_file(file_path, format, common)?;
    }
    Ok(())
}

/// # Errors
///
/// See [`run`].
pub(crate) fn solve_file(path: &Path, format: InputFormat, common: &CommonOptions) -> Result<()> {
    let time = Instant::now();
    let formula = match format {
        InputFormat::Dimacs => dimacs::parse_file(path),
        InputFormat::Json => json::parse_file(path),
        InputFormat::Queens => {
            let board = parse_board_file(path)
                .with_context(|| format!("failed to read board {}", path.display()))?;
            return solve_queens(&board, Some(path), false, common, time.elapsed());
        }
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    solve_and_report(&formula, common, Some(path), time.elapsed())
}

/// Searches `formula`, then verifies and reports according to `common`.
///
/// # Errors
///
/// If the search aborts or a found assignment fails verification.
pub(crate) fn solve_and_report(
    formula: &Formula,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<()> {
    let formula = common.apply_heuristic(formula.clone());
    if let Some(path) = label {
        info!(path = %path.display(), "solving");
    }
    let solution = formula.solve()?;
    report(&formula, &solution, common, label, parse_time, None)
}

/// Encodes, solves and decodes a queens board.
///
/// # Errors
///
/// If encoding or search fails, or the decoded board breaks a rule.
pub(crate) fn solve_queens(
    board: &Board,
    label: Option<&Path>,
    keep_marks: bool,
    common: &CommonOptions,
    read_time: Duration,
) -> Result<()> {
    if !common.json {
        println!("Parsed board:\n{board}");
    }

    let time = Instant::now();
    let formula = QueensSolver::new(Encoding { keep_marks }).to_formula(board)?;
    let formula = common.apply_heuristic(formula);
    let parse_time = read_time + time.elapsed();

    let solution = formula.solve()?;
    let solved = solution
        .assignment
        .as_ref()
        .map(|assignment| QueensSolver::decode(board, assignment));

    if common.verify {
        if let Some(solved) = &solved {
            validate(solved).context("decoded board breaks the puzzle rules")?;
        }
    }

    report(&formula, &solution, common, label, parse_time, solved.as_ref())?;

    if !common.json {
        match &solved {
            Some(solved) => println!("Solution:\n{solved}"),
            None => println!("No solution found"),
        }
    }
    Ok(())
}

fn report(
    formula: &Formula,
    solution: &Solution,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
    board: Option<&Board>,
) -> Result<()> {
    if common.verify {
        verify_solution(formula, solution.assignment.as_ref())?;
    }

    if common.json {
        let report = Report::new(label, formula, solution, parse_time, board);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(path) = label {
        println!("Solving: {}", path.display());
    }
    if common.stats {
        print_stats(parse_time, formula, solution, memory_usage());
    }
    if let Some(assignment) = &solution.assignment {
        if common.print_solution {
            println!("Solution: {assignment}");
        }
    }
    if solution.is_sat() {
        println!("\nSATISFIABLE");
    } else {
        println!("\nUNSATISFIABLE");
    }
    Ok(())
}

/// Checks a found assignment against every clause of `formula`.
///
/// # Errors
///
/// If some clause is left unsatisfied.
pub(crate) fn verify_solution(formula: &Formula, assignment: Option<&Assignment>) -> Result<()> {
    if let Some(assignment) = assignment {
        if !formula.verify(assignment) {
            bail!("solution failed verification");
        }
        info!("solution verified");
    }
    Ok(())
}

/// Allocated and resident memory in MiB, if jemalloc can report them.
pub(crate) fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((to_mib(allocated), to_mib(resident)))
}

fn to_mib(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Prints a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(
    parse_time: Duration,
    formula: &Formula,
    solution: &Solution,
    memory: Option<(f64, f64)>,
) {
    let elapsed_secs = solution.elapsed.as_secs_f64();
    let s = &solution.stats;

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", formula.num_vars());
    stat_line("Clauses", formula.len());
    stat_line("Literals", formula.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    if let Some((allocated, resident)) = memory {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> CommonOptions {
        CommonOptions {
            stats: false,
            ..CommonOptions::default()
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_queens_command() {
        let cli = Cli::try_parse_from([
            "queens-sat",
            "queens",
            "--example",
            "six",
            "--heuristic",
            "random",
            "--seed",
            "7",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Some(Commands::Queens {
            example, common, ..
        }) = cli.command
        else {
            panic!("expected the queens subcommand");
        };
        assert_eq!(example, Some(ExampleBoard::Six));
        assert_eq!(common.heuristic, Some(VariableSelectionType::Random));
        assert_eq!(common.seed, 7);
        assert!(common.verify);
    }

    #[test]
    fn test_verify_can_be_disabled() {
        let cli = Cli::try_parse_from(["queens-sat", "text", "-i", "1 0", "--verify", "false"])
            .unwrap();
        let Some(Commands::Text { input, common }) = cli.command else {
            panic!("expected the text subcommand");
        };
        assert_eq!(input, "1 0");
        assert!(!common.verify);
    }

    #[test]
    fn test_input_format() {
        assert_eq!(
            InputFormat::from_path(Path::new("a/b.cnf")),
            Some(InputFormat::Dimacs)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("x.json")),
            Some(InputFormat::Json)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("x.queens")),
            Some(InputFormat::Queens)
        );
        assert_eq!(InputFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_text_input_runs() {
        let formula = parse_text("1 -2 0\n2 3 0\n-1 0").unwrap();
        assert!(solve_and_report(&formula, &quiet(), None, Duration::ZERO).is_ok());
    }

    #[test]
    fn test_queens_example_runs() {
        let board = ExampleBoard::Five.board().unwrap();
        assert!(solve_queens(&board, None, false, &quiet(), Duration::ZERO).is_ok());
    }

    #[test]
    fn test_solve_bundled_data() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        assert!(solve_dir(&dir, &quiet()).is_ok());
    }

    #[test]
    fn test_report_fields() {
        let formula = parse_text("1 0\n-1 2 0").unwrap();
        let solution = formula.solve().unwrap();
        let report = Report::new(None, &formula, &solution, Duration::ZERO, None);
        assert!(report.satisfiable);
        assert_eq!(report.clauses, 2);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["assignment"]["1"], true);
        assert_eq!(value["assignment"]["2"], true);
    }

    #[test]
    fn test_verify_rejects_bad_assignment() {
        let formula = parse_text("1 0").unwrap();
        let mut assignment = Assignment::new();
        assignment.set("1", false);
        assert!(verify_solution(&formula, Some(&assignment)).is_err());
        assert!(verify_solution(&formula, None).is_ok());
    }

    #[test]
    fn test_to_mib() {
        assert!((to_mib(3 * 1024 * 1024) - 3.0).abs() < f64::EPSILON);
    }
}
