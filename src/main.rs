use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use astar_solver::{
    puzzle::{self, Board, Direction, EightPuzzle},
    solve, RouteMap, SearchConfig, SearchOutcome,
};
use clap::{Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use tracing::{error, info};

#[derive(Parser)]
#[command(version)]
/// Find paths with A*: driving routes between cities, or 8-puzzle solutions.
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(help = "TOML file with search limits", short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
    #[arg(help = "Stop after this many expansions", long = "max-expansions", global = true)]
    max_expansions: Option<usize>,
    #[arg(help = "Stop after this many seconds", long = "time-limit", global = true)]
    time_limit: Option<f64>,
    #[arg(
        value_enum,
        help = "The verbosity level",
        short = 'v',
        long = "verbosity",
        default_value_t = Verbosity::Normal,
        global = true
    )]
    verbosity: Verbosity,
}

#[derive(Subcommand)]
enum Commands {
    /// Shortest driving route between two cities.
    Route {
        #[arg(long, default_value = "Davao City")]
        from: String,
        #[arg(long, default_value = "Butuan")]
        to: String,
        #[arg(help = "TOML road map, defaults to the built-in Mindanao map", long)]
        map: Option<PathBuf>,
    },
    /// Solve an 8-puzzle file with A* and the Manhattan distance.
    Solve {
        #[arg(help = "File with `initial:` and `goal:` sections")]
        file: PathBuf,
    },
    /// Solve an 8-puzzle file with breadth-first search.
    Bfs {
        #[arg(help = "File with `initial:` and `goal:` sections")]
        file: PathBuf,
    },
    /// Play the 8-puzzle interactively with W/A/S/D.
    Play {
        #[arg(help = "Starting tiles, row by row, e.g. `1,2,3,4,5, ,6,7,8`")]
        tiles: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Silent,
    Normal,
    Verbose,
    Debug,
}

impl From<Verbosity> for tracing::Level {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Silent => tracing::Level::ERROR,
            Verbosity::Normal => tracing::Level::INFO,
            Verbosity::Verbose => tracing::Level::DEBUG,
            Verbosity::Debug => tracing::Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level: tracing::Level = cli.verbosity.into();
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .compact()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> astar_solver::Result<()> {
    let mut config = match &cli.config {
        Some(path) => SearchConfig::from_toml_file(path)?,
        None => SearchConfig::new(),
    };
    if let Some(max) = cli.max_expansions {
        config = config.with_max_expansions(max);
    }
    if let Some(secs) = cli.time_limit {
        config.time_limit_secs = Some(secs);
    }

    match cli.command {
        Commands::Route { from, to, map } => route(&from, &to, map, &config),
        Commands::Solve { file } => solve_puzzle(file, &config),
        Commands::Bfs { file } => bfs_puzzle(file),
        Commands::Play { tiles } => play(&tiles),
    }
}

fn route(
    from: &str,
    to: &str,
    map: Option<PathBuf>,
    config: &SearchConfig,
) -> astar_solver::Result<()> {
    let map = match map {
        Some(path) => RouteMap::from_toml_file(path)?,
        None => RouteMap::mindanao(),
    };

    println!("Finding the shortest driving route from {} to {}...", from, to);
    let (outcome, _) = solve(&map, &from.to_string(), &to.to_string(), config);
    match outcome {
        SearchOutcome::Found(solution) => {
            println!("Path: {}", solution.path.iter().join(" -> "));
            println!("Total cost (distance): {} km", solution.cost);
        }
        SearchOutcome::NoPath => println!("No path found."),
        SearchOutcome::BudgetExhausted => println!("Search limit reached before a path was found."),
    }
    Ok(())
}

fn print_steps(path: &[Board]) {
    for (step, board) in path.iter().enumerate() {
        println!("--- Step {} ---", step);
        println!("{}", board);
        println!();
    }
    println!("Total number of moves needed: {}", path.len().saturating_sub(1));
}

fn load_puzzle(file: PathBuf) -> astar_solver::Result<Option<(Board, Board)>> {
    let (start, goal) = puzzle::parse_puzzle_file(&file)?;
    println!("Initial state:\n{}\n", start);
    println!("Goal state:\n{}\n", goal);

    if !start.is_solvable_towards(&goal) {
        println!("This puzzle is unsolvable.");
        return Ok(None);
    }
    Ok(Some((start, goal)))
}

fn solve_puzzle(file: PathBuf, config: &SearchConfig) -> astar_solver::Result<()> {
    let Some((start, goal)) = load_puzzle(file)? else {
        return Ok(());
    };

    let (outcome, statistics) = solve(&EightPuzzle, &start, &goal, config);
    match outcome {
        SearchOutcome::Found(solution) => {
            println!("Solution found:");
            print_steps(&solution.path);
            println!(
                "Expanded {} boards (generated {} total).",
                statistics.expanded, statistics.generated
            );
        }
        SearchOutcome::NoPath => println!("No solution found."),
        SearchOutcome::BudgetExhausted => println!("Search limit reached before a solution was found."),
    }
    Ok(())
}

fn bfs_puzzle(file: PathBuf) -> astar_solver::Result<()> {
    let Some((start, goal)) = load_puzzle(file)? else {
        return Ok(());
    };

    match puzzle::breadth_first(&start, &goal) {
        Some(path) => {
            println!("Solution found:");
            print_steps(&path);
        }
        None => println!("No solution found."),
    }
    Ok(())
}

fn play(tiles: &str) -> astar_solver::Result<()> {
    let mut board = puzzle::parse_board(tiles)?;
    let goal = Board::solved();
    if !board.is_solvable_towards(&goal) {
        info!("this arrangement cannot reach the goal");
    }

    println!("Move the blank with W (up), A (left), S (down), D (right); Q quits.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut moves = 0;

    loop {
        println!("\nCurrent state:\n{}\n\nGoal state:\n{}\n", board, goal);
        if board == goal {
            println!("Congratulations! You solved it in {} moves!", moves);
            return Ok(());
        }

        print!("Enter move (W/A/S/D or Q to quit): ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let key = line.trim().chars().next().unwrap_or(' ');

        if key.eq_ignore_ascii_case(&'q') {
            println!("Game exited.");
            return Ok(());
        }

        match Direction::from_key(key).and_then(|d| board.slide(d)) {
            Some(next) => {
                board = next;
                moves += 1;
            }
            None => println!("Invalid move. Try again."),
        }
    }
}
