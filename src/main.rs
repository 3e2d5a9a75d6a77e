use clap::Parser;
use env_logger::Env;
use itertools::Itertools;
use log::{error, info};
use serde::Deserialize;
use serde_json::Error as JSONError;
use thiserror::Error;

use path_score::bonus::BonusRule;
use path_score::generator::{random_grid_path, GridError, GridParams};
use path_score::scoring::{PathScorer, PlayerScore, ScoreError, ScoreReport};
use path_score::tile::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board JSON file to score: {"players": n, "path": [tiles...]}.
    board: Option<String>,

    /// JSON file with the ordered list of bonus rules to use instead of the
    /// reference ones.
    #[arg(long)]
    rules_file: Option<String>,

    /// Score a random grid generated from this seed instead of a board file.
    #[arg(long)]
    random_seed: Option<u64>,

    /// Width of the random grid.
    #[arg(long, default_value_t = 8)]
    width: u32,

    /// Height of the random grid.
    #[arg(long, default_value_t = 8)]
    height: u32,

    /// Number of players owning tiles on the random grid.
    #[arg(long, default_value_t = 2)]
    players: u8,
}

#[derive(Deserialize)]
struct BoardFile {
    players: usize,
    path: Path,
}

#[derive(Error, Debug)]
enum AppError {
    #[error("Failed reading an input file")]
    ReadError(#[from] std::io::Error),
    #[error("Failed parsing JSON ({0})")]
    ParseError(#[from] JSONError),
    #[error("Failed scoring the path ({0})")]
    ScoreError(#[from] ScoreError),
    #[error("Can't generate the board ({0})")]
    GridError(#[from] GridError),
    #[error("Give a board file or --random-seed")]
    NoBoard,
}

fn load_board(cli: &Cli) -> Result<BoardFile, AppError> {
    if let Some(seed) = cli.random_seed {
        info!("Generating a {}x{} board from seed {seed}", cli.width, cli.height);
        let params = GridParams {
            width: cli.width,
            height: cli.height,
            players: cli.players,
            seed,
            ..GridParams::default()
        };
        return Ok(BoardFile {
            players: cli.players as usize,
            path: random_grid_path(&params)?,
        });
    }
    let filename = cli.board.as_ref().ok_or(AppError::NoBoard)?;
    info!("Loading board from {filename}");
    let board_data = std::fs::read_to_string(filename)?;
    Ok(serde_json::from_str(&board_data)?)
}

fn new_scorer(cli: &Cli) -> Result<PathScorer, AppError> {
    match &cli.rules_file {
        Some(filename) => {
            info!("Loading bonus rules from {filename}");
            let rules_data = std::fs::read_to_string(filename)?;
            let rules: Vec<BonusRule> = serde_json::from_str(&rules_data)?;
            Ok(PathScorer::new(rules))
        },
        None => Ok(PathScorer::default()),
    }
}

fn run(cli: Cli) -> Result<ScoreReport, AppError> {
    let scorer = new_scorer(&cli)?;
    info!("Bonus rules: {}", scorer.rules.iter()
          .map(|rule| format!("{}->{} x{}{}", rule.start, rule.end, rule.bonus,
                              if rule.must_be_loaded { " (loaded)" } else { "" }))
          .join(", "));
    let mut board = load_board(&cli)?;
    let mut players = vec![PlayerScore::default(); board.players];
    scorer.score_path(&mut board.path, &mut players)?;
    Ok(ScoreReport::new(&board.path, &players))
}

fn main() {
    // Load .env file
    dotenvy::dotenv().ok();
    // Init logger with default value of info
    // This can be overriden with RUST_LOG env var
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = run(cli).and_then(|report| {
        Ok(serde_json::to_string_pretty(&report)?)
    });
    match result {
        Ok(output) => println!("{output}"),
        Err(err) => {
            error!("Error while scoring with underlying error:");
            error!("  {}", err);
            std::process::exit(1);
        },
    }
}
