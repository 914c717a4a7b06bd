use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::Verbosity;
use minesweeper_core::*;
use minesweeper_protocol::{PresentationHints, SaveFile, ZOOM_LEVELS};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

mod render;

/// Play Minesweeper one move at a time, keeping the game in a save file.
#[derive(Parser)]
#[command(name = "minesweeper", version)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity,

    /// Save file holding the game between moves
    #[arg(long, short, global = true, default_value = "minesweeper.json")]
    save: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a new game, replacing the save file
    New(NewArgs),
    /// Reveal a cell, the first reveal also places the mines
    Reveal {
        #[command(flatten)]
        at: CellArgs,
        /// Seed for mine placement, only used by the first reveal
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Place or remove a flag
    Flag(CellArgs),
    /// Reveal the neighbors of a numbered cell once all of its mines are flagged
    Chord(CellArgs),
    /// Print the board
    Show,
}

#[derive(Args)]
struct CellArgs {
    row: Coord,
    col: Coord,
}

#[derive(Args)]
struct NewArgs {
    /// Preset board: beginner, intermediate or expert
    #[arg(long, short, conflicts_with_all = ["rows", "cols", "mines"])]
    difficulty: Option<Difficulty>,
    /// Custom board height
    #[arg(long, requires_all = ["cols", "mines"])]
    rows: Option<Coord>,
    /// Custom board width
    #[arg(long, requires_all = ["rows", "mines"])]
    cols: Option<Coord>,
    /// Custom mine count
    #[arg(long, requires_all = ["rows", "cols"])]
    mines: Option<CellCount>,
    #[arg(long, value_enum, default_value_t = PolicyArg::RevealAllSafe)]
    win_policy: PolicyArg,
    /// Board scale in percent, kept for graphical front ends
    #[arg(long, default_value_t = ZOOM_LEVELS[0], value_parser = parse_zoom)]
    zoom: u16,
}

#[derive(Copy, Clone, ValueEnum)]
enum PolicyArg {
    RevealAllSafe,
    FlagAllMines,
}

impl From<PolicyArg> for WinPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::RevealAllSafe => WinPolicy::RevealAllSafe,
            PolicyArg::FlagAllMines => WinPolicy::FlagAllMines,
        }
    }
}

fn parse_zoom(value: &str) -> std::result::Result<u16, String> {
    let zoom: u16 = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if ZOOM_LEVELS.contains(&zoom) {
        Ok(zoom)
    } else {
        Err(format!("zoom must be one of {:?}", ZOOM_LEVELS))
    }
}

/// Prints the lifecycle events of a move.
struct Announcer;

impl GameObserver for Announcer {
    fn on_game_started(&mut self) {
        println!("Mines placed, clock started.");
    }

    fn on_game_lost(&mut self) {
        println!("Boom! You hit a mine.");
    }

    fn on_game_won(&mut self) {
        println!("Cleared! You win.");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match cli.command {
        Command::New(args) => new_game(&cli.save, args),
        Command::Reveal { at, seed } => play(&cli.save, seed, |game| game.reveal((at.row, at.col))),
        Command::Flag(at) => play(&cli.save, None, |game| game.toggle_flag((at.row, at.col))),
        Command::Chord(at) => play(&cli.save, None, |game| game.reveal_adjacent((at.row, at.col))),
        Command::Show => {
            let (game, hints) = load(&cli.save, None)?;
            print!("{}", render::render(&game, &hints));
            Ok(())
        }
    }
}

fn new_game(path: &Path, args: NewArgs) -> Result<()> {
    let (game, hints) = fresh_game(&args)?;
    store(path, &game, &hints)?;
    print!("{}", render::render(&game, &hints));
    Ok(())
}

/// An unstarted game. It never places mines itself: the first `reveal` restores the save with a seeded
/// [`RandomMineGenerator`], which places them.
fn fresh_game(args: &NewArgs) -> Result<(Game<FixedMineGenerator>, PresentationHints)> {
    let difficulty = match (args.rows, args.cols, args.mines) {
        (Some(rows), Some(cols), Some(mines)) => Difficulty::Custom { rows, cols, mines },
        _ => args.difficulty.unwrap_or_default(),
    };
    let config = difficulty
        .config()
        .with_context(|| format!("Invalid {} board", difficulty))?
        .with_win_policy(args.win_policy.into());

    let game = Game::new(config, FixedMineGenerator::new(Vec::<Coord2>::new()))?;
    let hints = PresentationHints {
        elapsed_time: 0,
        selected_difficulty: difficulty.label().to_owned(),
        zoom_level: args.zoom,
    };
    log::info!(
        "New {} game: {}x{} with {} mines",
        difficulty,
        config.rows(),
        config.cols(),
        config.mines()
    );
    Ok((game, hints))
}

fn play(
    path: &Path,
    seed: Option<u64>,
    apply: impl FnOnce(&mut Game) -> minesweeper_core::Result<GameEvents>,
) -> Result<()> {
    let (mut game, hints) = load(path, seed)?;

    let events = apply(&mut game).context("Move rejected")?;
    if !events.has_update() {
        log::info!("Nothing changed");
    }
    events.notify(&mut Announcer);

    store(path, &game, &hints)?;
    print!("{}", render::render(&game, &hints));
    Ok(())
}

fn load(path: &Path, seed: Option<u64>) -> Result<(Game, PresentationHints)> {
    let file = File::open(path)
        .with_context(|| format!("Could not open {}, start one with `new`", path.display()))?;
    let save = SaveFile::read_from(BufReader::new(file))
        .with_context(|| format!("Could not read {}", path.display()))?;

    let seed = seed.unwrap_or_else(clock_seed);
    log::debug!("Mine placement seed: {}", seed);
    let restored = save
        .restore(RandomMineGenerator::new(seed))
        .with_context(|| format!("Could not restore {}", path.display()))?;
    Ok(restored)
}

fn store<G: MineGenerator>(path: &Path, game: &Game<G>, hints: &PresentationHints) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Could not create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    SaveFile::capture(game, hints)
        .write_to(&mut writer)
        .with_context(|| format!("Could not write {}", path.display()))?;
    writer.flush()?;
    log::debug!("Saved game to {}", path.display());
    Ok(())
}

/// Seed derived from the wall clock, for games started without `--seed`.
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
