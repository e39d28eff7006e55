use clap::Parser;
use color_eyre::eyre::eyre;

use queens_bdd::bdd::BddConfig;
use queens_bdd::game::{GameConfig, Placement, QueensGame};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Board size.
    #[arg(value_name = "INT", default_value = "8")]
    n: usize,

    /// Queen to place, as `row,column` (0-based). May be repeated.
    #[arg(long = "place", value_name = "ROW,COL", value_parser = parse_cell)]
    placements: Vec<(usize, usize)>,

    /// BDD size (in bits, so the actual size is `2^size` nodes).
    #[clap(
        long,
        value_name = "INT",
        default_value = "20",
        value_parser = clap::value_parser!(u8).range(1..=31)
    )]
    size: u8,

    /// Disable garbage collection after placements.
    #[clap(long)]
    no_gc: bool,

    /// Print one full solution extending the placements.
    #[clap(long)]
    suggest: bool,
}

fn parse_cell(s: &str) -> Result<(usize, usize), String> {
    let (row, column) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{}'", s))?;
    let row = row.trim().parse().map_err(|e| format!("bad row '{}': {}", row, e))?;
    let column = column
        .trim()
        .parse()
        .map_err(|e| format!("bad column '{}': {}", column, e))?;
    Ok((row, column))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let config = GameConfig::default()
        .with_bdd_config(BddConfig::default().with_storage_bits(args.size as usize))
        .with_garbage_collection(!args.no_gc);
    let mut game = QueensGame::with_config(config);

    game.initialize_game(args.n)?;
    println!(
        "Initialized {}x{} board, {} solutions",
        args.n,
        args.n,
        game.solution_count()?
    );

    for &(row, column) in &args.placements {
        match game.insert_queen(row, column)? {
            Placement::Placed => println!("Queen at ({}, {}):", row, column),
            Placement::Ignored(cell) => {
                println!("Skipping ({}, {}): cell is {:?}", row, column, cell);
                continue;
            }
        }
        print!("{}", game.game_board()?);
        println!("{} solutions left", game.solution_count()?);
    }

    if game.is_solved()? {
        println!("Solved!");
    } else if args.suggest {
        let cells = game
            .suggest_completion()?
            .ok_or_else(|| eyre!("no solution extends the current placements"))?;
        println!("Suggested queens: {:?}", cells);
    }

    let time_total = time_total.elapsed();
    println!("All done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
