//! Interactive all-pay duel against the heuristic oracle.
//!
//! Reads one bid per line from stdin. `quit` (or end of input) stops early;
//! `--save` writes the state on exit so the game can be resumed with `--load`.

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use allpay_duel::{
    BidOracle, EngineResult, GameConfig, GameError, GameSession, GuardedOracle, HeuristicPlanner,
    Personality, ProfileReporter, RoundOutcome, Side,
};

#[derive(Parser)]
#[command(name = "allpay-duel")]
#[command(about = "Sealed-bid all-pay auction with rising maintenance fees")]
struct Args {
    /// Money each side starts with
    #[arg(long)]
    starting_money: Option<u64>,

    /// Seed for the oracle's bid selection
    #[arg(long)]
    seed: Option<u64>,

    /// Oracle personality (neutral, aggressive, conservative, chaotic)
    #[arg(long)]
    personality: Option<Personality>,

    /// Recent rounds shown to the oracle
    #[arg(long)]
    lookback: Option<usize>,

    /// JSON game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resume from a saved state file
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the state to this file on exit
    #[arg(long)]
    save: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args).await?;
    let oracle = GuardedOracle::new(HeuristicPlanner::new(), config.seed);

    let mut session = match &args.load {
        Some(path) => GameSession::load_file(oracle, config, path).await?,
        None => GameSession::new(oracle, config)?,
    };

    tracing::info!(
        round = session.state().current_round(),
        personality = %session.config().personality,
        "game started"
    );

    play(&mut session).await?;

    if let Some(path) = &args.save {
        session.save_file(path).await?;
        println!("State saved to {}", path.display());
    }

    if session.is_over() {
        let reporter = ProfileReporter::new(session.config().human_side);
        let report = session.generate_report(&reporter).await?;
        println!();
        println!("{report}");
    }

    Ok(())
}

async fn load_config(args: &Args) -> EngineResult<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_json_str(&tokio::fs::read_to_string(path).await?)?,
        None => GameConfig::default(),
    };

    if let Some(money) = args.starting_money {
        config = config.with_starting_money(money);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(personality) = args.personality {
        config = config.with_personality(personality);
    }
    if let Some(lookback) = args.lookback {
        config = config.with_lookback(lookback);
    }

    config.validate()?;
    Ok(config)
}

async fn play<O: BidOracle>(session: &mut GameSession<O>) -> EngineResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while !session.is_over() {
        print_status(session);

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            break;
        }
        let bid: u64 = match input.parse() {
            Ok(bid) => bid,
            Err(_) => {
                println!("Enter a whole-dollar bid (or 'quit').");
                continue;
            }
        };

        match session.play_round(bid).await {
            Ok(outcome) => print_outcome(session, &outcome),
            Err(err @ GameError::Oracle { .. }) => {
                tracing::warn!(error = %err, "round not played");
                println!("The AI could not bid this round ({err}). Try again.");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

fn print_status<O: BidOracle>(session: &GameSession<O>) {
    let state = session.state();
    let human = session.config().human_side;
    let you = state.participant(human);
    let them = state.participant(human.opponent());

    println!();
    println!(
        "Round {} | maintenance ${} | You: ${} ({} pts) | {}: ${} ({} pts)",
        state.current_round(),
        session.next_fee(),
        you.money,
        you.score,
        them.name,
        them.money,
        them.score
    );
    print!("Your bid: ");
    // prompt only; a failed flush still leaves the read working
    std::io::Write::flush(&mut std::io::stdout()).ok();
}

fn print_outcome<O: BidOracle>(session: &GameSession<O>, outcome: &RoundOutcome) {
    let human = session.config().human_side;

    if let Some(record) = outcome.record() {
        let verdict = match record.winner {
            Some(side) if side == human => "You win the round.".to_string(),
            Some(side) => format!("{side} wins the round."),
            None => "Tie, no point awarded.".to_string(),
        };
        println!(
            "You bid ${}, {} bid ${}. {verdict}",
            record.bids[human],
            human.opponent(),
            record.bids[human.opponent()]
        );
    }

    if !outcome.rationale().is_empty() {
        println!("AI rationale:");
        for line in outcome.rationale() {
            println!("  - {line}");
        }
    }

    if let Some(end) = outcome.end() {
        println!();
        println!("Game over: {}", end.reason);
        if let Some(walkover) = &end.walkover {
            println!(
                "{} won {} round(s) by walkover before running out of money at round {}.",
                walkover.survivor, walkover.rounds_awarded, walkover.stopped_at
            );
        }
        let state = session.state();
        println!(
            "Final score: PLAYER {} - AI {} ({})",
            state.participant(Side::Player).score,
            state.participant(Side::Ai).score,
            session.result()
        );
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose {
        "allpay_duel=debug,info"
    } else {
        "allpay_duel=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
