//! cashflow-runner: headless driver for Cashflow.
//!
//! Usage:
//!   cashflow-runner --seed 12345 --turns 40 --db save.db
//!   cashflow-runner --seed 12345 --ipc-mode --data-dir ./data
//!
//! IPC lines look like:
//!   {"type":"command","command":{"cmd":"buy_asset","asset_id":"index-etf"}}

use anyhow::Result;
use cashflow_core::{
    command::PlayerCommand,
    config::GameConfig,
    player::PlayerState,
    rng::RngBank,
    session::{GameSession, DEFAULT_SAVE_KEY},
    store::SaveStore,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command {
        command: PlayerCommand,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    state:    &'a PlayerState,
    label:    &'a str,
    messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error:    Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let turns = parse_arg(&args, "--turns", 40u32);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let save_key = flag_value(&args, "--save-key").unwrap_or(DEFAULT_SAVE_KEY);
    let data_dir = flag_value(&args, "--data-dir");

    let config = match data_dir {
        Some(dir) => GameConfig::load(dir)?,
        None => GameConfig::standard(),
    };

    if !ipc_mode {
        println!("Cashflow; runner");
        println!("  seed:      {seed}");
        println!("  turns:     {turns}");
        println!("  db:        {db}");
        println!("  save_key:  {save_key}");
        println!("  data_dir:  {}", data_dir.unwrap_or("(built-in)"));
        println!();
    }

    let store = SaveStore::open(db)?;
    store.migrate()?;

    let game_id = format!("game-{}", uuid::Uuid::new_v4());
    let mut session = GameSession::open(game_id, save_key, config, RngBank::seeded(seed), store)?;

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        for _ in 0..turns {
            let report = session.roll_and_advance()?;
            for message in &report.messages {
                log::info!("{message}");
            }
        }
        print_summary(&session, turns)?;
    }

    Ok(())
}

fn run_ipc_loop(session: &mut GameSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let (messages, error) = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => (Vec::new(), None),
            IpcCommand::Command { command } => match session.execute(command) {
                Ok(outcome) => (outcome.messages, None),
                // Rule violations are shown to the player; anything else is fatal.
                Err(e) if e.is_rule_violation() => (Vec::new(), Some(e.to_string())),
                Err(e) => return Err(e.into()),
            },
        };

        let state = build_ui_state(session, messages, error)?;
        writeln!(stdout, "{}", state)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(
    session:  &GameSession,
    messages: Vec<String>,
    error:    Option<String>,
) -> Result<String> {
    let state = session.state();
    let label = session.engine().config().board.space_at(state.position)?.label.as_str();
    let ui = UiState { state, label, messages, error };
    Ok(serde_json::to_string(&ui)?)
}

fn print_summary(session: &GameSession, turns: u32) -> Result<()> {
    let state = session.state();
    let catalog = &session.engine().config().catalog;
    let events = session.store().event_count(&session.game_id)?;

    println!("=== GAME SUMMARY ===");
    println!("  game_id:        {}", session.game_id);
    println!("  turns played:   {turns}");
    println!("  next turn:      {}", state.turn);
    println!("  position:       {}", state.position);
    println!("  cash:           ${}", state.cash);
    println!("  salary:         ${}", state.salary);
    println!("  expenses:       ${}", state.expenses);
    println!("  passive income: ${}", state.passive_income);
    println!("  monthly flow:   ${:+}", state.cashflow());
    println!("  fast track:     {}", if state.in_fast_track { "yes" } else { "no" });
    println!("  events logged:  {events}");

    println!();
    println!("=== PORTFOLIO ===");
    if state.owned_assets.is_empty() {
        println!("  (No assets owned)");
    } else {
        for (i, id) in state.owned_assets.iter().enumerate() {
            match catalog.get(id) {
                Some(a) => println!(
                    "  [{i}] {} | Cost: ${} | Passive: ${}",
                    a.name, a.cost, a.passive_income
                ),
                None => println!("  [{i}] {id} (not in catalog)"),
            }
        }
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
