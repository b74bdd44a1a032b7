use anyhow::{bail, ensure, Context, Result};
use canteen_twin::adapters::{SimulatedBoard, TerminalDisplay, TerminalIndicator};
use canteen_twin::domain::{
    DispenserBuilder, DispenserConfig, IndicatorLevel, LineId, RoleKind, SystemClock,
};
use canteen_twin::infrastructure::{DispenserRuntime, DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Canteen token dispenser
/// Runs the dispenser core on host threads or on the digital twin
#[derive(Parser)]
#[command(name = "canteen")]
#[command(about = "Cafeteria token dispenser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dispenser; button presses are read from stdin
    Run {
        /// Configuration file (defaults to the factory board)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Replay the reference scenarios on the digital twin
    Demo,
    /// Write the default configuration file
    Init {
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// One line typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Press(RoleKind),
    Status,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "entrance" => Some(Input::Press(RoleKind::Entrance)),
        "b" | "exit" => Some(Input::Press(RoleKind::Exit)),
        "r" | "reset" => Some(Input::Press(RoleKind::Reset)),
        "s" | "status" => Some(Input::Status),
        "q" | "quit" => Some(Input::Quit),
        _ => None,
    }
}

fn line_for(config: &DispenserConfig, kind: RoleKind) -> Option<LineId> {
    config
        .roles
        .iter()
        .filter(|r| r.kind == kind && r.trigger.uses_edges())
        .find_map(|r| r.line)
}

fn load_config(path: Option<&Path>) -> Result<DispenserConfig> {
    let Some(path) = path else {
        return Ok(DispenserConfig::default());
    };
    DispenserConfig::from_file(path).with_context(|| format!("loading {}", path.display()))
}

async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let dispenser = DispenserBuilder::from_config(config.clone()).build(
        SystemClock::new(),
        TerminalDisplay::new(io::stdout()),
        TerminalIndicator::new(io::stdout()),
    )?;
    let handle = DispenserRuntime::spawn(dispenser)?;

    info!("commands: a/entrance, b/exit, r/reset, s/status, q/quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Some(Input::Press(kind)) => match line_for(&config, kind) {
                        Some(gpio) => {
                            let outcome = handle.edge(gpio);
                            info!(role = %kind, line = %gpio, ?outcome, "button pressed");
                        }
                        None => warn!(role = %kind, "role has no button on this board"),
                    },
                    Some(Input::Status) => {
                        let frame = handle.status();
                        info!(
                            total = frame.total,
                            available = frame.available,
                            used = frame.used,
                            level = %frame.level,
                            "status"
                        );
                        for (role, state) in handle.role_states() {
                            info!(%role, ?state, "role state");
                        }
                    }
                    Some(Input::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => warn!(input = %line.trim(), "unknown command"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received");
                break;
            }
        }
    }

    let reports = tokio::task::spawn_blocking(move || handle.shutdown()).await?;
    for report in reports {
        info!(
            role = %report.name,
            actions = report.actions,
            rejections = report.rejections,
            "role summary"
        );
    }
    Ok(())
}

fn demo() -> Result<()> {
    // Scenario A: eight entrances, 300 ms apart, then a ninth
    let mut board = SimulatedBoard::new()?;
    for i in 0..9u64 {
        board.clock().set(i * 300);
        board.press(RoleKind::Entrance);
        board.step(RoleKind::Entrance);
    }
    ensure!(board.available() == 0, "scenario A: pool not drained");
    ensure!(board.indicator().last() == Some(IndicatorLevel::Empty), "scenario A: indicator");
    info!(available = board.available(), level = %IndicatorLevel::Empty, "scenario A passed");

    // Scenario B: one exit from empty
    board.advance(300);
    board.press(RoleKind::Exit);
    board.step(RoleKind::Exit);
    ensure!(board.available() == 1, "scenario B: expected one token");
    ensure!(board.indicator().last() == Some(IndicatorLevel::Low), "scenario B: indicator");
    info!(available = board.available(), level = %IndicatorLevel::Low, "scenario B passed");

    // Scenario C: reset from 3 with entrance/exit events still pending
    let mut board = SimulatedBoard::new()?;
    for _ in 0..5 {
        board.advance(300);
        board.press(RoleKind::Entrance);
        board.step(RoleKind::Entrance);
    }
    board.advance(300);
    board.press(RoleKind::Entrance);
    board.press(RoleKind::Exit);
    board.press(RoleKind::Reset);
    board.step(RoleKind::Reset);
    ensure!(board.available() == 8, "scenario C: pool not refilled");
    ensure!(board.indicator().last() == Some(IndicatorLevel::Full), "scenario C: indicator");
    info!(available = board.available(), level = %IndicatorLevel::Full, "scenario C passed");

    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    DispenserConfig::default().write_to(path)?;
    info!(path = %path.display(), "default configuration written");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    info!("canteen {}", canteen_twin::VERSION);

    match cli.command {
        Commands::Run { config } => run(config).await?,
        Commands::Demo => demo()?,
        Commands::Init { path, force } => init(&path, force)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canteen_twin::domain::RoleConfig;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("a"), Some(Input::Press(RoleKind::Entrance)));
        assert_eq!(parse_input(" EXIT \n"), Some(Input::Press(RoleKind::Exit)));
        assert_eq!(parse_input("r"), Some(Input::Press(RoleKind::Reset)));
        assert_eq!(parse_input("status"), Some(Input::Status));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input("dance"), None);
    }

    #[test]
    fn test_line_for_timer_reset() {
        let mut config = DispenserConfig::default();
        assert_eq!(line_for(&config, RoleKind::Reset), Some(LineId::RESET));

        config.roles[2] = RoleConfig::timed_reset(60_000);
        assert_eq!(line_for(&config, RoleKind::Reset), None);
    }

    #[test]
    fn test_demo_scenarios_pass() {
        demo().unwrap();
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        init(&path, false).unwrap();
        assert!(init(&path, false).is_err());
        init(&path, true).unwrap();
        assert_eq!(DispenserConfig::from_file(&path).unwrap(), DispenserConfig::default());
    }
}
