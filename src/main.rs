// SPDX-License-Identifier: MIT OR Apache-2.0

//! `blockwatch`: replay a chat transcript through a session and report what
//! was recovered.
//!
//! A transcript is plain text, one chat line per line. Lines starting with
//! `@` are directives:
//!
//! ```text
//! @wait 500          advance the clock by 500 ms
//! @creative on       switch game mode (on/off)
//! @dimension nether  move to another dimension
//! @offset 3600000    local minus server clock, in ms
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, warn};
use serde_json::json;

use blockwatch_rust::core::chat::ChatCategoryRegistry;
use blockwatch_rust::core::config::SessionConfig;
use blockwatch_rust::core::model::BlockTypeRegistry;
use blockwatch_rust::core::session::{Session, SessionIngress};
use blockwatch_rust::core::util::clock::to_millis;
use blockwatch_rust::core::util::{Clock, ManualClock, SystemClock};
use blockwatch_rust::core::{BlockWatchError, BlockWatchResult};

#[derive(Parser)]
#[command(name = "blockwatch")]
#[command(about = "Recover block edits from logging plugin chat output", long_about = None)]
struct Cli {
    /// Session configuration (YAML). Defaults to <config dir>/blockwatch/config.yml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chat categories to use instead of the bundled ones (YAML)
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    /// Block types to use instead of the bundled ones (YAML)
    #[arg(long, global = true)]
    blocks: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a chat transcript through a session
    Replay {
        transcript: PathBuf,

        /// Local time of the first line, "YYYY-MM-DD HH:MM:SS"; defaults to now
        #[arg(long)]
        start: Option<String>,

        /// Clock advance between consecutive lines
        #[arg(long, default_value_t = 10)]
        line_gap_ms: i64,

        /// Only keep edits of these players
        #[arg(long = "player")]
        players: Vec<String>,

        /// Load previously saved edits before replaying
        #[arg(long)]
        load: Option<PathBuf>,

        /// Save the recovered edits afterwards
        #[arg(long)]
        save: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Report::Deposits)]
        report: Report,

        /// Deposit listing page
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List the deposits in a saved edit file
    Deposits {
        edits: PathBuf,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Report {
    Deposits,
    Players,
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> BlockWatchResult<()> {
    let config = load_config(cli.config.as_deref())?;
    let categories = match &cli.categories {
        Some(path) => ChatCategoryRegistry::from_yaml(&fs::read_to_string(path)?)?,
        None => ChatCategoryRegistry::defaults(),
    };
    let blocks = match &cli.blocks {
        Some(path) => BlockTypeRegistry::from_yaml(&fs::read_to_string(path)?)?,
        None => BlockTypeRegistry::defaults(),
    };

    match cli.command {
        Commands::Replay {
            transcript,
            start,
            line_gap_ms,
            players,
            load,
            save,
            report,
            page,
        } => {
            let start = match start {
                Some(text) => parse_start(&text)?,
                None => SystemClock.now_millis(),
            };
            let clock = ManualClock::new(start);
            let mut session =
                Session::with_registries(config, Arc::new(clock.clone()), categories, blocks);
            for player in &players {
                session.filter_mut().add(player);
            }
            if let Some(path) = load {
                session.load_edits(BufReader::new(File::open(path)?))?;
            }

            let sent = replay(&mut session, &clock, &transcript, line_gap_ms)?;

            if let Some(path) = save {
                let lines = session.save_edits(BufWriter::new(File::create(&path)?))?;
                info!("Saved {} lines to {}", lines, path.display());
            }
            print_report(&session, report, page, &sent)
        }
        Commands::Deposits { edits, page } => {
            let mut session = Session::with_registries(
                config,
                Arc::new(SystemClock),
                categories,
                blocks,
            );
            session.load_edits(BufReader::new(File::open(edits)?))?;
            print_report(&session, Report::Deposits, page, &[])
        }
    }
}

fn load_config(path: Option<&Path>) -> BlockWatchResult<SessionConfig> {
    match path {
        Some(path) => SessionConfig::load(path),
        None => match dirs::config_dir() {
            Some(dir) => SessionConfig::load(&dir.join("blockwatch").join("config.yml")),
            None => Ok(SessionConfig::default()),
        },
    }
}

fn parse_start(text: &str) -> BlockWatchResult<i64> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .map(|when| to_millis(&when))
        .map_err(|e| BlockWatchError::configuration_with_key(e.to_string(), "start"))
}

/// Feed every transcript line through the session's ingress, ticking after
/// each so that queued commands are released as the clock advances.
fn replay(
    session: &mut Session,
    clock: &ManualClock,
    transcript: &Path,
    line_gap_ms: i64,
) -> BlockWatchResult<Vec<String>> {
    let text = fs::read_to_string(transcript)?;
    let ingress = session.ingress();
    let mut sent: Vec<String> = Vec::new();
    for (number, line) in text.lines().enumerate() {
        match line.strip_prefix('@') {
            Some(directive) => apply_directive(&ingress, clock, directive, number + 1),
            None => {
                ingress.chat(line);
                clock.advance(line_gap_ms);
            }
        }
        session.tick(&mut sent);
    }
    while !session.outbound().is_empty() {
        clock.advance(session.config().command_spacing_ms.max(1));
        session.tick(&mut sent);
    }
    Ok(sent)
}

fn apply_directive(ingress: &SessionIngress, clock: &ManualClock, directive: &str, number: usize) {
    let mut words = directive.split_whitespace();
    match (words.next(), words.next()) {
        (Some("wait"), Some(ms)) => match ms.parse::<i64>() {
            Ok(ms) => clock.advance(ms),
            Err(e) => warn!("Line {}: bad wait '{}': {}", number, ms, e),
        },
        (Some("creative"), Some(state)) => {
            ingress.game_mode(matches!(state, "on" | "true" | "yes"));
        }
        (Some("dimension"), Some(name)) => {
            ingress.dimension(name);
        }
        (Some("offset"), Some(ms)) => match ms.parse::<i64>() {
            Ok(ms) => {
                ingress.server_time_offset(ms);
            }
            Err(e) => warn!("Line {}: bad offset '{}': {}", number, ms, e),
        },
        _ => warn!("Line {}: unknown directive '@{}'", number, directive),
    }
}

fn print_report(session: &Session, report: Report, page: usize, sent: &[String]) -> BlockWatchResult<()> {
    match report {
        Report::Deposits => {
            let lines = session.list_deposits(page);
            if lines.is_empty() {
                println!("No deposits.");
            }
            for line in lines {
                println!("{}", line);
            }
        }
        Report::Players => {
            for (world, set) in session.worlds() {
                println!("{}:", world);
                for player in set.players() {
                    println!(
                        "  {} {} edits{}",
                        player.player,
                        player.edits,
                        if player.visible { "" } else { " (hidden)" }
                    );
                }
            }
        }
        Report::Json => {
            let worlds: Vec<_> = session
                .worlds()
                .map(|(world, set)| {
                    json!({
                        "world": world,
                        "edits": set.edit_count(),
                        "players": set.players().iter().map(|p| json!({
                            "player": p.player,
                            "edits": p.edits,
                            "visible": p.visible,
                        })).collect::<Vec<_>>(),
                        "ores": set.ore_db().summary().iter().map(|s| json!({
                            "bucket": s.bucket.name(),
                            "colour": format!("#{:06x}", s.bucket.colour()),
                            "deposits": s.deposits,
                            "blocks": s.blocks,
                        })).collect::<Vec<_>>(),
                        "deposits": set.ore_db().list_deposits(1, set.ore_db().deposit_count().max(1)),
                    })
                })
                .collect();
            let summary = json!({
                "dimension": session.dimension(),
                "worlds": worlds,
                "commands": sent,
            });
            let text = serde_json::to_string_pretty(&summary)
                .map_err(|e| BlockWatchError::other(e.to_string()))?;
            println!("{}", text);
        }
    }
    Ok(())
}
