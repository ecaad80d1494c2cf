//! Varzea operator CLI
//!
//! Thin console over a league snapshot file: schedule fixtures, run the
//! lifecycle, score matches, apply/revert walkovers and manage
//! suspensions. Every acting user passed with `--actor` is treated as an
//! administrator; role resolution belongs to the web layer, not here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use varzea_core::{
    Actor, CardType, DisciplineConfig, DisciplineCore, Fixture, MatchStatus, PunishmentReason,
    StaticRoster, WalkoverRequest,
};

#[derive(Parser)]
#[command(name = "varzea")]
#[command(about = "Operate a recreational league disciplinary ledger", long_about = None)]
struct Cli {
    /// League snapshot file
    #[arg(long, default_value = "league.varzea")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty league file
    Init,

    /// Register a scheduled match
    Schedule {
        #[arg(long)]
        organizer: Uuid,
        /// Championship id; omit for a friendly
        #[arg(long)]
        championship: Option<Uuid>,
        /// Kickoff, RFC 3339 (e.g. 2026-09-05T15:00:00Z)
        #[arg(long)]
        at: DateTime<Utc>,
    },

    /// Move a match through its lifecycle
    Transition {
        #[arg(long)]
        match_id: Uuid,
        #[arg(long, value_enum)]
        to: StatusArg,
        #[arg(long)]
        actor: Uuid,
    },

    /// Open the scoresheet for a match
    CreateReport {
        #[arg(long)]
        match_id: Uuid,
        #[arg(long)]
        home: Uuid,
        #[arg(long)]
        away: Uuid,
        #[arg(long)]
        actor: Uuid,
    },

    /// Record a goal on a match's report
    Goal {
        #[arg(long)]
        match_id: Uuid,
        #[arg(long)]
        player: Uuid,
        #[arg(long)]
        minute: u8,
        /// Roster JSON file ({"players": {..}, "matches": {..}})
        #[arg(long)]
        roster: PathBuf,
    },

    /// Record a card on a match's report
    Card {
        #[arg(long)]
        match_id: Uuid,
        #[arg(long)]
        player: Uuid,
        #[arg(long, value_enum)]
        card: CardArg,
        #[arg(long)]
        minute: u8,
        #[arg(long)]
        roster: PathBuf,
    },

    /// Apply a walkover punishment
    Punish {
        #[arg(long)]
        match_id: Uuid,
        /// Team forfeiting the match
        #[arg(long)]
        team: Uuid,
        #[arg(long, value_enum)]
        reason: ReasonArg,
        #[arg(long)]
        home: Uuid,
        #[arg(long)]
        away: Uuid,
        #[arg(long)]
        actor: Uuid,
        #[arg(long)]
        roster: PathBuf,
    },

    /// Reverse a walkover punishment
    Unpunish {
        #[arg(long)]
        match_id: Uuid,
        #[arg(long)]
        actor: Uuid,
    },

    /// Create a manual suspension
    Suspend {
        #[arg(long)]
        player: Uuid,
        #[arg(long)]
        championship: Option<Uuid>,
        #[arg(long)]
        games: u8,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        actor: Uuid,
    },

    /// Credit one served game on a player's active suspensions
    ConsumeGame {
        #[arg(long)]
        player: Uuid,
        #[arg(long)]
        championship: Option<Uuid>,
        /// Match date; defaults to now
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },

    /// Check whether a player may generate new match events
    Eligibility {
        #[arg(long)]
        player: Uuid,
        #[arg(long)]
        championship: Option<Uuid>,
    },

    /// Suspension history of a player
    History {
        #[arg(long)]
        player: Uuid,
        #[arg(long)]
        championship: Option<Uuid>,
    },

    /// Print fixtures, reports and punishments
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Open,
    Confirmed,
    Finalized,
    CancelledByWo,
}

impl From<StatusArg> for MatchStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Open => MatchStatus::Open,
            StatusArg::Confirmed => MatchStatus::Confirmed,
            StatusArg::Finalized => MatchStatus::Finalized,
            StatusArg::CancelledByWo => MatchStatus::CancelledByWo,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CardArg {
    Yellow,
    Red,
}

impl From<CardArg> for CardType {
    fn from(arg: CardArg) -> Self {
        match arg {
            CardArg::Yellow => CardType::Yellow,
            CardArg::Red => CardType::Red,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ReasonArg {
    Withdrawal,
    NoShow,
    LateArrival,
    InsufficientPlayers,
}

impl From<ReasonArg> for PunishmentReason {
    fn from(arg: ReasonArg) -> Self {
        match arg {
            ReasonArg::Withdrawal => PunishmentReason::Withdrawal,
            ReasonArg::NoShow => PunishmentReason::NoShow,
            ReasonArg::LateArrival => PunishmentReason::LateArrival,
            ReasonArg::InsufficientPlayers => PunishmentReason::InsufficientPlayers,
        }
    }
}

fn load_core(path: &Path) -> Result<DisciplineCore> {
    DisciplineCore::load_from_path(path, DisciplineConfig::default())
        .with_context(|| format!("failed to load league file {}", path.display()))
}

fn save_core(core: &DisciplineCore, path: &Path) -> Result<()> {
    core.save_to_path(path)
        .with_context(|| format!("failed to save league file {}", path.display()))
}

fn load_roster(path: &Path) -> Result<StaticRoster> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file {}", path.display()))?;
    StaticRoster::from_json(&json)
        .with_context(|| format!("failed to parse roster file {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let core = DisciplineCore::new();
            save_core(&core, &cli.file)?;
            println!("created {}", cli.file.display());
        }

        Commands::Schedule { organizer, championship, at } => {
            let core = load_core(&cli.file)?;
            let fixture = match championship {
                Some(id) => Fixture::championship(at, id, organizer),
                None => Fixture::friendly(at, organizer),
            };
            let match_id = fixture.id;
            core.register_fixture(fixture)?;
            save_core(&core, &cli.file)?;
            println!("scheduled match {}", match_id);
        }

        Commands::Transition { match_id, to, actor } => {
            let core = load_core(&cli.file)?;
            let status = core.transition(match_id, to.into(), &Actor::admin(actor))?;
            save_core(&core, &cli.file)?;
            println!("match {} is now {:?}", match_id, status);
        }

        Commands::CreateReport { match_id, home, away, actor } => {
            let core = load_core(&cli.file)?;
            let report = core.create_report(match_id, home, away, &Actor::admin(actor))?;
            save_core(&core, &cli.file)?;
            println!("report {} opened for match {}", report.id, match_id);
        }

        Commands::Goal { match_id, player, minute, roster } => {
            let core = load_core(&cli.file)?;
            let roster = load_roster(&roster)?;
            let report = core.report_for_match(match_id)?;
            core.record_goal(report.id, player, minute, &roster)?;
            save_core(&core, &cli.file)?;
            let report = core.report_for_match(match_id)?;
            println!("score {} x {}", report.home_score, report.away_score);
        }

        Commands::Card { match_id, player, card, minute, roster } => {
            let core = load_core(&cli.file)?;
            let roster = load_roster(&roster)?;
            let report = core.report_for_match(match_id)?;
            let card = core.record_card(report.id, player, card.into(), minute, &roster)?;
            save_core(&core, &cli.file)?;
            println!("{:?} card recorded for player {}", card.card_type, player);
        }

        Commands::Punish { match_id, team, reason, home, away, actor, roster } => {
            let core = load_core(&cli.file)?;
            let roster = load_roster(&roster)?;
            let request = WalkoverRequest {
                match_id,
                punished_team_id: team,
                reason: reason.into(),
                home_team_id: home,
                away_team_id: away,
            };
            core.apply_punishment(&request, &Actor::admin(actor), &roster)?;
            save_core(&core, &cli.file)?;
            let report = core.report_for_match(match_id)?;
            println!(
                "walkover applied: {} x {}, match finalized",
                report.home_score, report.away_score
            );
        }

        Commands::Unpunish { match_id, actor } => {
            let core = load_core(&cli.file)?;
            core.remove_punishment(match_id, &Actor::admin(actor))?;
            save_core(&core, &cli.file)?;
            println!("walkover removed, match {} back to confirmed", match_id);
        }

        Commands::Suspend { player, championship, games, notes, actor } => {
            let core = load_core(&cli.file)?;
            let suspension = core.create_manual_suspension(
                player,
                championship,
                games,
                &notes,
                &Actor::admin(actor),
            )?;
            save_core(&core, &cli.file)?;
            println!("suspension {} created ({} games)", suspension.id, games);
        }

        Commands::ConsumeGame { player, championship, date } => {
            let core = load_core(&cli.file)?;
            let updated =
                core.consume_game(player, championship, date.unwrap_or_else(Utc::now))?;
            save_core(&core, &cli.file)?;
            for suspension in &updated {
                println!(
                    "suspension {}: {}/{} games served{}",
                    suspension.id,
                    suspension.games_served,
                    suspension.games_to_suspend,
                    if suspension.is_active { "" } else { " (completed)" }
                );
            }
            if updated.is_empty() {
                println!("no active suspensions to serve");
            }
        }

        Commands::Eligibility { player, championship } => {
            let core = load_core(&cli.file)?;
            let eligibility = core.eligibility(player, championship, Utc::now());
            println!("{}", serde_json::to_string_pretty(&eligibility)?);
        }

        Commands::History { player, championship } => {
            let core = load_core(&cli.file)?;
            let history = core.suspension_history(player, championship);
            println!("{}", serde_json::to_string_pretty(&history)?);
        }

        Commands::Show => {
            let core = load_core(&cli.file)?;
            let snapshot = core.to_snapshot();
            for fixture in &snapshot.fixtures {
                println!(
                    "match {} [{:?}] {:?} at {}",
                    fixture.id, fixture.kind, fixture.status, fixture.scheduled_at
                );
            }
            for report in &snapshot.reports {
                println!(
                    "report {} match {} {} x {}{}",
                    report.id,
                    report.match_id,
                    report.home_score,
                    report.away_score,
                    if report.is_walkover { " (walkover)" } else { "" }
                );
            }
            for punishment in &snapshot.punishments {
                println!(
                    "punishment {} match {} team {} ({:?})",
                    punishment.id,
                    punishment.match_id,
                    punishment.punished_team_id,
                    punishment.reason
                );
            }
        }
    }

    Ok(())
}
