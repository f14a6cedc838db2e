//! Farm Planner
//!
//! Offline front end over the farm engine: predicts battles, ranks farm
//! templates against a scouted defence, and dry-runs one farm cycle over a
//! JSON world snapshot. Results go to stdout as JSON, logs to stderr.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use farm_warden::combat::{rank_templates, simulate, CombatModifiers};
use farm_warden::core::config::Settings;
use farm_warden::core::error::Result;
use farm_warden::core::types::Timestamp;
use farm_warden::farming::cycle::touched_records;
use farm_warden::farming::{
    CycleSummary, DryRunDispatcher, FarmCycle, MemoryTargetStore, TargetRecord, VillageInfo,
};
use farm_warden::reports::{BattleReport, ReportLedger};
use farm_warden::units::{TroopComposition, TroopInventory, UnitStatTable};

/// Farm Planner - battle prediction and farm cycle dry runs
#[derive(Parser, Debug)]
#[command(name = "farm_planner")]
#[command(about = "Predict farm battles and dry-run farm cycles")]
struct Args {
    /// Settings file (TOML, `[farms]` plus optional `[units.<id>]`)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict the outcome of one attack
    Simulate {
        /// Attacking troops as JSON, e.g. '{"axe": 100}'
        #[arg(long)]
        attacker: String,

        /// Defending troops as JSON
        #[arg(long)]
        defender: String,

        #[command(flatten)]
        battle: BattleArgs,
    },

    /// Rank the configured farm templates against a defence
    Rank {
        /// Defending troops as JSON
        #[arg(long)]
        defender: String,

        #[command(flatten)]
        battle: BattleArgs,
    },

    /// Dry-run one farm cycle over a world snapshot
    Plan {
        /// World snapshot (JSON: home, villages, troops, reports)
        #[arg(long)]
        world: PathBuf,

        /// Target record store (JSON); read if present, rewritten afterwards
        #[arg(long)]
        store: Option<PathBuf>,

        /// Cycle time in unix seconds (defaults to now)
        #[arg(long)]
        now: Option<Timestamp>,
    },
}

#[derive(clap::Args, Debug)]
struct BattleArgs {
    /// Wall level of the defender
    #[arg(long, default_value_t = 0)]
    wall: u32,

    /// Night bonus active
    #[arg(long)]
    night: bool,

    /// Attacker morale in percent
    #[arg(long, default_value_t = 100.0)]
    morale: f64,

    /// Attacker luck in percent
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    luck: f64,
}

impl BattleArgs {
    fn modifiers(&self) -> CombatModifiers {
        CombatModifiers {
            night_bonus: self.night,
            morale_pct: self.morale,
            luck_pct: self.luck,
        }
    }
}

/// World snapshot consumed by `plan`
#[derive(Deserialize)]
struct WorldSnapshot {
    home: VillageInfo,
    #[serde(default)]
    villages: Vec<VillageInfo>,
    #[serde(default)]
    troops: TroopComposition,
    #[serde(default)]
    reports: Vec<BattleReport>,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    summary: &'a CycleSummary,
    records: Vec<TargetRecord>,
    troops_left: &'a TroopComposition,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("farm_warden=info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut table = UnitStatTable::standard();
    table.apply_overrides(&settings.units);

    match args.command {
        Command::Simulate {
            attacker,
            defender,
            battle,
        } => {
            let attacker: TroopComposition = serde_json::from_str(&attacker)?;
            let defender: TroopComposition = serde_json::from_str(&defender)?;
            let result = simulate(&table, &attacker, &defender, battle.wall, battle.modifiers())?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Rank { defender, battle } => {
            let defender: TroopComposition = serde_json::from_str(&defender)?;
            let ranked = rank_templates(
                &table,
                &settings.farms.templates,
                &defender,
                battle.wall,
                battle.modifiers(),
            )?;
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Command::Plan { world, store, now } => {
            plan(&settings, &table, &world, store.as_deref(), now.unwrap_or_else(unix_now))?;
        }
    }

    Ok(())
}

fn plan(settings: &Settings, table: &UnitStatTable, world: &Path, store_path: Option<&Path>, now: Timestamp) -> Result<()> {
    let snapshot: WorldSnapshot = serde_json::from_str(&std::fs::read_to_string(world)?)?;

    let mut store = match store_path {
        Some(path) if path.exists() => MemoryTargetStore::load(path)?,
        _ => MemoryTargetStore::new(),
    };
    let ledger = ReportLedger::from_reports(snapshot.reports);
    let mut inventory = TroopInventory::new(snapshot.troops);
    let mut dispatcher = DryRunDispatcher::new();

    tracing::info!(
        home = %snapshot.home.village_id,
        villages = snapshot.villages.len(),
        reports = ledger.len(),
        known_targets = store.len(),
        "Planning farm cycle"
    );

    let mut cycle = FarmCycle::new(&settings.farms, table);
    let summary = cycle.run(
        &snapshot.home,
        &snapshot.villages,
        &mut inventory,
        &ledger,
        &mut store,
        &mut dispatcher,
        now,
    );

    let output = PlanOutput {
        summary: &summary,
        records: touched_records(&summary, &store),
        troops_left: inventory.troops(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if let Some(path) = store_path {
        store.save(path)?;
    }
    Ok(())
}

fn unix_now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
