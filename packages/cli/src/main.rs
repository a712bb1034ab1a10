#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the safety score toolchain.
//!
//! Scores a single point from the terminal, prints the loaded risk tables,
//! or starts the HTTP server.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use safety_score::{RiskEngine, RiskTables};
use safety_score_models::{CompositionPolicy, DecayShape, EnvironmentalFlags, RiskInputs};
use safety_score_server::{AppState, ScoringDefaults, ServerConfig};

#[derive(Parser)]
#[command(name = "safety_score", about = "Geospatial safety scoring")]
struct Cli {
    /// Risk tables TOML (defaults to `SAFETY_TABLES_PATH` or the embedded
    /// Delhi tables)
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single point and hour
    Score(ScoreArgs),
    /// Print the loaded hotspots, safe zones and time windows
    Tables,
    /// Start the HTTP server
    Serve {
        /// Bind address (defaults to `BIND_ADDR` or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port (defaults to `PORT` or 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct ScoreArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    /// Hour of day (normalized modulo 24)
    #[arg(long, allow_hyphen_values = true)]
    hour: f64,
    /// The area is crowded
    #[arg(long)]
    crowded: bool,
    /// The area has no street lighting
    #[arg(long)]
    unlit: bool,
    /// Police are nearby
    #[arg(long)]
    near_police: bool,
    /// Public transport is nearby
    #[arg(long)]
    public_transport: bool,
    /// Override the tables' composition policy
    #[arg(long)]
    policy: Option<CompositionPolicy>,
    /// Override the tables' decay shape
    #[arg(long)]
    decay: Option<DecayShape>,
    /// Print the breakdown as JSON
    #[arg(long)]
    json: bool,
}

impl ScoreArgs {
    /// Applies `--policy` and `--decay` to the loaded tables.
    fn apply_overrides(&self, tables: &mut RiskTables) {
        if let Some(policy) = self.policy {
            tables.composition = policy;
        }
        if let Some(decay) = self.decay {
            tables.decay = decay;
        }
    }

    const fn environment(&self) -> EnvironmentalFlags {
        EnvironmentalFlags {
            is_crowded: self.crowded,
            has_streetlights: !self.unlit,
            is_near_police: self.near_police,
            is_public_transport: self.public_transport,
        }
    }

    const fn any_flag_set(&self) -> bool {
        self.crowded || self.unlit || self.near_police || self.public_transport
    }

    /// Engine inputs for this point. Flags are attached only when `engine`
    /// reads them; otherwise passing any flag logs a warning.
    fn risk_inputs(&self, engine: &RiskEngine) -> RiskInputs {
        let inputs = RiskInputs::new(self.lat, self.lon, self.hour);

        if engine.uses_environment() {
            inputs.with_environment(self.environment())
        } else {
            if self.any_flag_set() {
                log::warn!(
                    "Environmental flags ignored: '{}' composition does not use them \
                     (pass --policy environmental_additive)",
                    engine.tables().composition
                );
            }
            inputs
        }
    }
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let tables = match &cli.tables {
        Some(path) => RiskTables::from_path(path)?,
        None => RiskTables::from_env()?,
    };

    match cli.command {
        Commands::Score(args) => {
            let mut tables = tables;
            args.apply_overrides(&mut tables);
            let engine = RiskEngine::new(tables)?;

            let inputs = args.risk_inputs(&engine);
            let breakdown = engine.assess(&inputs);

            if args.json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                println!("Score:          {:.2} ({})", breakdown.score, breakdown.band);
                println!(
                    "Location risk:  {:.3}{}",
                    breakdown.location_risk,
                    breakdown
                        .dominant_hotspot
                        .as_deref()
                        .map(|h| format!(" ({h})"))
                        .unwrap_or_default()
                );
                println!("Time risk:      {:.3}", breakdown.time_risk);
                println!(
                    "Safety boost:   {:.3}{}",
                    breakdown.safety_boost,
                    breakdown
                        .protecting_zone
                        .as_deref()
                        .map(|z| format!(" ({z})"))
                        .unwrap_or_default()
                );
                println!("Environment:    {:+.3}", breakdown.environmental_adjustment);
                println!("Total risk:     {:.3}", breakdown.total_risk);
            }
        }
        Commands::Tables => print_tables(&RiskEngine::new(tables)?),
        Commands::Serve { bind, port } => {
            let engine = RiskEngine::new(tables)?;
            let mut config = ServerConfig::from_env();
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let state = AppState::new(engine, ScoringDefaults::from_env());
            safety_score_server::run_server(config, state).await?;
        }
    }

    Ok(())
}

fn print_tables(engine: &RiskEngine) {
    let tables = engine.tables();

    println!(
        "Tables '{}': core radius {} m, max risk distance {} m, {} decay, {} composition",
        tables.name,
        tables.hotspot_radius_m,
        tables.max_risk_distance_m,
        tables.decay,
        tables.composition
    );

    println!();
    println!("Hotspots:");
    for hotspot in engine.hotspots() {
        println!(
            "  {:<24} ({:.4}, {:.4})  weight {:.2}",
            hotspot.name, hotspot.latitude, hotspot.longitude, hotspot.risk_weight
        );
    }

    println!();
    println!("Safe zones:");
    for zone in engine.safe_zones() {
        println!(
            "  {:<32} ({:.4}, {:.4})  radius {:>6.0} m  boost {:.2}",
            zone.name, zone.latitude, zone.longitude, zone.radius_m, zone.safety_boost
        );
    }

    println!();
    println!("Time windows (default risk {:.2}):", tables.default_time_risk);
    for window in &tables.time_windows {
        println!(
            "  {:<14} {:02}:00-{:02}:00  risk {:.2}",
            window.label.as_deref().unwrap_or("-"),
            window.start_hour,
            window.end_hour,
            window.risk
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_args(extra: &[&str]) -> ScoreArgs {
        let mut argv = vec![
            "safety_score",
            "score",
            "--lat",
            "28.6469",
            "--lon",
            "77.3164",
            "--hour",
            "23",
        ];
        argv.extend_from_slice(extra);

        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Score(args) => args,
            _ => panic!("expected the score subcommand"),
        }
    }

    #[test]
    fn unlit_clears_streetlights() {
        let flags = score_args(&["--unlit", "--near-police"]).environment();
        assert!(!flags.has_streetlights);
        assert!(flags.is_near_police);
        assert!(!flags.is_crowded);
        assert!(!flags.is_public_transport);

        let flags = score_args(&[]).environment();
        assert!(flags.has_streetlights);
    }

    #[test]
    fn policy_and_decay_override_tables() {
        let args = score_args(&["--policy", "environmental_additive", "--decay", "exponential"]);
        let mut tables = RiskTables::embedded();
        args.apply_overrides(&mut tables);
        assert_eq!(tables.composition, CompositionPolicy::EnvironmentalAdditive);
        assert_eq!(tables.decay, DecayShape::Exponential);

        let mut tables = RiskTables::embedded();
        score_args(&[]).apply_overrides(&mut tables);
        assert_eq!(tables.composition, CompositionPolicy::BoostMultiplicative);
        assert_eq!(tables.decay, DecayShape::Linear);
    }

    #[test]
    fn rejects_unknown_policy() {
        let result = Cli::try_parse_from([
            "safety_score",
            "score",
            "--lat",
            "0",
            "--lon",
            "0",
            "--hour",
            "0",
            "--policy",
            "loudest_wins",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn accepts_negative_coordinates_and_hours() {
        let args = match Cli::try_parse_from([
            "safety_score",
            "score",
            "--lat",
            "-33.86",
            "--lon",
            "-151.2",
            "--hour",
            "-1",
        ])
        .unwrap()
        .command
        {
            Commands::Score(args) => args,
            _ => panic!("expected the score subcommand"),
        };
        assert!((args.lat + 33.86).abs() < f64::EPSILON);
        assert!((args.lon + 151.2).abs() < f64::EPSILON);
        assert!((args.hour + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flags_only_reach_engines_that_read_them() {
        let args = score_args(&["--crowded", "--unlit"]);

        let inputs = args.risk_inputs(&RiskEngine::embedded());
        assert_eq!(inputs.environment, None);

        let mut tables = RiskTables::embedded();
        tables.composition = CompositionPolicy::EnvironmentalAdditive;
        let inputs = args.risk_inputs(&RiskEngine::new(tables).unwrap());
        assert_eq!(inputs.environment, Some(args.environment()));
    }

    #[test]
    fn global_tables_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["safety_score", "tables", "--tables", "custom.toml"]).unwrap();
        assert_eq!(cli.tables, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Tables));
    }
}
