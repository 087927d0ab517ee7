//! lien-cli: operator entry point for a lien database.

use anyhow::Context;
use clap::Parser;
use lien_keeper::genesis::{export_genesis, init_genesis};
use lien_keeper::{GenesisState, Lien, LienError, LienKeeper};
use lien_store_lmdb::{check_integrity, LmdbEnvironment};
use lien_types::{Address, Coins};
use lien_utils::{init_logging, LienConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lien-cli", about = "Inspect and maintain a lien database")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "LIEN_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the LMDB environment.
    #[arg(long, env = "LIEN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "LIEN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "LIEN_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the lien on an address.
    Get {
        /// Address in hex.
        address: Address,
    },
    /// Replace the lien on an address. An empty coin list releases it.
    Set {
        /// Address in hex.
        address: Address,
        /// Coins such as "123ubld,5000urun".
        #[arg(default_value = "")]
        coins: Coins,
    },
    /// Print every lien in address order.
    List,
    /// Write every lien to a genesis JSON file.
    Export { file: PathBuf },
    /// Load liens from a genesis JSON file.
    Import { file: PathBuf },
    /// Decode every stored record and report corruption.
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    match config.log_format() {
        Ok(format) => init_logging(format, &config.log_level),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let fatal = e
                .downcast_ref::<LienError>()
                .is_some_and(LienError::is_fatal);
            if fatal {
                tracing::error!(error = %format!("{e:#}"), "lien state is corrupted, halting");
                ExitCode::from(2)
            } else {
                tracing::error!(error = %format!("{e:#}"), "command failed");
                ExitCode::FAILURE
            }
        }
    }
}

/// File settings as the base, flags and env vars on top.
fn load_config(cli: &Cli) -> anyhow::Result<LienConfig> {
    let mut config = match &cli.config {
        Some(path) => LienConfig::from_toml_file(path)?,
        None => LienConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run(command: Command, config: &LienConfig) -> anyhow::Result<()> {
    let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)
        .with_context(|| format!("opening {}", config.data_dir.display()))?;

    match command {
        Command::Get { address } => {
            let rtxn = env.read_txn()?;
            let lien = LienKeeper::read_lien(&rtxn, &address)?;
            println!("{}", lien.coins);
        }
        Command::Set { address, coins } => {
            let mut wtxn = env.write_txn()?;
            LienKeeper::write_lien(&mut wtxn, &address, &Lien::new(coins))?;
            wtxn.commit().map_err(LienError::from)?;
        }
        Command::List => {
            let rtxn = env.read_txn()?;
            LienKeeper::scan_liens(&rtxn, |address, lien| {
                println!("{address} {}", lien.coins);
                false
            })?;
        }
        Command::Export { file } => {
            let rtxn = env.read_txn()?;
            let state = export_genesis(&rtxn)?;
            std::fs::write(&file, state.to_json_pretty()?)
                .with_context(|| format!("writing {}", file.display()))?;
            tracing::info!(liens = state.liens.len(), file = %file.display(), "exported liens");
        }
        Command::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let state = GenesisState::from_json(&json)?;
            let mut wtxn = env.write_txn()?;
            init_genesis(&mut wtxn, &state)?;
            wtxn.commit().map_err(LienError::from)?;
        }
        Command::Check => {
            let report = check_integrity(&env)?;
            println!(
                "{} entries, {} liens checked, {} errors",
                report.total_entries,
                report.liens_checked,
                report.errors.len()
            );
            for error in &report.errors {
                println!("  {error}");
            }
            if !report.is_healthy() {
                return Err(LienError::Corrupted(format!(
                    "{} corrupt records",
                    report.errors.len()
                ))
                .into());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_commands() {
        let cli = Cli::try_parse_from(["lien-cli", "--data-dir", "/tmp/x", "set", "0a0b", "5ubld"])
            .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Command::Set { address, coins } => {
                assert_eq!(address.to_hex(), "0a0b");
                assert_eq!(coins.amount_of("ubld"), 5);
            }
            _ => panic!("expected set"),
        }

        let cli = Cli::try_parse_from(["lien-cli", "set", "0a0b"]).unwrap();
        assert!(matches!(cli.command, Command::Set { coins, .. } if coins.is_zero()));
    }

    #[test]
    fn cli_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["lien-cli", "get", "not-hex"]).is_err());
        assert!(Cli::try_parse_from(["lien-cli", "set", "0a", "5"]).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lien.toml");
        std::fs::write(&path, "log_level = \"debug\"\nmax_dbs = 6\n").unwrap();
        let cli = Cli::try_parse_from([
            "lien-cli",
            "--config",
            path.to_str().unwrap(),
            "--log-level",
            "warn",
            "list",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.max_dbs, 6);
    }

    #[test]
    fn set_get_export_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = LienConfig {
            data_dir: dir.path().join("db"),
            map_size: 10 * 1024 * 1024,
            ..LienConfig::default()
        };
        let address = Address::from_hex("0a0b").unwrap();
        run(
            Command::Set {
                address: address.clone(),
                coins: "5ubld".parse().unwrap(),
            },
            &config,
        )
        .unwrap();

        let file = dir.path().join("genesis.json");
        run(Command::Export { file: file.clone() }, &config).unwrap();
        let state = GenesisState::from_json(&std::fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(state.liens.len(), 1);

        let other = LienConfig {
            data_dir: dir.path().join("db2"),
            ..config.clone()
        };
        run(Command::Import { file }, &other).unwrap();
        run(Command::Check, &other).unwrap();
        let read_back = |config: &LienConfig| {
            let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)
                .unwrap();
            let rtxn = env.read_txn().unwrap();
            LienKeeper::read_lien(&rtxn, &address).unwrap()
        };
        assert_eq!(read_back(&other).coins, "5ubld".parse().unwrap());

        run(
            Command::Set {
                address: address.clone(),
                coins: Coins::new(),
            },
            &other,
        )
        .unwrap();
        assert!(read_back(&other).is_empty());
    }
}
