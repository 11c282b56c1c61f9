//! Command line and run configuration.
//!
//! This is the only place that reads the environment. Everything else gets
//! a [`Config`] built once at startup.

use std::path::PathBuf;
use std::time::Duration;

use bulkreg_chain::{Network, SignerKeys};
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::driver::RetryPolicy;

/// bulkreg - resumable bulk domain registration
#[derive(Debug, Parser)]
#[command(name = "bulkreg")]
#[command(about = "Register domains listed in a CSV file, resuming from a progress file", long_about = None)]
pub struct Cli {
    /// Network to register on (localhost, linea-sepolia, mainnet)
    #[arg(long, env = "NETWORK", default_value = "localhost")]
    pub network: Network,

    /// RPC endpoint; overrides the one derived from the network
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Infura API key for remote networks
    #[arg(long, env = "INFURA_API_KEY", hide_env_values = true)]
    pub infura_api_key: Option<String>,

    /// Private key of the contracts deployer
    #[arg(long, env = "DEPLOYER_PRIVATE_KEY", hide_env_values = true)]
    pub deployer_private_key: Option<String>,

    /// Private key of the registrar controller owner
    #[arg(long, env = "OWNER_PRIVATE_KEY", hide_env_values = true)]
    pub owner_private_key: Option<String>,

    /// Parent name under `.eth` that domains are registered in
    #[arg(long, env = "BASE_DOMAIN")]
    pub base_domain: Option<String>,

    /// Directory holding per-network deployment metadata
    #[arg(long, env = "BULKREG_DEPLOYMENTS_DIR", default_value = "deployments")]
    pub deployments_dir: PathBuf,

    /// CSV file with `domain` and `owner` columns
    #[arg(
        short,
        long,
        global = true,
        env = "BULKREG_INPUT",
        default_value = "domains.csv"
    )]
    pub input: PathBuf,

    /// Progress file tracking every domain's status
    #[arg(
        short,
        long,
        global = true,
        env = "BULKREG_PROGRESS_FILE",
        default_value = "progress.json"
    )]
    pub progress_file: PathBuf,

    /// Attempts per domain within one run
    #[arg(
        long,
        env = "BULKREG_MAX_ATTEMPTS",
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    /// Delay between attempts of the same domain (seconds)
    #[arg(long, env = "BULKREG_RETRY_DELAY_SECS", default_value = "5")]
    pub retry_delay_secs: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Command {
    /// Register every pending domain (default)
    Run,

    /// Show the progress file
    Status,
}

/// Configuration errors. All of them abort before any contract call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {name} is not set (or pass {flag})")]
    Missing {
        name: &'static str,
        flag: &'static str,
    },

    #[error("DEPLOYER_PRIVATE_KEY and OWNER_PRIVATE_KEY must be set together")]
    PartialSigners,

    #[error("Invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Run configuration.
pub struct Config {
    pub network: Network,
    pub rpc_url: String,
    /// `None` on localhost means the node's unlocked accounts sign.
    pub signers: Option<SignerKeys>,
    pub base_domain: String,
    pub deployments_dir: PathBuf,
    pub input_path: PathBuf,
    pub progress_path: PathBuf,
    pub retry: RetryPolicy,
}

impl Config {
    /// Validate the command line and build the run configuration.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let base_domain = non_empty(&cli.base_domain).ok_or(ConfigError::Missing {
            name: "BASE_DOMAIN",
            flag: "--base-domain",
        })?;
        if base_domain.starts_with('.') || base_domain.ends_with('.') {
            return Err(ConfigError::Invalid {
                name: "BASE_DOMAIN",
                message: format!("'{base_domain}' must not start or end with a dot"),
            });
        }

        let rpc_url = match non_empty(&cli.rpc_url) {
            Some(url) => url,
            None => cli
                .network
                .rpc_url(non_empty(&cli.infura_api_key).as_deref())
                .ok_or(ConfigError::Missing {
                    name: "INFURA_API_KEY",
                    flag: "--infura-api-key",
                })?,
        };

        let deployer = non_empty(&cli.deployer_private_key);
        let owner = non_empty(&cli.owner_private_key);
        let signers = match (deployer, owner) {
            (Some(deployer), Some(owner)) => Some(SignerKeys { deployer, owner }),
            (None, None) if !cli.network.is_remote() => None,
            (None, _) if cli.network.is_remote() => {
                return Err(ConfigError::Missing {
                    name: "DEPLOYER_PRIVATE_KEY",
                    flag: "--deployer-private-key",
                })
            }
            (_, None) if cli.network.is_remote() => {
                return Err(ConfigError::Missing {
                    name: "OWNER_PRIVATE_KEY",
                    flag: "--owner-private-key",
                })
            }
            _ => return Err(ConfigError::PartialSigners),
        };

        Ok(Self {
            network: cli.network,
            rpc_url,
            signers,
            base_domain,
            deployments_dir: cli.deployments_dir.clone(),
            input_path: cli.input.clone(),
            progress_path: cli.progress_file.clone(),
            retry: RetryPolicy {
                max_attempts: cli.max_attempts,
                delay: Duration::from_secs(cli.retry_delay_secs),
            },
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            network: Network::Localhost,
            rpc_url: None,
            infura_api_key: None,
            deployer_private_key: None,
            owner_private_key: None,
            base_domain: Some("linea".to_string()),
            deployments_dir: PathBuf::from("deployments"),
            input: PathBuf::from("domains.csv"),
            progress_file: PathBuf::from("progress.json"),
            max_attempts: 1,
            retry_delay_secs: 5,
            command: None,
        }
    }

    fn remote() -> Cli {
        Cli {
            network: Network::LineaSepolia,
            infura_api_key: Some("abc".to_string()),
            deployer_private_key: Some("0x01".to_string()),
            owner_private_key: Some("0x02".to_string()),
            ..cli()
        }
    }

    #[test]
    fn test_localhost_defaults() {
        let config = Config::from_cli(&cli()).unwrap();

        assert_eq!(config.network, Network::Localhost);
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert!(config.signers.is_none());
        assert_eq!(config.base_domain, "linea");
        assert_eq!(config.progress_path, PathBuf::from("progress.json"));
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry.delay, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_base_domain() {
        for base_domain in [None, Some("  ".to_string())] {
            let cli = Cli { base_domain, ..cli() };
            let err = Config::from_cli(&cli).err().unwrap();
            assert!(matches!(err, ConfigError::Missing { name: "BASE_DOMAIN", .. }));
        }
    }

    #[test]
    fn test_base_domain_with_dots() {
        let cli = Cli {
            base_domain: Some("linea.".to_string()),
            ..cli()
        };
        let err = Config::from_cli(&cli).err().unwrap();
        assert!(matches!(err, ConfigError::Invalid { name: "BASE_DOMAIN", .. }));
    }

    #[test]
    fn test_remote_requires_infura_key() {
        let cli = Cli {
            infura_api_key: None,
            ..remote()
        };
        let err = Config::from_cli(&cli).err().unwrap();
        assert!(matches!(err, ConfigError::Missing { name: "INFURA_API_KEY", .. }));
    }

    #[test]
    fn test_remote_requires_both_keys() {
        let cli = Cli {
            owner_private_key: None,
            ..remote()
        };
        let err = Config::from_cli(&cli).err().unwrap();
        assert!(matches!(err, ConfigError::Missing { name: "OWNER_PRIVATE_KEY", .. }));

        let cli = Cli {
            deployer_private_key: Some(String::new()),
            ..remote()
        };
        let err = Config::from_cli(&cli).err().unwrap();
        assert!(matches!(err, ConfigError::Missing { name: "DEPLOYER_PRIVATE_KEY", .. }));
    }

    #[test]
    fn test_remote_full_config() {
        let cli = Cli {
            max_attempts: 3,
            ..remote()
        };
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.rpc_url, "https://linea-sepolia.infura.io/v3/abc");
        assert!(config.signers.is_some());
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_localhost_single_key_rejected() {
        let cli = Cli {
            owner_private_key: Some("0x02".to_string()),
            ..cli()
        };
        let err = Config::from_cli(&cli).err().unwrap();
        assert!(matches!(err, ConfigError::PartialSigners));
    }

    #[test]
    fn test_rpc_url_override() {
        let cli = Cli {
            network: Network::Mainnet,
            infura_api_key: None,
            rpc_url: Some("http://node:8545".to_string()),
            ..remote()
        };
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.rpc_url, "http://node:8545");
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "bulkreg",
            "--network",
            "linea-sepolia",
            "--input",
            "batch.csv",
            "status",
        ])
        .unwrap();
        assert_eq!(cli.network, Network::LineaSepolia);
        assert_eq!(cli.input, PathBuf::from("batch.csv"));
        assert!(matches!(cli.command, Some(Command::Status)));

        assert!(Cli::try_parse_from(["bulkreg", "--max-attempts", "0"]).is_err());
    }

    #[test]
    fn test_retry_from_env() {
        // Only this test sets these variables.
        std::env::set_var("BULKREG_MAX_ATTEMPTS", "4");
        std::env::set_var("BULKREG_RETRY_DELAY_SECS", "12");
        let cli = Cli::try_parse_from(["bulkreg"]);
        std::env::remove_var("BULKREG_MAX_ATTEMPTS");
        std::env::remove_var("BULKREG_RETRY_DELAY_SECS");

        let cli = cli.unwrap();
        assert_eq!(cli.max_attempts, 4);
        assert_eq!(cli.retry_delay_secs, 12);
    }

    #[test]
    fn test_paths_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bulkreg",
            "status",
            "-p",
            "other.json",
            "--input",
            "batch.csv",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Command::Status)));
        assert_eq!(cli.progress_file, PathBuf::from("other.json"));
        assert_eq!(cli.input, PathBuf::from("batch.csv"));
    }
}
