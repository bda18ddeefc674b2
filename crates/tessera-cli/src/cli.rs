use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Tessera CLI: issue, verify, and revoke signed store-backed tokens")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file (defaults to tessera.toml if present)
    #[arg(short, long, global = true, env = "TESSERA_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Opaque access tokens
    Oat(OatArgs),
    /// Single-purpose tokens
    Spt(SptArgs),
}

#[derive(clap::Args)]
pub struct OatArgs {
    #[command(subcommand)]
    pub command: OatCommands,
}

#[derive(Subcommand)]
pub enum OatCommands {
    /// Issue a token carrying a payload
    Issue(OatIssueArgs),
    /// Print the payload of a live token
    Verify(OatVerifyArgs),
}

#[derive(clap::Args)]
pub struct OatIssueArgs {
    /// Payload stored for the token (e.g. a session reference)
    pub payload: String,
    /// Store key prefix
    #[arg(long, default_value = "oat:access")]
    pub prefix: String,
    /// Token lifetime (e.g. 30m, 24h); defaults to security.oat_ttl
    #[arg(long, value_parser = parse_ttl)]
    pub ttl: Option<Duration>,
}

#[derive(clap::Args)]
pub struct OatVerifyArgs {
    /// Encoded token
    pub token: String,
    /// Store key prefix the token was issued under
    #[arg(long, default_value = "oat:access")]
    pub prefix: String,
}

#[derive(clap::Args)]
pub struct SptArgs {
    #[command(subcommand)]
    pub command: SptCommands,
}

#[derive(Subcommand)]
pub enum SptCommands {
    /// Issue a token for a payload (e.g. a user id)
    Issue(SptIssueArgs),
    /// Print the payload of a live token
    Verify(SptVerifyArgs),
    /// Revoke every token issued for a payload
    Revoke(SptRevokeArgs),
}

#[derive(clap::Args)]
pub struct SptIssueArgs {
    /// Payload the token stands for; must not contain '.'
    pub payload: String,
    /// Store key prefix (token purpose)
    #[arg(long, default_value = "spt:reset-password")]
    pub prefix: String,
    /// Token lifetime (e.g. 15m); defaults to security.spt_ttl
    #[arg(long, value_parser = parse_ttl)]
    pub ttl: Option<Duration>,
}

#[derive(clap::Args)]
pub struct SptVerifyArgs {
    /// Encoded token
    pub token: String,
    /// Store key prefix the token was issued under
    #[arg(long, default_value = "spt:reset-password")]
    pub prefix: String,
}

#[derive(clap::Args)]
pub struct SptRevokeArgs {
    /// Plaintext payload whose tokens are revoked
    pub payload: String,
    /// Store key prefix the tokens were issued under
    #[arg(long, default_value = "spt:reset-password")]
    pub prefix: String,
}

fn parse_ttl(value: &str) -> Result<Duration, String> {
    let ttl = humantime_serde::re::humantime::parse_duration(value).map_err(|e| e.to_string())?;
    if ttl.is_zero() {
        return Err("ttl must be greater than zero".into());
    }
    Ok(ttl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl("15m").unwrap(), Duration::from_secs(900));
        assert_eq!(parse_ttl("1h 30m").unwrap(), Duration::from_secs(5400));
        assert!(parse_ttl("0s").is_err());
        assert!(parse_ttl("soon").is_err());
    }

    #[test]
    fn test_parse_spt_issue() {
        let cli = Cli::try_parse_from([
            "tessera", "spt", "issue", "user-42", "--prefix", "pwd-reset", "--ttl", "15m",
        ])
        .unwrap();

        let Commands::Spt(SptArgs {
            command: SptCommands::Issue(args),
        }) = cli.command
        else {
            panic!("expected spt issue");
        };
        assert_eq!(args.payload, "user-42");
        assert_eq!(args.prefix, "pwd-reset");
        assert_eq!(args.ttl, Some(Duration::from_secs(900)));
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["tessera", "oat", "verify", "abc"]).unwrap();
        let Commands::Oat(OatArgs {
            command: OatCommands::Verify(args),
        }) = cli.command
        else {
            panic!("expected oat verify");
        };
        assert_eq!(args.prefix, "oat:access");
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from([
            "tessera", "spt", "revoke", "user-1", "--config", "/etc/tessera.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/tessera.toml")));
    }
}
