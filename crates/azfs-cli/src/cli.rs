use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "azfs",
    about = "Browse and manage blob storage as a directory tree",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Storage account name
    #[arg(long, global = true, env = "AZURE_STORAGE_ACCOUNT")]
    pub account: Option<String>,

    /// Storage account access key
    #[arg(long, global = true, env = "AZURE_STORAGE_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Directory holding the local store; each account gets a subdirectory
    #[arg(long, global = true, env = "AZFS_ROOT")]
    pub root: Option<PathBuf>,

    /// TOML file with `account`, `access_key` and `root` defaults
    #[arg(long, global = true, env = "AZFS_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a container
    Mkdir(RemoteArgs),
    /// List containers
    Lsdir(LsdirArgs),
    /// Remove a container, or every blob under a directory
    Rmdir(RemoteArgs),
    /// Upload a local file
    Put(PutArgs),
    /// Download a blob to a local file
    Get(GetArgs),
    /// Delete a blob
    #[command(alias = "delete")]
    Rm(RemoteArgs),
    /// List a directory
    Ls(RemoteArgs),
    /// Print the normalized directory path
    Chdir(RemoteArgs),
}

#[derive(Args)]
pub struct RemoteArgs {
    /// Virtual path: container[/key]
    pub remote: String,
}

#[derive(Args)]
pub struct LsdirArgs {}

#[derive(Args)]
pub struct PutArgs {
    pub local: PathBuf,
    pub remote: String,
}

#[derive(Args)]
pub struct GetArgs {
    pub remote: String,
    pub local: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        let cmd = Cli::command();
        cmd.clone().debug_assert();
        let about = cmd.get_about().map(|a| a.to_string()).unwrap_or_default();
        assert!(about.starts_with("Browse"));
        assert!(about.is_ascii());
    }

    #[test]
    fn parse_mkdir() {
        let cli = Cli::try_parse_from(["azfs", "mkdir", "photos"]).unwrap();
        if let Command::Mkdir(args) = cli.command {
            assert_eq!(args.remote, "photos");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_lsdir() {
        let cli = Cli::try_parse_from(["azfs", "lsdir"]).unwrap();
        assert!(matches!(cli.command, Command::Lsdir(_)));
    }

    #[test]
    fn parse_put() {
        let cli = Cli::try_parse_from(["azfs", "put", "./a.txt", "C/docs/a.txt"]).unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.local, PathBuf::from("./a.txt"));
            assert_eq!(args.remote, "C/docs/a.txt");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_get() {
        let cli = Cli::try_parse_from(["azfs", "get", "C/k", "out.bin"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.remote, "C/k");
            assert_eq!(args.local, PathBuf::from("out.bin"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_delete_alias() {
        let cli = Cli::try_parse_from(["azfs", "delete", "C/k"]).unwrap();
        assert!(matches!(cli.command, Command::Rm(_)));
        let cli = Cli::try_parse_from(["azfs", "rm", "C/k"]).unwrap();
        assert!(matches!(cli.command, Command::Rm(_)));
    }

    #[test]
    fn parse_credentials_flags() {
        let cli = Cli::try_parse_from([
            "azfs", "--account", "acct", "--access-key", "secret", "ls", "C",
        ])
        .unwrap();
        assert_eq!(cli.account.as_deref(), Some("acct"));
        assert_eq!(cli.access_key.as_deref(), Some("secret"));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "azfs", "ls", "C", "-v", "--format", "json", "--root", "/tmp/s",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/s")));
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::try_parse_from(["azfs", "--config", "azfs.toml", "lsdir"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("azfs.toml")));
    }

    #[test]
    fn missing_operand_is_rejected() {
        assert!(Cli::try_parse_from(["azfs", "put", "only-local"]).is_err());
        assert!(Cli::try_parse_from(["azfs", "frobnicate"]).is_err());
    }
}
