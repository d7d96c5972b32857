use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::config::loader::parse_key_value;
use crate::error::Result;

use super::{
    completion::{self, CompletionArgs},
    context::CliContext,
    datasets::{self, LsArgs, RmArgs},
    doctor,
    export::{self, ExportArgs},
    prompts::Prompt,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dapla",
    version = env!("CARGO_PKG_VERSION"),
    about = "Command-line client for managing datasets on the dapla platform",
    long_about = "List, delete and export datasets through the dapla data-maintenance and pseudo services."
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file (default: ~/.config/dapla-cli/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
    /// Override an API base URL, e.g. data-maintenance=http://localhost:10200
    #[arg(
        long = "api",
        value_name = "NAME=URL",
        value_parser = parse_key_value,
        global = true
    )]
    pub apis: Vec<(String, String)>,
    /// Fetch the auth token from JupyterHub
    #[arg(long, global = true)]
    pub jupyter: bool,
    /// Auth token used against the dapla APIs
    #[arg(long, value_name = "TOKEN", global = true, hide_env_values = true)]
    pub authtoken: Option<String>,
    /// Print debug information
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,
    /// Disable interactive prompts (fail fast when input is required)
    #[arg(long, global = true)]
    pub non_interactive: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the datasets and folders under a path
    Ls(LsArgs),
    /// Delete all versions of a dataset, or every dataset under a folder with --recursive
    Rm(RmArgs),
    /// Export (and optionally depseudonymize) a dataset
    Export(ExportArgs),
    /// Show version, effective configuration and API endpoints
    Doctor,
    /// Generate a shell completion script
    Completion(CompletionArgs),
}

/// Run a command and return the process exit code it asks for.
pub async fn run(args: Args) -> Result<i32> {
    run_with_prompt(args, None).await
}

pub async fn run_with_prompt(args: Args, prompt: Option<Prompt>) -> Result<i32> {
    if let Command::Completion(cmd) = &args.command {
        return completion::execute(cmd).map(|_| 0);
    }

    let prompt = prompt.unwrap_or_else(|| Prompt::new(!args.global.non_interactive));
    let ctx = CliContext::from_args(args, prompt)?;
    match ctx.command() {
        Command::Ls(cmd) => datasets::list(cmd, &ctx).await.map(|_| 0),
        Command::Rm(cmd) => datasets::remove(cmd, &ctx).await,
        Command::Export(cmd) => export::execute(cmd, &ctx).await.map(|_| 0),
        Command::Doctor => doctor::execute(&ctx),
        Command::Completion(cmd) => completion::execute(cmd).map(|_| 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rm_flags() {
        let args = Args::try_parse_from([
            "dapla",
            "rm",
            "-r",
            "--dry-run",
            "--yes",
            "/skatt/person",
            "/skatt/bedrift",
        ])
        .unwrap();
        let Command::Rm(rm) = args.command else {
            panic!("expected rm");
        };
        assert!(rm.recursive);
        assert!(rm.dry_run);
        assert!(rm.yes);
        assert!(!rm.keep_going);
        assert_eq!(rm.paths, ["/skatt/person", "/skatt/bedrift"]);
    }

    #[test]
    fn global_options_after_subcommand() {
        let args = Args::try_parse_from([
            "dapla",
            "ls",
            "-l",
            "/skatt",
            "--api",
            "data-maintenance=http://localhost:10200",
            "-d",
        ])
        .unwrap();
        assert!(args.global.debug);
        assert_eq!(
            args.global.apis,
            [(
                "data-maintenance".to_string(),
                "http://localhost:10200".to_string()
            )]
        );
        assert!(matches!(args.command, Command::Ls(LsArgs { long: true, .. })));
    }

    #[test]
    fn paths_are_required() {
        assert!(Args::try_parse_from(["dapla", "ls"]).is_err());
        assert!(Args::try_parse_from(["dapla", "rm", "-r"]).is_err());
    }

    #[test]
    fn export_collects_rules_in_order() {
        let args = Args::try_parse_from([
            "dapla",
            "export",
            "/skatt/person",
            "--password",
            "pw",
            "--pseudo-rule",
            "**/fnr=fpe-fnr(secret1)",
            "--pseudo-rule",
            "**/navn=fpe-anychar(secret1)",
        ])
        .unwrap();
        let Command::Export(export) = args.command else {
            panic!("expected export");
        };
        assert_eq!(export.pseudo_rules[0].0, "**/fnr");
        assert_eq!(export.pseudo_rules[1].1, "fpe-anychar(secret1)");
        assert_eq!(export.timestamp, None);
    }

    #[test]
    fn completion_takes_a_shell() {
        let args = Args::try_parse_from(["dapla", "completion", "zsh"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Completion(CompletionArgs {
                shell: clap_complete::Shell::Zsh
            })
        ));
        assert!(Args::try_parse_from(["dapla", "completion", "tcsh"]).is_err());
    }
}
