use std::io::{self, Write};

use clap::Args as ClapArgs;

use crate::confirm::{AssumeYes, Confirm, ReaderConfirm};
use crate::error::{Error, Result};
use crate::format::{ListFormat, write_listing};
use crate::listing::normalize;
use crate::maintenance::{DatasetDirectory, MaintenanceClient};
use crate::remove::{ErrorPolicy, RemoveOptions, Remover};

use super::completion::dataset_path_completer;
use super::context::CliContext;

fn parse_validated_path(path_str: &str) -> Result<String> {
    if path_str.trim().is_empty() {
        Err(Error::InvalidPath {
            path: path_str.to_string(),
        })
    } else {
        Ok(path_str.to_string())
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LsArgs {
    /// Path(s) to list
    #[arg(
        value_name = "PATH",
        required = true,
        value_parser = parse_validated_path,
        add = dataset_path_completer()
    )]
    pub paths: Vec<String>,

    /// Show author, creation time, type, valuation and state (terminal only)
    #[arg(short = 'l', long)]
    pub long: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RmArgs {
    /// Dataset or folder path(s) to delete
    #[arg(
        value_name = "PATH",
        required = true,
        value_parser = parse_validated_path,
        add = dataset_path_completer()
    )]
    pub paths: Vec<String>,

    /// Delete every dataset under the given folder(s), asking for each one
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Report what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Delete without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Report failing datasets and folders and carry on with the rest
    #[arg(long)]
    pub keep_going: bool,
}

pub async fn list(args: &LsArgs, ctx: &CliContext) -> Result<()> {
    let client = ctx.maintenance_client().await?;
    let format = ListFormat::detect(args.long);
    list_with(&client, &args.paths, format, io::stdout()).await
}

async fn list_with<D: DatasetDirectory, W: Write>(
    directory: &D,
    paths: &[String],
    format: ListFormat,
    mut out: W,
) -> Result<()> {
    for path in paths {
        let listing = directory.list_children(path).await?;
        let listing = normalize(path, &listing);
        write_listing(&mut out, &listing, format, format.is_terminal())?;
    }
    out.flush()?;
    Ok(())
}

/// Run `rm` and return the exit code of the run.
pub async fn remove(args: &RmArgs, ctx: &CliContext) -> Result<i32> {
    if args.recursive && !args.yes {
        ctx.ensure_interactive("rm --recursive")?;
    }

    let client = ctx.maintenance_client().await?;
    let options = RemoveOptions {
        recursive: args.recursive,
        dry_run: args.dry_run,
        debug: ctx.is_debug(),
        on_error: if args.keep_going {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        },
    };

    if args.yes {
        remove_with(&client, AssumeYes, options, &args.paths).await
    } else {
        remove_with(&client, ReaderConfirm::new(io::stdin()), options, &args.paths).await
    }
}

async fn remove_with<C: Confirm>(
    client: &MaintenanceClient,
    confirm: C,
    options: RemoveOptions,
    paths: &[String],
) -> Result<i32> {
    let summary = Remover::new(client, confirm, io::stdout(), options)
        .run(paths)
        .await?;
    log::debug!(
        "rm finished confirmations={} deleted={} skipped={} failures={}",
        summary.confirmations,
        summary.deleted,
        summary.skipped,
        summary.failures
    );
    Ok(summary.exit_code)
}
