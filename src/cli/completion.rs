use std::ffi::OsStr;
use std::io;

use clap::{Args as ClapArgs, CommandFactory};
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate};
use clap_complete::{Shell, generate};
use reqwest::Client;

use crate::config::loader::{ConfigRequest, resolve};
use crate::config::{DATA_MAINTENANCE, TokenSource, api_url};
use crate::error::Result;
use crate::listing::SEPARATOR;
use crate::maintenance::{DatasetDirectory, MaintenanceClient, PathEntry};

use super::entry::Args;

const BIN_NAME: &str = "dapla";

#[derive(ClapArgs, Debug, Clone)]
#[command(after_help = "Dataset paths complete against the data-maintenance API when the \
    shell is set up with `source <(COMPLETE=bash dapla)` (or zsh, fish, powershell).")]
pub struct CompletionArgs {
    /// Shell to generate the completion script for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn execute(args: &CompletionArgs) -> Result<()> {
    let mut command = Args::command();
    generate(args.shell, &mut command, BIN_NAME, &mut io::stdout());
    Ok(())
}

/// Completer attached to every dataset path argument.
pub fn dataset_path_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(complete_dataset_path)
}

fn complete_dataset_path(current: &OsStr) -> Vec<CompletionCandidate> {
    let Some(partial) = current.to_str() else {
        return Vec::new();
    };

    let suggestions = match local_suggestions(partial) {
        Some(suggestions) => suggestions,
        None => remote_suggestions(partial).unwrap_or_else(|err| {
            log::debug!("path completion failed partial={} error={}", partial, err);
            Vec::new()
        }),
    };
    suggestions.into_iter().map(CompletionCandidate::new).collect()
}

/// Suggestions that need no remote listing: an empty word and a missing root separator.
fn local_suggestions(partial: &str) -> Option<Vec<String>> {
    if partial.is_empty() {
        Some(vec![SEPARATOR.to_string()])
    } else if !partial.starts_with(SEPARATOR) {
        Some(vec![format!("{SEPARATOR}{partial}")])
    } else {
        None
    }
}

fn remote_suggestions(partial: &str) -> Result<Vec<String>> {
    let config = resolve(ConfigRequest::default())?;
    let base_url = api_url(&config, DATA_MAINTENANCE)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let http = Client::new();
        let token = TokenSource::from_config(&config)?.token(&http).await?;
        let client = MaintenanceClient::new(http, base_url, token);
        complete_path(&client, partial).await
    })
}

/// Completions for a partially typed dataset path.
///
/// The parent of `partial` is listed and entries whose last segment starts with
/// the typed remainder are offered. An exact match of an entry lists that entry's
/// children instead. Folders are offered with a trailing separator.
pub async fn complete_path<D: DatasetDirectory>(
    directory: &D,
    partial: &str,
) -> Result<Vec<String>> {
    if let Some(suggestions) = local_suggestions(partial) {
        return Ok(suggestions);
    }
    if partial == "/" {
        return Ok(suggestions(&directory.list_children(partial).await?));
    }

    let (parent, typed) = partial.rsplit_once(SEPARATOR).unwrap_or(("", partial));
    let parent = if parent.is_empty() { "/" } else { parent };
    let listing = directory.list_children(parent).await?;

    if listing
        .iter()
        .any(|entry| entry.path.trim_end_matches(SEPARATOR) == partial)
    {
        return Ok(suggestions(&directory.list_children(partial).await?));
    }

    let matches: Vec<PathEntry> = listing
        .into_iter()
        .filter(|entry| last_segment(&entry.path).starts_with(typed))
        .collect();
    Ok(suggestions(&matches))
}

fn last_segment(path: &str) -> &str {
    let path = path.trim_end_matches(SEPARATOR);
    path.rsplit_once(SEPARATOR).map_or(path, |(_, last)| last)
}

fn suggestions(entries: &[PathEntry]) -> Vec<String> {
    entries.iter().map(suggestion).collect()
}

fn suggestion(entry: &PathEntry) -> String {
    let path = entry.path.trim_end_matches(SEPARATOR);
    if entry.is_folder() {
        format!("{path}{SEPARATOR}")
    } else {
        path.to_string()
    }
}
