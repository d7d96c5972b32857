//! The `rm` workflow: single-path and recursive dataset deletion.

use std::io::Write;

use crate::confirm::Confirm;
use crate::error::{Error, Result};
use crate::format::{NO_DATASETS_NOTICE, write_delete_outcome};
use crate::listing::qualify;
use crate::maintenance::DatasetDirectory;

/// What happens when a remote call fails partway through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the whole command at the first failure.
    #[default]
    Abort,
    /// Report the failure and carry on with the next dataset or folder.
    Continue,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOptions {
    pub recursive: bool,
    pub dry_run: bool,
    pub debug: bool,
    pub on_error: ErrorPolicy,
}

/// Tally of one `rm` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveSummary {
    pub confirmations: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub failures: usize,
    /// Highest exit code among the failures reported under [`ErrorPolicy::Continue`].
    pub exit_code: i32,
}

/// Walks remote paths and deletes datasets, writing progress to `out`.
///
/// Recursive mode lists one directory level per remote call and visits
/// entries depth-first in the order the listing returned them. Every dataset
/// goes through `confirm` before its delete call.
pub struct Remover<'a, D, C, W> {
    directory: &'a D,
    confirm: C,
    out: W,
    options: RemoveOptions,
    summary: RemoveSummary,
}

impl<'a, D, C, W> Remover<'a, D, C, W>
where
    D: DatasetDirectory,
    C: Confirm,
    W: Write,
{
    pub fn new(directory: &'a D, confirm: C, out: W, options: RemoveOptions) -> Self {
        Self {
            directory,
            confirm,
            out,
            options,
            summary: RemoveSummary::default(),
        }
    }

    /// Remove each of `paths` in order.
    pub async fn run(mut self, paths: &[String]) -> Result<RemoveSummary> {
        for path in paths {
            if self.options.recursive {
                self.remove_tree(path).await?;
            } else {
                self.remove_dataset(path).await?;
            }
        }
        self.out.flush()?;
        Ok(self.summary)
    }

    /// Delete exactly one dataset and report the outcome.
    pub async fn remove_dataset(&mut self, path: &str) -> Result<()> {
        log::debug!(
            "remove_dataset path={} dry_run={}",
            path,
            self.options.dry_run
        );
        match self
            .directory
            .delete_versions(path, self.options.dry_run)
            .await
        {
            Ok(outcome) => {
                write_delete_outcome(
                    &mut self.out,
                    &outcome,
                    self.options.debug,
                    self.options.dry_run,
                )?;
                self.summary.deleted += 1;
                Ok(())
            }
            Err(err) => self.fail(path, err),
        }
    }

    /// Delete every dataset reachable under `path`, asking before each one.
    pub async fn remove_tree(&mut self, path: &str) -> Result<()> {
        let listing = match self.directory.list_children(path).await {
            Ok(listing) => listing,
            Err(err) => return self.fail(path, err),
        };
        log::debug!("remove_tree path={} entries={}", path, listing.len());

        if listing.is_empty() {
            writeln!(self.out, "{NO_DATASETS_NOTICE}")?;
            return Ok(());
        }

        for entry in &listing {
            let child = qualify(path, &entry.path);
            if entry.is_folder() {
                Box::pin(self.remove_tree(&child)).await?;
                continue;
            }

            self.summary.confirmations += 1;
            if self.confirm.confirm(&child, &mut self.out).await? {
                self.remove_dataset(&child).await?;
            } else {
                self.summary.skipped += 1;
            }
        }
        Ok(())
    }

    fn fail(&mut self, path: &str, err: Error) -> Result<()> {
        match self.options.on_error {
            ErrorPolicy::Abort => Err(err),
            ErrorPolicy::Continue => {
                log::warn!("remove failed path={} error={}", path, err);
                writeln!(self.out, "{err}")?;
                self.summary.failures += 1;
                self.summary.exit_code = self.summary.exit_code.max(err.exit_code());
                Ok(())
            }
        }
    }
}
