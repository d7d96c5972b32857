use crate::*;
use dapla_cli::error::Result;
use dapla_cli::format::{DRY_RUN_NOTICE, NO_DATASETS_NOTICE};
use dapla_cli::listing::qualify;
use dapla_cli::maintenance::{DatasetDirectory, MaintenanceClient};
use libtest_mimic::Trial;
use predicates::prelude::*;

pub fn tests(client: &MaintenanceClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_rm_dry_run_keeps_dataset,
        test_rm_recursive_dry_run_declined,
        test_rm_recursive_empty_folder
    ));
}

async fn test_rm_dry_run_keeps_dataset(client: MaintenanceClient) -> Result<()> {
    let root = &fixture().root;
    let Some(dataset) = first_dataset(&client, root).await? else {
        return Ok(());
    };
    let path = qualify(root, &dataset.path);

    fixture()
        .dapla_cmd()
        .args(["rm", "--dry-run", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("successfully deleted"))
        .stdout(predicate::str::contains(DRY_RUN_NOTICE));

    let listing = client.list_children(root).await?;
    assert!(listing.iter().any(|entry| entry.path == dataset.path));
    Ok(())
}

async fn test_rm_recursive_dry_run_declined(client: MaintenanceClient) -> Result<()> {
    let root = &fixture().root;
    if first_dataset(&client, root).await?.is_none() {
        return Ok(());
    }

    fixture()
        .dapla_cmd()
        .args(["rm", "-r", "--dry-run", root])
        .write_stdin("n\n".repeat(1000))
        .assert()
        .success()
        .stdout(predicate::str::contains("Delete dataset"))
        .stdout(predicate::str::contains("... skipped"))
        .stdout(predicate::str::contains("successfully deleted").not());
    Ok(())
}

async fn test_rm_recursive_empty_folder(_client: MaintenanceClient) -> Result<()> {
    fixture()
        .dapla_cmd()
        .args(["rm", "-r", "--yes", &fixture().missing_path()])
        .assert()
        .code(0)
        .stdout(missing_folder_outcome());
    Ok(())
}

/// An unknown folder is either listed as empty or rejected with a 4xx status.
fn missing_folder_outcome() -> impl Predicate<str> {
    let notice = NO_DATASETS_NOTICE.replace('.', r"\.");
    predicate::str::is_match(format!(r"^(?s:{notice}|.+ \(4\d\d\))\n$"))
        .expect("outcome pattern is a valid regex")
}
