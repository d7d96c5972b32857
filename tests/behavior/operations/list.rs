use crate::*;
use dapla_cli::error::Result;
use dapla_cli::listing::normalize;
use dapla_cli::maintenance::{DatasetDirectory, MaintenanceClient};
use libtest_mimic::Trial;
use predicates::prelude::*;

pub fn tests(client: &MaintenanceClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_list_matches_client_listing,
        test_list_missing_path_is_handled
    ));
}

async fn test_list_matches_client_listing(client: MaintenanceClient) -> Result<()> {
    let root = &fixture().root;
    let listing = client.list_children(root).await?;
    let expected: String = normalize(root, &listing)
        .iter()
        .map(|entry| format!("{}\n", entry.path))
        .collect();

    // Not a terminal, so the listing is one plain path per line.
    fixture()
        .dapla_cmd()
        .args(["ls", root])
        .assert()
        .success()
        .stdout(expected);
    Ok(())
}

async fn test_list_missing_path_is_handled(_client: MaintenanceClient) -> Result<()> {
    fixture()
        .dapla_cmd()
        .args(["ls", &fixture().missing_path()])
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Error:").not());
    Ok(())
}
