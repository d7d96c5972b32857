use dapla_cli::error::Result;
use dapla_cli::maintenance::{DatasetDirectory, MaintenanceClient, PathEntry};
use libtest_mimic::{Failed, Trial};
use reqwest::Client;
use secrecy::SecretString;
use std::env;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

const MAINTENANCE_URL_ENV: &str = "DAPLA_BEHAVIOR_MAINTENANCE_URL";
const AUTHTOKEN_ENV: &str = "DAPLA_BEHAVIOR_AUTHTOKEN";
const ROOT_ENV: &str = "DAPLA_BEHAVIOR_ROOT";

pub static TEST_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
});

pub struct Fixture {
    pub maintenance_url: String,
    pub authtoken: String,
    pub root: String,
}

impl Fixture {
    fn from_env() -> Option<Self> {
        let maintenance_url = env::var(MAINTENANCE_URL_ENV).ok()?;
        Some(Self {
            maintenance_url,
            authtoken: env::var(AUTHTOKEN_ENV).unwrap_or_else(|_| "behavior".to_string()),
            root: env::var(ROOT_ENV).unwrap_or_else(|_| "/".to_string()),
        })
    }

    /// A path below the root that no dataset should live at.
    pub fn missing_path(&self) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        format!("{}/behavior-missing-{nanos}", self.root.trim_end_matches('/'))
    }

    /// `dapla` pointed at the maintenance API under test.
    pub fn dapla_cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("dapla").unwrap();
        cmd.env_remove("DAPLA_CONFIG")
            .env_remove("DAPLA_JUPYTER")
            .env("DAPLA_AUTHTOKEN", &self.authtoken)
            .arg("--api")
            .arg(format!("data-maintenance={}", self.maintenance_url));
        cmd
    }
}

pub static TEST_FIXTURE: LazyLock<Option<Fixture>> = LazyLock::new(Fixture::from_env);

pub fn fixture() -> &'static Fixture {
    TEST_FIXTURE
        .as_ref()
        .expect("behavior trials only run with a configured fixture")
}

pub fn init_test_service() -> Option<MaintenanceClient> {
    let fixture = TEST_FIXTURE.as_ref()?;
    Some(MaintenanceClient::new(
        Client::new(),
        fixture.maintenance_url.clone(),
        SecretString::new(fixture.authtoken.clone().into()),
    ))
}

/// First dataset directly under `root`, if any.
pub async fn first_dataset(client: &MaintenanceClient, root: &str) -> Result<Option<PathEntry>> {
    let listing = client.list_children(root).await?;
    Ok(listing.into_iter().find(PathEntry::is_dataset))
}

pub fn build_async_trial<F, Fut>(name: &str, client: &MaintenanceClient, f: F) -> Trial
where
    F: FnOnce(MaintenanceClient) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<()>>,
{
    let handle = TEST_RUNTIME.handle().clone();
    let client = client.clone();

    Trial::test(format!("behavior::{name}"), move || {
        handle
            .block_on(f(client))
            .map_err(|err| Failed::from(err.to_string()))
    })
}

#[macro_export]
macro_rules! async_trials {
    ($client:ident, $($test:ident),*) => {
        vec![$(
            build_async_trial(stringify!($test), $client, $test),
        )*]
    };
}
