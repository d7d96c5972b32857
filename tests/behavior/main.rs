mod utils;

mod operations;

pub use utils::*;

use libtest_mimic::{Arguments, Trial};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Arguments::from_args();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let mut tests: Vec<Trial> = Vec::new();
    match init_test_service() {
        Some(client) => {
            operations::list::tests(&client, &mut tests);
            operations::remove::tests(&client, &mut tests);
        }
        None => eprintln!("DAPLA_BEHAVIOR_MAINTENANCE_URL not set, skipping behavior trials"),
    }

    libtest_mimic::run(&args, tests).exit();
}
