use clap::Args as ClapArgs;
use secrecy::SecretString;

use crate::config::loader::parse_key_value;
use crate::error::Result;
use crate::export::{ExportRequest, PseudoRule};

use super::completion::dataset_path_completer;
use super::context::CliContext;
use super::prompts::Prompt;

#[derive(ClapArgs, Debug, Clone)]
pub struct ExportArgs {
    /// Path of the dataset to export
    #[arg(value_name = "PATH", add = dataset_path_completer())]
    pub path: String,

    /// Timestamp (epoch millis) of the dataset, resolved against the closest matching version [default: now]
    #[arg(short = 't', long)]
    pub timestamp: Option<i64>,

    /// Where the exported dataset archive will be stored
    #[arg(long, value_name = "PATH", default_value = "")]
    pub target_path: String,

    /// Descriptive name of the contents, used as baseline for the archive name
    #[arg(short = 'n', long, default_value = "")]
    pub name: String,

    /// Password protecting the target archive (prompted for when omitted)
    #[arg(short = 'p', long, hide_env_values = true)]
    pub password: Option<String>,

    /// Depseudonymize data during export
    #[arg(long)]
    pub depseudo: bool,

    /// Pseudonymization rule for matching columns (repeatable)
    #[arg(long = "pseudo-rule", value_name = "PATTERN=FUNC", value_parser = parse_key_value)]
    pub pseudo_rules: Vec<(String, String)>,
}

pub async fn execute(args: &ExportArgs, ctx: &CliContext) -> Result<()> {
    let password = target_password(args, ctx.prompt()).await?;
    let request = build_request(args, password, chrono::Utc::now().timestamp_millis());

    let client = ctx.export_client().await?;
    let response = client.export(&request).await?;
    println!("{}", response.target_uri);
    Ok(())
}

async fn target_password(args: &ExportArgs, prompt: &Prompt) -> Result<SecretString> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => prompt.input("Archive password", true).await?,
    };
    Ok(SecretString::new(password.into()))
}

fn build_request(args: &ExportArgs, password: SecretString, now_millis: i64) -> ExportRequest {
    ExportRequest {
        dataset_path: args.path.clone(),
        dataset_timestamp: args.timestamp.unwrap_or(now_millis),
        column_selectors: Vec::new(),
        target_path: args.target_path.clone(),
        target_content_name: args.name.clone(),
        target_password: password,
        depseudonymize: args.depseudo,
        pseudo_rules: PseudoRule::numbered(&args.pseudo_rules),
    }
}
