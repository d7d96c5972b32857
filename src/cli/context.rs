use reqwest::Client;
use secrecy::SecretString;

use crate::config::loader::{ConfigRequest, ResolvedConfig, resolve};
use crate::config::{DATA_MAINTENANCE, PSEUDO_SERVICE, TokenSource, api_url};
use crate::error::{Error, Result};
use crate::export::ExportClient;
use crate::maintenance::MaintenanceClient;

use super::entry::{Args, Command, GlobalOptions};
use super::prompts::Prompt;

pub struct CliContext {
    options: GlobalOptions,
    command: Command,
    resolved: ResolvedConfig,
    prompt: Prompt,
    http: Client,
}

impl CliContext {
    pub fn from_args(args: Args, prompt: Prompt) -> Result<Self> {
        let request = ConfigRequest {
            config_path: args.global.config.clone(),
            authtoken: args
                .global
                .authtoken
                .as_ref()
                .filter(|token| !token.trim().is_empty())
                .map(|token| SecretString::new(token.clone().into())),
            jupyter: args.global.jupyter,
            debug: args.global.debug,
            api_overrides: args.global.apis.clone(),
        };

        let resolved = resolve(request)?;
        log::debug!(
            "resolved config path={} loaded={} jupyter={} apis={:?}",
            resolved.config_path.display(),
            resolved.config_loaded,
            resolved.jupyter,
            resolved.apis
        );

        Ok(Self {
            options: args.global,
            command: args.command,
            resolved,
            prompt,
            http: Client::new(),
        })
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn resolved(&self) -> &ResolvedConfig {
        &self.resolved
    }

    pub fn is_debug(&self) -> bool {
        self.resolved.debug
    }

    pub fn is_non_interactive(&self) -> bool {
        self.options.non_interactive
    }

    pub fn ensure_interactive(&self, action: &str) -> Result<()> {
        if self.is_non_interactive() {
            Err(Error::non_interactive(action))
        } else {
            Ok(())
        }
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    async fn auth_token(&self) -> Result<SecretString> {
        let source = TokenSource::from_config(&self.resolved)?;
        log::debug!("auth token source={}", source.describe());
        source.token(&self.http).await
    }

    /// Client for the data-maintenance API. The URL is checked before any token is fetched.
    pub async fn maintenance_client(&self) -> Result<MaintenanceClient> {
        let base_url = api_url(&self.resolved, DATA_MAINTENANCE)?;
        let token = self.auth_token().await?;
        Ok(MaintenanceClient::new(self.http.clone(), base_url, token))
    }

    pub async fn export_client(&self) -> Result<ExportClient> {
        let base_url = api_url(&self.resolved, PSEUDO_SERVICE)?;
        let token = self.auth_token().await?;
        Ok(ExportClient::new(self.http.clone(), base_url, token))
    }
}
