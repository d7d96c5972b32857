use std::env;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Request};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use snafu::ResultExt;

use crate::error::{Error, Result, TransportSnafu};
use crate::http::execute_json;

use super::loader::ResolvedConfig;

pub const JUPYTERHUB_TOKEN_URL_ENV: &str = "JUPYTERHUB_HANDLER_CUSTOM_AUTH_URL";
pub const JUPYTERHUB_API_TOKEN_ENV: &str = "JUPYTERHUB_API_TOKEN";

/// Where the user's bearer token comes from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    Explicit(SecretString),
    Jupyter { url: String, api_token: SecretString },
}

impl TokenSource {
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        Self::from_source(config, &|key| env::var(key).ok())
    }

    fn from_source(config: &ResolvedConfig, get: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        match (config.jupyter, config.authtoken.as_ref()) {
            (true, Some(_)) => Err(Error::AuthConflict),
            (false, Some(token)) => Ok(TokenSource::Explicit(token.clone())),
            (true, None) => {
                let required = |key: &str| {
                    get(key)
                        .filter(|v| !v.trim().is_empty())
                        .ok_or_else(|| Error::MissingEnvVar {
                            key: key.to_string(),
                        })
                };
                let url = required(JUPYTERHUB_TOKEN_URL_ENV)?;
                let api_token = required(JUPYTERHUB_API_TOKEN_ENV)?;
                Ok(TokenSource::Jupyter {
                    url,
                    api_token: SecretString::new(api_token.into()),
                })
            }
            (false, None) => Err(Error::MissingAuthToken),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TokenSource::Explicit(_) => "explicit",
            TokenSource::Jupyter { .. } => "jupyter",
        }
    }

    /// Produce the bearer token, asking JupyterHub when configured to.
    pub async fn token(&self, http: &Client) -> Result<SecretString> {
        match self {
            TokenSource::Explicit(token) => Ok(token.clone()),
            TokenSource::Jupyter { url, api_token } => {
                log::debug!("fetching auth token from jupyterhub url={}", url);
                let request = jupyter_token_request(http, url, api_token)?;
                let response: JupyterToken = execute_json(http, request).await?;
                Ok(SecretString::new(response.access_token.into()))
            }
        }
    }
}

#[derive(Deserialize)]
struct JupyterToken {
    access_token: String,
}

fn jupyter_token_request(http: &Client, url: &str, api_token: &SecretString) -> Result<Request> {
    http.get(url)
        .header(AUTHORIZATION, format!("token {}", api_token.expose_secret()))
        .build()
        .context(TransportSnafu { url })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(jupyter: bool, token: Option<&str>) -> ResolvedConfig {
        ResolvedConfig {
            jupyter,
            authtoken: token.map(|t| SecretString::new(t.into())),
            ..Default::default()
        }
    }

    fn jupyter_env(key: &str) -> Option<String> {
        match key {
            JUPYTERHUB_TOKEN_URL_ENV => Some("http://server.com/foo/bar/token".to_string()),
            JUPYTERHUB_API_TOKEN_ENV => Some("the api token".to_string()),
            _ => None,
        }
    }

    #[test]
    fn explicit_token_is_used() {
        let source = TokenSource::from_source(&config(false, Some("abc")), &|_| None).unwrap();
        match source {
            TokenSource::Explicit(token) => assert_eq!(token.expose_secret(), "abc"),
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn jupyter_and_token_conflict() {
        let err = TokenSource::from_source(&config(true, Some("abc")), &jupyter_env).unwrap_err();
        assert!(matches!(err, Error::AuthConflict));
    }

    #[test]
    fn no_source_is_an_error() {
        let err = TokenSource::from_source(&config(false, None), &|_| None).unwrap_err();
        assert!(matches!(err, Error::MissingAuthToken));
    }

    #[test]
    fn jupyter_requires_environment() {
        let err = TokenSource::from_source(&config(true, None), &|_| None).unwrap_err();
        assert!(matches!(err, Error::MissingEnvVar { key } if key == JUPYTERHUB_TOKEN_URL_ENV));
    }

    #[test]
    fn jupyter_request_uses_api_token() {
        let source = TokenSource::from_source(&config(true, None), &jupyter_env).unwrap();
        assert_eq!(source.describe(), "jupyter");
        let TokenSource::Jupyter { url, api_token } = source else {
            panic!("expected jupyter source");
        };

        let request = jupyter_token_request(&Client::new(), &url, &api_token).unwrap();
        assert_eq!(request.url().as_str(), "http://server.com/foo/bar/token");
        assert_eq!(
            request.headers()[AUTHORIZATION].to_str().unwrap(),
            "token the api token"
        );
    }

    #[test]
    fn decodes_token_response() {
        let token: JupyterToken =
            serde_json::from_str(r#"{ "access_token": "the access token"}"#).unwrap();
        assert_eq!(token.access_token, "the access token");
    }

    #[tokio::test]
    async fn explicit_token_needs_no_request() {
        let source = TokenSource::Explicit(SecretString::new("abc".into()));
        let token = source.token(&Client::new()).await.unwrap();
        assert_eq!(token.expose_secret(), "abc");
    }
}
