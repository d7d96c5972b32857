use snafu::Snafu;
use std::path::PathBuf;
use toml::de::Error as TomlDeError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A well-formed HTTP error response: access denied, not found and friends.
    #[snafu(display("{message} ({status})"))]
    Rejected { status: u16, message: String },

    #[snafu(display("Request to '{url}' failed: {source}"))]
    Transport { url: String, source: reqwest::Error },

    #[snafu(display("Malformed response from '{url}': {source}"))]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("Unable to determine API URL for {api}. Hint: set it in the config file or pass --api {api}=URL"))]
    MissingApiUrl { api: String },

    #[snafu(display("Unable to resolve {api} API URL from environment variable {var}"))]
    UnresolvedApiUrl { api: String, var: String },

    #[snafu(display("Environment variable '{key}' is required but not found"))]
    MissingEnvVar { key: String },

    #[snafu(display("Cannot use both --jupyter and --authtoken"))]
    AuthConflict,

    #[snafu(display(
        "Unable to find auth token. Either retrieve it from jupyter (--jupyter) or provide it via --authtoken, $DAPLA_AUTHTOKEN or the config file"
    ))]
    MissingAuthToken,

    #[snafu(display("Failed to read config file '{}': {source}", path.display()))]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to parse config file '{}': {source}", path.display()))]
    ConfigParse { path: PathBuf, source: TomlDeError },

    #[snafu(display("Invalid path: {path}"))]
    InvalidPath { path: String },

    #[snafu(display("Invalid argument: {message}"))]
    InvalidArgument { message: String },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    #[snafu(display("JSON serialization error: {source}"))]
    Json { source: serde_json::Error },
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json { source: error }
    }
}

impl Error {
    pub fn non_interactive(action: &str) -> Self {
        Error::InvalidArgument {
            message: format!(
                "{action} requires interactive input. Hint: rerun without --non-interactive or supply the needed flags (e.g. --yes, --password)."
            ),
        }
    }

    /// Process exit code for this error. A rejection from the remote side is an
    /// expected outcome for scripts and exits with 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Rejected { .. } => 0,
            _ => 1,
        }
    }

    /// Whether the error came back from one of the remote services.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Rejected { .. } | Error::Transport { .. } | Error::Decode { .. }
        )
    }
}
