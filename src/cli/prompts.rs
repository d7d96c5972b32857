use std::io;

use dialoguer::{Input, Password};
use tokio::task;

use crate::error::{Error, Result};

/// Interactive prompt mode for CLI operations
#[derive(Debug, Clone, Copy, Default)]
pub enum Prompt {
    /// Console-based interactive prompts using dialoguer
    #[default]
    Console,
    /// Non-interactive mode that fails whenever input is required
    NonInteractive,
}

impl Prompt {
    pub fn new(interactive: bool) -> Self {
        if interactive {
            Self::Console
        } else {
            Self::NonInteractive
        }
    }

    pub async fn input(&self, field: &str, secret: bool) -> Result<String> {
        match self {
            Prompt::Console => {
                let prompt = field.to_string();
                let result = task::spawn_blocking(move || {
                    if secret {
                        Password::new().with_prompt(prompt).interact()
                    } else {
                        Input::new().with_prompt(prompt).interact_text()
                    }
                })
                .await
                .map_err(join_error)?;

                result.map_err(|err| Error::InvalidArgument {
                    message: err.to_string(),
                })
            }
            Prompt::NonInteractive => Err(Error::InvalidArgument {
                message: format!(
                    "Input required for '{field}', but prompts are disabled. Provide it via command-line flags."
                ),
            }),
        }
    }
}

fn join_error(err: task::JoinError) -> Error {
    Error::Io {
        source: io::Error::other(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_interactive_input_fails() {
        let err = Prompt::new(false)
            .input("archive password", true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert!(err.to_string().contains("archive password"));
    }
}
