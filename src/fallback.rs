//! Fallback conversion through an external text-completion service.
//!
//! The converter itself never calls a service. When a conversion produces no
//! output the caller may hand the source to a [`FallbackProvider`] and use its
//! answer instead.

use std::io::Write;
use std::process::{Command, Stdio};

/// Error type for fallback providers.
#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("Failed to start fallback command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Fallback command I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fallback command '{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Fallback output is not valid UTF-8")]
    InvalidOutput(#[from] std::string::FromUtf8Error),
}

/// What the fallback is asked to convert.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRequest<'a> {
    /// The original LookML text.
    pub source: &'a str,
    /// Why the built-in conversion was not used.
    pub prior_error: Option<&'a str>,
}

impl<'a> FallbackRequest<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            prior_error: None,
        }
    }

    pub fn with_prior_error(mut self, error: &'a str) -> Self {
        self.prior_error = Some(error);
        self
    }

    /// The prompt sent to a completion service.
    pub fn prompt(&self) -> String {
        let mut prompt = String::from(
            "Convert the following LookML dimensions, dimension groups and measures \
             into an Omni view YAML document.\n\
             Rules:\n\
             - dimensions and dimension groups go under `dimensions:`, measures under `measures:`\n\
             - rewrite `${TABLE}.column` references to '\"column\"'\n\
             - map measure `type` to `aggregate_type` (average becomes avg)\n\
             - map `value_format_name` to `format`\n\
             - every dimension needs a `label` and a `description`\n\
             Answer with the YAML document only.\n",
        );
        if let Some(error) = self.prior_error {
            prompt.push_str("\nThe previous conversion attempt failed with: ");
            prompt.push_str(error);
            prompt.push('\n');
        }
        prompt.push_str("\nLookML:\n");
        prompt.push_str(self.source);
        if !self.source.ends_with('\n') {
            prompt.push('\n');
        }
        prompt
    }
}

/// A collaborator that can produce Omni YAML when the converter cannot.
pub trait FallbackProvider {
    /// Return replacement YAML, or `None` when the provider has no answer.
    fn complete(&self, request: &FallbackRequest<'_>) -> Result<Option<String>, FallbackError>;
}

/// Runs an external command: the prompt goes to stdin, the YAML comes back on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl FallbackProvider for CommandProvider {
    fn complete(&self, request: &FallbackRequest<'_>) -> Result<Option<String>, FallbackError> {
        tracing::debug!(command = %self.program, "running fallback command");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| FallbackError::Spawn {
                command: self.program.clone(),
                source,
            })?;

        // Feed stdin from a thread while stdout is drained.
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = request.prompt();
            std::thread::spawn(move || stdin.write_all(prompt.as_bytes()))
        });

        let output = child.wait_with_output()?;
        if let Some(handle) = writer {
            match handle.join() {
                Ok(result) => result?,
                Err(_) => {
                    return Err(FallbackError::Io(std::io::Error::other(
                        "stdin writer panicked",
                    )))
                }
            }
        }

        if !output.status.success() {
            return Err(FallbackError::Failed {
                command: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)?;
        if stdout.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(stdout))
        }
    }
}
