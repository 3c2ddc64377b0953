use super::{clean_response, prompt, InterpretationRequest, Interpreter};
use crate::error::{ArcanaError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Runs a local model through `<command> run <model>`, writing the prompt to
/// the child's stdin and reading the answer from its stdout.
pub struct OllamaInterpreter {
    command: String,
    model: String,
}

impl OllamaInterpreter {
    pub fn new(command: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
        }
    }

    async fn run(&self, args: &[&str], input: Option<String>) -> Result<String> {
        tracing::debug!(command = %self.command, ?args, "spawning local model");
        let mut child = Command::new(&self.command)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ArcanaError::interpretation(format!("could not start `{}`: {}", self.command, e))
            })?;

        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            // The child may exit without reading its input; its output decides.
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                tracing::debug!(error = %e, "local model closed stdin early");
            }
        }

        let output = child.wait_with_output().await.map_err(|e| {
            ArcanaError::interpretation(format!("`{}` failed: {}", self.command, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("`{}` exited with {}", self.command, output.status)
            } else {
                stderr
            };
            return Err(ArcanaError::interpretation(reason));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl Interpreter for OllamaInterpreter {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn interpret(&self, request: &InterpretationRequest) -> Result<String> {
        let raw = self
            .run(&["run", self.model.as_str()], Some(prompt::full_prompt(request)))
            .await?;
        let text = clean_response(&raw);
        if text.is_empty() {
            return Err(ArcanaError::interpretation("the model returned an empty answer"));
        }
        Ok(text)
    }

    async fn health_check(&self) -> Result<String> {
        let listing = self.run(&["list"], None).await?;
        if listing.contains(&self.model) {
            Ok(format!("ollama is running and `{}` is installed", self.model))
        } else {
            Ok(format!(
                "ollama is running but `{}` is not installed (run `ollama pull {}`)",
                self.model, self.model
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReadingCard;

    fn request() -> InterpretationRequest {
        InterpretationRequest::new("One Card", vec![ReadingCard::new("Core Message", "The Sun")])
    }

    #[tokio::test]
    async fn missing_command_is_interpretation_failure() {
        let interpreter = OllamaInterpreter::new("arcana-no-such-binary", "llama3.1:8b");
        let err = interpreter.interpret(&request()).await.unwrap_err();
        assert!(matches!(err, ArcanaError::InterpretationFailed { .. }));
        assert!(err.to_string().contains("arcana-no-such-binary"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn passes_run_and_model_as_arguments() {
        let interpreter = OllamaInterpreter::new("echo", "llama3.1:8b");
        let text = interpreter.interpret(&request()).await.unwrap();
        assert_eq!(text, "run llama3.1:8b");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_failure() {
        let interpreter = OllamaInterpreter::new("false", "llama3.1:8b");
        assert!(matches!(
            interpreter.interpret(&request()).await,
            Err(ArcanaError::InterpretationFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn health_check_reports_missing_model() {
        let interpreter = OllamaInterpreter::new("echo", "mistral");
        let status = interpreter.health_check().await.unwrap();
        assert!(status.contains("not installed"));
    }
}
