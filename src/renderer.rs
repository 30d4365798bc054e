//! Conversion of DOT text to SVG through an external command.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to start renderer `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("renderer exited with {exit_code:?}: {stderr}")]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error talking to renderer: {0}")]
    Io(#[from] std::io::Error),

    #[error("renderer output is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphRenderer {
    program: String,
    args: Vec<String>,
}

impl Default for GraphRenderer {
    fn default() -> Self {
        Self::new("dot", ["-Tsvg"])
    }
}

impl GraphRenderer {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a whitespace-separated command line such as `dot -Tsvg`.
    /// Returns `None` for a blank string.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace();
        let program = words.next()?;
        Some(Self::new(program, words))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Feed `dot` to the renderer's stdin and return its stdout.
    pub async fn render(&self, dot: &str) -> Result<String, RenderError> {
        tracing::debug!(program = %self.program, args = ?self.args, "rendering graph");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let input = dot.as_bytes().to_vec();
            // Written concurrently with reading stdout so a large graph
            // cannot fill both pipes and deadlock.
            let writer = tokio::spawn(async move {
                stdin.write_all(&input).await?;
                stdin.shutdown().await
            });
            let output = child.wait_with_output().await?;
            match writer.await {
                Ok(Ok(())) => {}
                // The renderer may exit early without reading everything;
                // its exit status reports that better than the broken pipe.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(e.into()),
                Err(join) => return Err(std::io::Error::other(join).into()),
            }
            return Self::collect(output);
        }

        let output = child.wait_with_output().await?;
        Self::collect(output)
    }

    fn collect(output: std::process::Output) -> Result<String, RenderError> {
        if !output.status.success() {
            return Err(RenderError::Failed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}
