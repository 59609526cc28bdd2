//! External engine subprocess.
//!
//! Runs a configured command per request with timeout and output capture.
//! The command receives the invocation as one JSON object on stdin and
//! writes the rendered text to stdout:
//!
//! ```json
//! {"template": "intro", "definition": {...}, "variables": {...}}
//! ```
//!
//! The command line may use `{template}`, `{pdl_file}` and `{project_root}`
//! placeholders. Stdin, stdout and stderr are spooled through anonymous temp
//! files so a chatty child can never block on a full pipe.

use super::interpolate::{Syntax, render};
use super::{EngineError, Invocation, TemplateEngine};
use crate::config::EngineSettings;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// Payload written to the engine's stdin.
#[derive(Serialize)]
struct EnginePayload<'a> {
    template: &'a str,
    definition: &'a serde_yaml::Value,
    variables: &'a Map<String, Value>,
}

/// Engine that delegates execution to an external command.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    command: String,
    timeout: Duration,
    environment: BTreeMap<String, String>,
    working_dir: PathBuf,
}

impl CommandEngine {
    pub fn new(settings: &EngineSettings, working_dir: &Path) -> Self {
        Self {
            command: settings.command.clone(),
            timeout: Duration::from_secs(settings.timeout_seconds),
            environment: settings.environment.clone(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Split the command line into arguments, then substitute placeholders
    /// in each one. A substituted value always stays a single argument.
    fn command_args(&self, invocation: &Invocation<'_>) -> Result<Vec<String>, EngineError> {
        let placeholders: HashMap<&str, String> = HashMap::from([
            ("template", invocation.template.to_string()),
            ("pdl_file", invocation.pdl_file.display().to_string()),
            ("project_root", self.working_dir.display().to_string()),
        ]);

        let words = shell_words::split(&self.command).map_err(|e| {
            EngineError::InvalidCommand(format!(
                "failed to parse engine command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                self.command, e
            ))
        })?;

        if words.is_empty() {
            return Err(EngineError::InvalidCommand(format!(
                "engine command is empty after parsing: '{}'",
                self.command
            )));
        }

        words
            .iter()
            .map(|word| {
                render(word, Syntax::Braces, |name| placeholders.get(name).cloned()).map_err(|e| {
                    EngineError::InvalidCommand(format!(
                        "engine command template is invalid: {}\n\
                         Command: {}\n\
                         Available placeholders: project_root, pdl_file, template",
                        e, self.command
                    ))
                })
            })
            .collect()
    }
}

impl TemplateEngine for CommandEngine {
    fn name(&self) -> &'static str {
        "command"
    }

    fn execute(&self, invocation: &Invocation<'_>) -> Result<String, EngineError> {
        let args = self.command_args(invocation)?;
        let (program, cmd_args) = (&args[0], &args[1..]);

        let payload = serde_json::to_vec(&EnginePayload {
            template: invocation.template,
            definition: invocation.definition,
            variables: invocation.variables,
        })
        .map_err(|e| EngineError::Io(format!("failed to encode engine request: {}", e)))?;

        let mut stdin_file = spool_file()?;
        stdin_file
            .write_all(&payload)
            .and_then(|_| stdin_file.seek(SeekFrom::Start(0)))
            .map_err(|e| EngineError::Io(format!("failed to spool engine request: {}", e)))?;

        let mut stdout_file = spool_file()?;
        let mut stderr_file = spool_file()?;

        let mut command = Command::new(program);
        command
            .args(cmd_args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::from(stdin_file))
            .stdout(Stdio::from(clone_handle(&stdout_file)?))
            .stderr(Stdio::from(clone_handle(&stderr_file)?));

        for (key, value) in &self.environment {
            command.env(key, value);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let start_time = Instant::now();
        let mut child = command.spawn().map_err(|source| EngineError::Spawn {
            program: program.clone(),
            source,
        })?;

        let status = wait_with_timeout(&mut child, self.timeout)?;
        debug!(
            program = %program,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "engine command finished"
        );

        let Some(status) = status else {
            return Err(EngineError::TimedOut {
                seconds: self.timeout.as_secs(),
            });
        };

        let stdout = read_spooled(&mut stdout_file)?;
        if !status.success() {
            let stderr = read_spooled(&mut stderr_file)?;
            return Err(EngineError::Failed {
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        String::from_utf8(stdout).map_err(|_| EngineError::InvalidOutput)
    }
}

fn spool_file() -> Result<File, EngineError> {
    tempfile::tempfile()
        .map_err(|e| EngineError::Io(format!("failed to create spool file: {}", e)))
}

fn clone_handle(file: &File) -> Result<File, EngineError> {
    file.try_clone()
        .map_err(|e| EngineError::Io(format!("failed to share spool file: {}", e)))
}

fn read_spooled(file: &mut File) -> Result<Vec<u8>, EngineError> {
    let mut buf = Vec::new();
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut buf))
        .map_err(|e| EngineError::Io(format!("failed to read engine output: {}", e)))?;
    Ok(buf)
}

/// Wait for a child process with timeout.
///
/// Returns `None` when the timeout expired and the child's process group was
/// killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>, EngineError> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(20);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    kill_process(child);
                    return Ok(None);
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(EngineError::Io(format!(
                    "failed to check engine process status: {}",
                    e
                )));
            }
        }
    }
}

/// Kill a child and everything it started, then reap it.
///
/// On Unix the child leads its own process group, so `sh -c` wrappers take
/// their descendants down with them.
fn kill_process(child: &mut Child) {
    #[cfg(unix)]
    {
        let _ = Command::new("kill")
            .args(["-KILL", "--", &format!("-{}", child.id())])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
    // SIGKILL on Unix, TerminateProcess on Windows
    let _ = child.kill();
    let _ = child.wait();
}
