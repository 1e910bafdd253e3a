use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

pub const DEFAULT_MESSAGE_PREFIX: &str = "auto update";

/// One external command of the publish sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishStep {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
}

impl PublishStep {
    pub fn new<S: Into<String>>(name: S, program: S, args: &[&str]) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn git<S: Into<String>>(name: S, args: &[&str]) -> Self {
        Self {
            name: name.into(),
            program: "git".to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Shell-like rendering for messages; arguments with spaces are quoted.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|arg| {
                if arg.contains(char::is_whitespace) {
                    format!("\"{}\"", arg)
                } else {
                    arg.clone()
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: String,
    pub command: String,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Set when the program could not be started at all.
    pub spawn_error: Option<String>,
}

impl StepOutcome {
    /// stderr, or the spawn error, for failure messages.
    pub fn error_output(&self) -> &str {
        match self.spawn_error {
            Some(ref error) => error.as_str(),
            None => self.stderr.trim(),
        }
    }
}

/// Runs the publish steps in order. A failing step never stops the
/// remaining ones, and nothing is rolled back.
pub struct Publisher {
    working_dir: PathBuf,
    steps: Vec<PublishStep>,
}

impl Publisher {
    pub fn new<P: Into<PathBuf>>(working_dir: P, message_prefix: &str) -> Self {
        let message = Self::commit_message(message_prefix, Local::now());
        Self::with_steps(working_dir, Self::default_steps(&message))
    }

    pub fn with_steps<P: Into<PathBuf>>(working_dir: P, steps: Vec<PublishStep>) -> Self {
        Self {
            working_dir: working_dir.into(),
            steps,
        }
    }

    /// `git add .`, `git commit -m <message>`, `git push`.
    pub fn default_steps(message: &str) -> Vec<PublishStep> {
        vec![
            PublishStep::git("stage", &["add", "."]),
            PublishStep::git("commit", &["commit", "-m", message]),
            PublishStep::git("push", &["push"]),
        ]
    }

    /// `<prefix> (YYYY-MM-DD HH:MM:SS)` in local time.
    pub fn commit_message(prefix: &str, now: DateTime<Local>) -> String {
        format!("{} ({})", prefix, now.format("%Y-%m-%d %H:%M:%S"))
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn steps(&self) -> &[PublishStep] {
        &self.steps
    }

    /// Runs every step, handing each outcome to `on_outcome` as soon as the
    /// step finishes.
    pub fn run<F>(&self, mut on_outcome: F) -> Vec<StepOutcome>
    where
        F: FnMut(&StepOutcome),
    {
        let mut outcomes = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let outcome = self.run_step(step);
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    pub fn run_step(&self, step: &PublishStep) -> StepOutcome {
        let result = Command::new(&step.program)
            .args(&step.args)
            .current_dir(&self.working_dir)
            .output();

        match result {
            Ok(output) => StepOutcome {
                step: step.name.clone(),
                command: step.command_line(),
                success: output.status.success(),
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                spawn_error: None,
            },
            Err(e) => StepOutcome {
                step: step.name.clone(),
                command: step.command_line(),
                success: false,
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                spawn_error: Some(e.to_string()),
            },
        }
    }
}
