//! Task parsing from YAML.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading task packs.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Failed to read task file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Task validation failed: {0}")]
    ValidationError(String),
}

/// The task type, selecting which validator judges the output.
///
/// Unrecognized type strings deserialize to `Unknown` instead of failing:
/// an unknown task type is reported as a uniform failing outcome at run
/// time, never as a load-time crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Schema-constrained JSON generation
    Json,

    /// Context-grounded question answering
    Grounded,

    /// Multi-turn letter-guessing protocol
    Hangman,

    /// Constrained SVG image generation
    Svg,

    /// Any type string this harness does not understand
    #[serde(other)]
    Unknown,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Json => "json",
            TaskKind::Grounded => "grounded",
            TaskKind::Hangman => "hangman",
            TaskKind::Svg => "svg",
            TaskKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs interpolated into the prompt template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskInputs {
    /// Document substituted for `{{document}}` in json tasks
    #[serde(default)]
    pub document: String,
}

/// A single declarative benchmark item.
///
/// Fields beyond `id` and `type` are per-type; everything is defaulted so
/// a task of any kind parses without the fields of the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,

    /// Task type
    #[serde(rename = "type")]
    pub kind: TaskKind,

    /// Language tag (e.g. "en", "de")
    #[serde(default)]
    pub language: String,

    /// Prompt template (json and svg tasks)
    #[serde(default)]
    pub prompt_template: String,

    /// Template inputs (json tasks)
    #[serde(default)]
    pub inputs: TaskInputs,

    /// JSON schema the output must satisfy (json tasks)
    #[serde(default)]
    pub schema: Option<serde_json::Value>,

    /// Context the answer must be grounded in (grounded tasks)
    #[serde(default)]
    pub context: String,

    /// Question to answer (grounded tasks)
    #[serde(default)]
    pub question: String,

    /// Keywords expected in a correct answer (grounded tasks)
    #[serde(default)]
    pub expected_keywords: Vec<String>,

    /// Minimum number of expected keywords that must appear
    #[serde(default = "default_min_keywords")]
    pub min_keywords: usize,

    /// Whether an explicit uncertainty admission counts as correct
    #[serde(default)]
    pub unknown_ok: bool,

    /// Rules prompt opening the session (hangman tasks)
    #[serde(default)]
    pub rules_prompt: String,

    /// Number of turns in the session (hangman tasks)
    #[serde(default = "default_turns")]
    pub turns: usize,

    /// Path this task was loaded from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

fn default_min_keywords() -> usize {
    1
}

fn default_turns() -> usize {
    5
}

impl Task {
    /// Parse a task from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, TaskError> {
        let mut task: Task = serde_yaml::from_str(yaml)?;
        task.validate()?;
        // A zero minimum would make the keyword check vacuous.
        if task.min_keywords == 0 {
            task.min_keywords = 1;
        }
        Ok(task)
    }

    /// Parse a task from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, TaskError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut task = Self::from_yaml(&contents)?;
        task.source = Some(path.to_path_buf());
        Ok(task)
    }

    fn validate(&self) -> Result<(), TaskError> {
        if self.id.is_empty() {
            return Err(TaskError::ValidationError("task id is empty".to_string()));
        }
        Ok(())
    }
}

/// Load every `*.yaml` / `*.yml` task in a directory, sorted by path.
pub fn load_pack(dir: impl AsRef<Path>) -> Result<Vec<Task>, TaskError> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();
    paths.sort();

    let mut tasks = Vec::with_capacity(paths.len());
    for path in paths {
        tasks.push(Task::from_yaml_file(&path)?);
    }
    tracing::debug!(dir = %dir.display(), count = tasks.len(), "loaded task pack");
    Ok(tasks)
}
