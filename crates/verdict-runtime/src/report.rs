//! Result recording: CSV rows, raw transcripts, per-task artifacts and
//! the markdown summary.
//!
//! The CSV row per (task, model) pair is always written and flushed
//! immediately, so a run interrupted halfway still leaves usable data.
//! Transcripts (JSONL + per-task text files) are opt-in. Accepted SVG
//! artifacts are always persisted, keyed by run, model and task id.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use verdict_core::Task;

use crate::harness::{now_timestamp, TaskOutcome, Transcript};

lazy_static! {
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_.-]+").unwrap();
}

/// Errors that can occur while writing results.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write output file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to write CSV row: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to encode transcript: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// One row of the tabular result file.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run_id: String,
    pub timestamp: String,
    pub model: String,
    pub task_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub language: String,
    pub pass: u8,
    pub reason: String,
    pub latency_ms: u64,
    pub output_chars: usize,
}

/// Paths produced by a finished run.
#[derive(Debug)]
pub struct RunPaths {
    pub csv: PathBuf,
    pub summary: PathBuf,
    pub raw: Option<PathBuf>,
    pub outputs: Option<PathBuf>,
}

/// Collects every record of a run and writes the output files.
pub struct Reporter {
    out_dir: PathBuf,
    run_id: String,
    csv: csv::Writer<File>,
    csv_path: PathBuf,
    raw: Option<BufWriter<File>>,
    raw_path: Option<PathBuf>,
    outputs_dir: Option<PathBuf>,
    rows: Vec<RunRecord>,
}

impl Reporter {
    /// Create a reporter writing under `out_dir`.
    ///
    /// With `save_outputs`, raw prompts/outputs are additionally logged
    /// to JSONL and per-task text files.
    pub fn new(
        out_dir: impl AsRef<Path>,
        run_id: impl Into<String>,
        save_outputs: bool,
    ) -> Result<Self, ReportError> {
        let out_dir = out_dir.as_ref().to_path_buf();
        let run_id = run_id.into();
        fs::create_dir_all(&out_dir)?;

        let csv_path = out_dir.join(format!("run_{run_id}.csv"));
        let csv = csv::Writer::from_path(&csv_path)?;

        let (raw, raw_path, outputs_dir) = if save_outputs {
            let raw_path = out_dir.join(format!("raw_{run_id}.jsonl"));
            let raw = BufWriter::new(File::create(&raw_path)?);
            let outputs_dir = out_dir.join("outputs").join(&run_id);
            fs::create_dir_all(&outputs_dir)?;
            (Some(raw), Some(raw_path), Some(outputs_dir))
        } else {
            (None, None, None)
        };

        Ok(Self {
            out_dir,
            run_id,
            csv,
            csv_path,
            raw,
            raw_path,
            outputs_dir,
            rows: Vec::new(),
        })
    }

    /// Record one (task, model) outcome.
    pub fn record(
        &mut self,
        task: &Task,
        model: &str,
        outcome: &TaskOutcome,
    ) -> Result<(), ReportError> {
        let record = RunRecord {
            run_id: self.run_id.clone(),
            timestamp: now_timestamp(),
            model: model.to_string(),
            task_id: task.id.clone(),
            kind: task.kind.to_string(),
            language: task.language.clone(),
            pass: outcome.verdict.as_flag(),
            reason: outcome.verdict.reason.clone(),
            latency_ms: outcome.latency_ms,
            output_chars: outcome.output.chars().count(),
        };

        self.csv.serialize(&record)?;
        self.csv.flush()?;

        if let Some(raw) = self.raw.as_mut() {
            let value = raw_record_value(task, model, outcome, &record)?;
            serde_json::to_writer(&mut *raw, &value)?;
            raw.write_all(b"\n")?;
        }
        if let Some(outputs_dir) = &self.outputs_dir {
            write_text_artifact(outputs_dir, task, model, outcome)?;
        }
        if let Some(artifact) = &outcome.artifact {
            self.write_svg_artifact(task, model, artifact)?;
        }

        self.rows.push(record);
        Ok(())
    }

    /// Flush everything and write the summary report.
    pub fn finish(mut self) -> Result<RunPaths, ReportError> {
        self.csv.flush()?;
        if let Some(raw) = self.raw.as_mut() {
            raw.flush()?;
        }

        let summary_path = self.out_dir.join(format!("summary_{}.md", self.run_id));
        fs::write(&summary_path, render_summary(&self.rows, &now_timestamp()))?;

        Ok(RunPaths {
            csv: self.csv_path,
            summary: summary_path,
            raw: self.raw_path,
            outputs: self.outputs_dir,
        })
    }

    fn write_svg_artifact(
        &self,
        task: &Task,
        model: &str,
        artifact: &str,
    ) -> Result<(), ReportError> {
        let dir = self.out_dir.join("svgs").join(&self.run_id).join(model);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{}.svg", sanitize_task_id(&task.id))), artifact)?;
        Ok(())
    }
}

/// The JSONL transcript record for one (task, model) pair.
fn raw_record_value(
    task: &Task,
    model: &str,
    outcome: &TaskOutcome,
    record: &RunRecord,
) -> Result<serde_json::Value, ReportError> {
    let mut value = serde_json::json!({
        "run_id": record.run_id,
        "timestamp": record.timestamp,
        "model": model,
        "task_id": task.id,
        "type": record.kind,
        "language": task.language,
        "latency_ms": outcome.latency_ms,
    });

    match &outcome.transcript {
        Transcript::Exchange { prompt } => {
            value["prompt"] = serde_json::json!(prompt);
            value["output"] = serde_json::json!(outcome.output);
        }
        Transcript::Session {
            opening_prompt,
            turns,
        } => {
            value["initial_prompt"] = serde_json::json!(opening_prompt);
            value["turns"] = serde_json::to_value(turns)?;
        }
    }
    Ok(value)
}

/// Write the human-readable per-task text file.
fn write_text_artifact(
    outputs_dir: &Path,
    task: &Task,
    model: &str,
    outcome: &TaskOutcome,
) -> Result<(), ReportError> {
    let dir = outputs_dir.join(model);
    fs::create_dir_all(&dir)?;

    let body = match &outcome.transcript {
        Transcript::Exchange { prompt } => {
            format!("PROMPT:\n{}\n\nOUTPUT:\n{}\n", prompt, outcome.output)
        }
        Transcript::Session {
            opening_prompt,
            turns,
        } => {
            let mut lines = vec![
                "RULES PROMPT:".to_string(),
                opening_prompt.clone(),
                String::new(),
                "TRANSCRIPT:".to_string(),
            ];
            for t in turns {
                lines.push(format!(
                    "Turn {}: {}  -> {} ({})",
                    t.turn,
                    t.output,
                    if t.ok { "PASS" } else { "FAIL" },
                    t.reason
                ));
            }
            lines.push(String::new());
            lines.push(format!(
                "Final result: {} ({})",
                if outcome.verdict.passed { "PASS" } else { "FAIL" },
                outcome.verdict.reason
            ));
            lines.join("\n")
        }
    };

    fs::write(dir.join(format!("{}.txt", sanitize_task_id(&task.id))), body)?;
    Ok(())
}

/// Replace anything outside `[A-Za-z0-9_.-]` so task ids are safe as
/// file names.
fn sanitize_task_id(id: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(id, "_").into_owned()
}

/// Render the per-model summary report.
fn render_summary(rows: &[RunRecord], generated_at: &str) -> String {
    // Group by model, preserving first-appearance order.
    let mut models: Vec<(String, Vec<&RunRecord>)> = Vec::new();
    for row in rows {
        match models.iter_mut().find(|(m, _)| *m == row.model) {
            Some((_, group)) => group.push(row),
            None => models.push((row.model.clone(), vec![row])),
        }
    }

    let mut lines = vec![format!("# verdict summary ({generated_at})\n")];
    for (model, group) in &models {
        let total = group.len();
        let passed = group.iter().filter(|r| r.pass == 1).count();
        lines.push(format!("## {model}\n"));
        lines.push(format!("- Passed: **{passed}/{total}**\n"));

        let mut kinds: Vec<(String, Vec<&RunRecord>)> = Vec::new();
        for &row in group {
            match kinds.iter_mut().find(|(k, _)| *k == row.kind) {
                Some((_, g)) => g.push(row),
                None => kinds.push((row.kind.clone(), vec![row])),
            }
        }
        for (kind, g) in &kinds {
            let kind_passed = g.iter().filter(|r| r.pass == 1).count();
            lines.push(format!("  - {kind}: {kind_passed}/{}", g.len()));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}
