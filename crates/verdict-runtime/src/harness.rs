//! The benchmark run loop.
//!
//! Iterates tasks and models sequentially, one generation call in flight
//! at a time, routing every output to the validator matching the task
//! type and handing the outcome to the reporter. Nothing in here aborts
//! the run: transport failures arrive as marker text and fail validation,
//! unknown task types produce a uniform failing outcome.

use std::sync::Arc;

use serde::Serialize;

use verdict_core::{
    extract_svg, insert_metadata_comment, validate_grounded, validate_json_output,
    validate_svg_art, GuessSession, SvgMetadata, Task, TaskKind, Verdict,
};

use crate::prompts::{
    build_grounded_prompt, build_hangman_opening_prompt, build_json_prompt, build_svg_prompt,
    HANGMAN_NEXT_PROMPT,
};
use crate::providers::{GenerateOptions, TextGenerator, ERROR_MARKER};
use crate::report::{ReportError, Reporter};

/// Token cap for hangman turns; a single letter never needs more.
const HANGMAN_MAX_TOKENS: u32 = 8;

/// One judged turn of an interactive session.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub turn: usize,
    pub output: String,
    pub ok: bool,
    pub reason: String,
    pub latency_ms: u64,
}

/// What was said between harness and model for one (task, model) pair.
#[derive(Debug, Clone)]
pub enum Transcript {
    /// Single prompt/response exchange
    Exchange { prompt: String },

    /// Multi-turn session: opening rules prompt plus judged turns
    Session {
        opening_prompt: String,
        turns: Vec<TurnRecord>,
    },
}

/// Everything the harness learned about one (task, model) pair.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    /// The validator's decision
    pub verdict: Verdict,

    /// Raw model output (a placeholder for multi-turn sessions)
    pub output: String,

    /// Latency of the call, or the sum over all turns
    pub latency_ms: u64,

    /// The exchange, for transcript logging
    pub transcript: Transcript,

    /// Metadata-stamped SVG fragment, present only on accepted svg tasks
    pub artifact: Option<String>,
}

/// The benchmark harness.
///
/// Owns the generation collaborator and the per-call options; the run
/// loop is strictly sequential.
pub struct Harness {
    generator: Arc<dyn TextGenerator>,
    options: GenerateOptions,
    run_id: String,
}

impl Harness {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        options: GenerateOptions,
        run_id: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            options,
            run_id: run_id.into(),
        }
    }

    /// Evaluate every task against every model, recording each outcome.
    pub async fn run(
        &self,
        tasks: &[Task],
        models: &[String],
        reporter: &mut Reporter,
    ) -> Result<(), ReportError> {
        for task in tasks {
            for model in models {
                let outcome = self.run_task(task, model).await;
                tracing::info!(
                    "[{}] {} -> {} ({})",
                    model,
                    task.id,
                    if outcome.verdict.passed { "PASS" } else { "FAIL" },
                    outcome.verdict.reason
                );
                reporter.record(task, model, &outcome)?;
            }
        }
        Ok(())
    }

    /// Evaluate one (task, model) pair.
    pub async fn run_task(&self, task: &Task, model: &str) -> TaskOutcome {
        match task.kind {
            TaskKind::Json => self.run_json(task, model).await,
            TaskKind::Grounded => self.run_grounded(task, model).await,
            TaskKind::Hangman => self.run_hangman(task, model).await,
            TaskKind::Svg => self.run_svg(task, model).await,
            TaskKind::Unknown => TaskOutcome {
                verdict: Verdict::fail("Unknown task type"),
                output: format!("{ERROR_MARKER}: Unknown task type"),
                latency_ms: 0,
                transcript: Transcript::Exchange {
                    prompt: String::new(),
                },
                artifact: None,
            },
        }
    }

    async fn run_json(&self, task: &Task, model: &str) -> TaskOutcome {
        let prompt = build_json_prompt(task);
        let gen = self.generator.generate(model, &prompt, &self.options).await;
        let verdict = match &task.schema {
            Some(schema) => validate_json_output(&gen.text, schema),
            None => Verdict::fail("Task defines no JSON schema."),
        };
        TaskOutcome {
            verdict,
            output: gen.text,
            latency_ms: gen.latency_ms,
            transcript: Transcript::Exchange { prompt },
            artifact: None,
        }
    }

    async fn run_grounded(&self, task: &Task, model: &str) -> TaskOutcome {
        let prompt = build_grounded_prompt(task);
        let gen = self.generator.generate(model, &prompt, &self.options).await;
        let verdict = validate_grounded(
            &gen.text,
            &task.context,
            &task.expected_keywords,
            task.min_keywords,
            task.unknown_ok,
        );
        TaskOutcome {
            verdict,
            output: gen.text,
            latency_ms: gen.latency_ms,
            transcript: Transcript::Exchange { prompt },
            artifact: None,
        }
    }

    async fn run_hangman(&self, task: &Task, model: &str) -> TaskOutcome {
        // Single-letter turns are forced deterministic and short
        // regardless of the run-wide options.
        let options = GenerateOptions {
            temperature: 0.0,
            max_tokens: HANGMAN_MAX_TOKENS,
            timeout: self.options.timeout,
        };

        let opening_prompt = build_hangman_opening_prompt(task);
        let mut session = GuessSession::new();
        let mut turns = Vec::with_capacity(task.turns);
        let mut verdict = Verdict::pass("OK");
        let mut total_latency = 0u64;
        let mut prompt = opening_prompt.clone();

        for turn in 1..=task.turns {
            let gen = self.generator.generate(model, &prompt, &options).await;
            total_latency += gen.latency_ms;

            let step = session.step(&gen.text);
            turns.push(TurnRecord {
                turn,
                output: gen.text.clone(),
                ok: step.passed,
                reason: step.reason.clone(),
                latency_ms: gen.latency_ms,
            });

            if !step.passed {
                verdict = Verdict::fail(format!(
                    "Turn {turn}: {} (model said: {:?})",
                    step.reason, gen.text
                ));
                break;
            }
            prompt = HANGMAN_NEXT_PROMPT.to_string();
        }

        TaskOutcome {
            verdict,
            output: format!("(hangman {} turns)", task.turns),
            latency_ms: total_latency,
            transcript: Transcript::Session {
                opening_prompt,
                turns,
            },
            artifact: None,
        }
    }

    async fn run_svg(&self, task: &Task, model: &str) -> TaskOutcome {
        let prompt = build_svg_prompt(task);
        let gen = self.generator.generate(model, &prompt, &self.options).await;

        let (verdict, artifact) = match extract_svg(&gen.text) {
            None => (Verdict::fail("No <svg> block in output."), None),
            Some(svg) => {
                let verdict = validate_svg_art(&svg);
                let artifact = verdict.passed.then(|| {
                    insert_metadata_comment(
                        &svg,
                        &SvgMetadata {
                            model: model.to_string(),
                            temperature: self.options.temperature,
                            max_tokens: self.options.max_tokens,
                            latency_ms: gen.latency_ms,
                            run_id: self.run_id.clone(),
                            timestamp: now_timestamp(),
                            task_id: task.id.clone(),
                        },
                    )
                });
                (verdict, artifact)
            }
        };

        TaskOutcome {
            verdict,
            output: gen.text,
            latency_ms: gen.latency_ms,
            transcript: Transcript::Exchange { prompt },
            artifact,
        }
    }
}

/// Local wall-clock timestamp, seconds precision.
pub(crate) fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}
