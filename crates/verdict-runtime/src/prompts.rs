//! Prompt construction per task type.
//!
//! Templates are deliberately plain: the harness measures whether a model
//! follows instructions, so the instructions must not do the work for it.

use verdict_core::Task;

/// Fixed follow-up sent after every accepted hangman turn.
pub const HANGMAN_NEXT_PROMPT: &str = "Great. Next letter:";

/// Prompt for a json task: the template with `{{document}}` filled in.
pub fn build_json_prompt(task: &Task) -> String {
    task.prompt_template.replace("{{document}}", &task.inputs.document)
}

/// Prompt for a grounded task: context plus question, with an explicit
/// instruction to refuse when the answer is not in the context. The
/// refusal wording is one of the uncertainty phrases the validator
/// accepts.
pub fn build_grounded_prompt(task: &Task) -> String {
    format!(
        "Read the following context carefully and answer the question briefly.\n\
         If the answer is NOT in the context, say explicitly: \"not in the text\".\n\
         Context:\n{}\n\nQuestion: {}\nAnswer:",
        task.context, task.question
    )
}

/// Opening prompt for a hangman session: the task's rules plus the
/// request for the first letter.
pub fn build_hangman_opening_prompt(task: &Task) -> String {
    format!("{}\n\nFirst letter:", task.rules_prompt.trim())
}

/// Prompt for an svg task: the template verbatim.
pub fn build_svg_prompt(task: &Task) -> String {
    task.prompt_template.clone()
}
