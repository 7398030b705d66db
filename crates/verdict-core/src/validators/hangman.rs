//! Multi-turn letter-guessing protocol validation.
//!
//! Each turn the model must answer with exactly one lowercase letter it
//! has not used before in the session. The session state is owned by the
//! caller's turn loop and mutated one step at a time.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::Verdict;

lazy_static! {
    static ref LONE_LETTER_RE: Regex = Regex::new(r"\b([a-z])\b").unwrap();
}

/// Parse exactly one lowercase ASCII letter out of a response.
///
/// Accepts the trimmed response when it is a single letter, or a response
/// carrying one letter as a whole word (e.g. "`a`") provided no other
/// lowercase letter appears anywhere in it. "Guess: a" is rejected: the
/// surrounding word contributes extra letters.
fn parse_letter(output_text: &str) -> Option<char> {
    let s = output_text.trim();

    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_lowercase() {
            return Some(c);
        }
        return None;
    }

    if let Some(caps) = LONE_LETTER_RE.captures(s) {
        if s.chars().filter(char::is_ascii_lowercase).count() == 1 {
            return caps.get(1).and_then(|m| m.as_str().chars().next());
        }
    }
    None
}

/// Per-session protocol state: the set of letters accepted so far.
///
/// One session per (task, model) exchange; no letter is ever accepted
/// twice within it.
#[derive(Debug, Default)]
pub struct GuessSession {
    used: BTreeSet<char>,
}

impl GuessSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Letters accepted so far, in alphabetical order.
    pub fn used(&self) -> impl Iterator<Item = char> + '_ {
        self.used.iter().copied()
    }

    /// Judge one turn, recording the letter on success.
    pub fn step(&mut self, output_text: &str) -> Verdict {
        let letter = match parse_letter(output_text) {
            Some(l) => l,
            None => return Verdict::fail("Response must be exactly one lowercase letter."),
        };
        if self.used.contains(&letter) {
            return Verdict::fail("Repeated letter.");
        }
        self.used.insert(letter);
        Verdict::pass("OK")
    }
}
