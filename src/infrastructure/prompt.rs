//! Interactive confirmation
//!
//! Uses dialoguer when stdin is a terminal; falls back to reading one
//! line from stdin otherwise so piped invocations still work.

use std::io::BufRead;

use dialoguer::Confirm;
use is_terminal::IsTerminal;

use crate::domain::ports::Confirmation;

/// Terminal-aware yes/no prompt
pub struct DialoguerConfirmation;

impl DialoguerConfirmation {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerConfirmation {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirmation for DialoguerConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        if std::io::stdin().is_terminal() {
            Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or(false)
        } else {
            // Blocking read: a cancel signal raised while waiting here is
            // observed by the caller when the answer arrives, not before.
            eprintln!("{} [y/N]", prompt);
            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line) {
                Ok(_) => accepts(&line),
                Err(_) => false,
            }
        }
    }
}

fn accepts(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
