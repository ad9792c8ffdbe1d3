//! Terminal prompts.

use colored::Colorize;
use laundry_application::ConfirmPrompt;
use rustyline::DefaultEditor;

/// Asks yes/no questions on the terminal. Anything but `y`/`yes` is a no.
pub struct ReadlineConfirm;

impl ConfirmPrompt for ReadlineConfirm {
    fn confirm(&self, message: &str) -> bool {
        let Ok(mut rl) = DefaultEditor::new() else {
            return false;
        };
        let question = format!("{} [y/N] ", message.bright_yellow());
        match rl.readline(&question) {
            Ok(answer) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Reads a password with terminal echo off. It never enters an editor
/// buffer or the shell history. `None` when the terminal is gone.
pub fn read_password(prompt: &str) -> Option<String> {
    password_from(rpassword::prompt_password(prompt))
}

fn password_from(read: std::io::Result<String>) -> Option<String> {
    read.ok()
        .map(|password| password.trim_end_matches(['\r', '\n']).to_string())
}
