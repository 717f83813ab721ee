use console::Term;
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, Write};

/// A single synchronous question asked at the point a value is needed.
pub trait Prompt {
    /// `None` when input was cancelled or closed.
    fn ask(&mut self, label: &str) -> Option<String>;
}

/// Reads the answer from the terminal, or a line from stdin when either end
/// is not attended.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, label: &str) -> Option<String> {
        if !Term::stderr().is_term() || !io::stdin().is_terminal() {
            eprint!("{}: ", label);
            let _ = io::stderr().flush();
            return read_answer(&mut io::stdin().lock());
        }
        match Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
        {
            Ok(answer) => Some(answer),
            Err(e) => {
                tracing::debug!("Prompt for {} aborted: {}", label, e);
                None
            }
        }
    }
}

/// One line without its terminator; `None` at end-of-input.
fn read_answer(input: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        Err(e) => {
            tracing::debug!("Reading answer failed: {}", e);
            None
        }
    }
}
