//! Sources for the `read` expression.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::errors::{EvalError, EvalResult};
use crate::print_handler::PrintHandlerImpl;

/// Where `read` takes its integers from.
///
/// Input is split on whitespace; each `read` consumes one word.
pub enum InputHandler {
    /// Standard input. `prompt` shows `read> ` before each word is read.
    Stdin {
        prompt: bool,
        pending: VecDeque<String>,
    },
    /// A fixed list of words, used by tests and embedders.
    Queue(VecDeque<String>),
}

impl InputHandler {
    pub fn stdin(prompt: bool) -> Self {
        InputHandler::Stdin {
            prompt,
            pending: VecDeque::new(),
        }
    }

    /// Queue the whitespace-separated words of `text`.
    pub fn from_text(text: &str) -> Self {
        InputHandler::Queue(text.split_whitespace().map(str::to_string).collect())
    }

    /// Read one integer.
    pub fn read_int(&mut self, out: &PrintHandlerImpl) -> EvalResult<i32> {
        let word = match self {
            InputHandler::Queue(words) => words.pop_front(),
            InputHandler::Stdin { prompt, pending } => {
                if *prompt {
                    out.print("read> ");
                }
                next_stdin_word(pending)
            }
        };
        let Some(word) = word else {
            return Err(EvalError::InvalidInput("end of input".to_string()));
        };
        word.parse::<i32>()
            .map_err(|_| EvalError::InvalidInput(format!("`{word}` is not an integer")))
    }
}

fn next_stdin_word(pending: &mut VecDeque<String>) -> Option<String> {
    let stdin = std::io::stdin();
    let mut lock = stdin.lock();
    while pending.is_empty() {
        let mut line = String::new();
        match lock.read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => pending.extend(line.split_whitespace().map(str::to_string)),
        }
    }
    pending.pop_front()
}
