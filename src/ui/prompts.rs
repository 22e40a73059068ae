//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts read one line per answer. An invalid answer is reported and asked
//! again a fixed number of times; after that the prompt gives up and the
//! caller decides what "no answer" means. End of input is treated as the user
//! cancelling.

use std::cell::RefCell;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use thiserror::Error;

/// How many times an unanswerable prompt is repeated.
pub const DEFAULT_ATTEMPTS: usize = 2;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError::IoError(err.to_string())
    }
}

/// Source of interactive answers.
pub trait Prompter {
    /// Ask a yes/no question. Gives up as "no".
    fn confirm(&self, question: &str) -> Result<bool, PromptError>;

    /// Pick one option by index. `None` when no valid answer was given.
    fn choice(
        &self,
        question: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Result<Option<usize>, PromptError>;

    /// Pick several options by comma-separated indexes.
    fn choices(
        &self,
        question: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Result<Option<Vec<usize>>, PromptError>;
}

/// Prompter reading answers line by line from `input`.
pub struct LinePrompter<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
    attempts: usize,
}

impl LinePrompter<StdinLock<'static>, Stdout> {
    /// Prompter over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Consume the prompter, returning what it wrote.
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    fn say(&self, text: &str) -> Result<(), PromptError> {
        let mut out = self.output.borrow_mut();
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }

    /// Show the `> ` marker and read a trimmed answer.
    fn answer(&self) -> Result<String, PromptError> {
        {
            let mut out = self.output.borrow_mut();
            write!(out, "> ")?;
            out.flush()?;
        }
        let mut line = String::new();
        if self.input.borrow_mut().read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        Ok(line.trim().to_string())
    }

    fn show_menu(
        &self,
        question: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Result<(), PromptError> {
        match default.and_then(|i| options.get(i)) {
            Some(label) => self.say(&format!("{question} [{label}]:"))?,
            None => self.say(&format!("{question}:"))?,
        }
        for (index, option) in options.iter().enumerate() {
            self.say(&format!(" [{index}] {option}"))?;
        }
        Ok(())
    }

    /// Ask until `parse` accepts an answer or the attempts run out.
    fn ask<T>(
        &self,
        question: &str,
        options: &[String],
        default: Option<usize>,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Result<Option<T>, PromptError> {
        for _ in 0..self.attempts {
            self.show_menu(question, options, default)?;
            let answer = self.answer()?;
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(invalid) => self.say(&format!("\nValue \"{invalid}\" is invalid!\n"))?,
            }
        }
        Ok(None)
    }
}

fn index_in(answer: &str, options: &[String]) -> Result<usize, String> {
    answer
        .parse::<usize>()
        .ok()
        .filter(|i| *i < options.len())
        .ok_or_else(|| answer.to_string())
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn confirm(&self, question: &str) -> Result<bool, PromptError> {
        const VALID: [(&str, bool); 5] = [
            ("yes", true),
            ("ye", true),
            ("y", true),
            ("no", false),
            ("n", false),
        ];

        for _ in 0..self.attempts {
            self.say(&format!("{question} (yes/no) [no]:"))?;
            let answer = self.answer()?.to_lowercase();
            if let Some((_, value)) = VALID.iter().find(|(word, _)| *word == answer) {
                return Ok(*value);
            }
            let options = VALID.map(|(word, _)| word).join("\", \"");
            self.say(&format!("\nValue \"{answer}\" is invalid!"))?;
            self.say(&format!("Options: \"{options}\"\n"))?;
        }

        Ok(false)
    }

    fn choice(
        &self,
        question: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Result<Option<usize>, PromptError> {
        let default = default.filter(|i| *i < options.len());
        self.ask(question, options, default, |answer| {
            if answer.is_empty() {
                return default.ok_or_else(String::new);
            }
            index_in(answer, options)
        })
    }

    fn choices(
        &self,
        question: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Result<Option<Vec<usize>>, PromptError> {
        let default = default.filter(|i| *i < options.len());
        self.ask(question, options, default, |answer| {
            if answer.is_empty() {
                return default.map(|i| vec![i]).ok_or_else(String::new);
            }
            let mut picked = Vec::new();
            for part in answer.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let index = index_in(part, options)?;
                if !picked.contains(&index) {
                    picked.push(index);
                }
            }
            Ok(picked)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn versions() -> Vec<String> {
        vec!["8.1".into(), "8.2".into(), "8.3".into()]
    }

    #[test]
    fn confirm_accepts_short_forms() {
        assert!(prompter("y\n").confirm("Proceed?").unwrap());
        assert!(prompter("YES\n").confirm("Proceed?").unwrap());
        assert!(!prompter("n\n").confirm("Proceed?").unwrap());
    }

    #[test]
    fn confirm_gives_up_as_no() {
        let p = prompter("maybe\nperhaps\n");
        assert!(!p.confirm("Proceed?").unwrap());
        let written = String::from_utf8(p.into_output()).unwrap();
        assert!(written.contains("Value \"maybe\" is invalid!"));
        assert!(written.contains("Proceed? (yes/no) [no]:"));
    }

    #[test]
    fn confirm_retries_once() {
        assert!(prompter("huh\nyes\n").confirm("Proceed?").unwrap());
    }

    #[test]
    fn end_of_input_is_cancellation() {
        let err = prompter("").confirm("Proceed?").unwrap_err();
        assert!(matches!(err, PromptError::Cancelled));
    }

    #[test]
    fn choice_by_index() {
        let picked = prompter("1\n").choice("Which?", &versions(), None).unwrap();
        assert_eq!(picked, Some(1));
    }

    #[test]
    fn choice_empty_answer_takes_default() {
        let p = prompter("\n");
        let picked = p.choice("Which?", &versions(), Some(2)).unwrap();
        assert_eq!(picked, Some(2));
        let written = String::from_utf8(p.into_output()).unwrap();
        assert!(written.starts_with("Which? [8.3]:\n [0] 8.1\n [1] 8.2\n [2] 8.3\n> "));
    }

    #[test]
    fn choice_without_default_rejects_empty_answer() {
        let picked = prompter("\n\n").choice("Which?", &versions(), None).unwrap();
        assert_eq!(picked, None);
    }

    #[test]
    fn choice_out_of_range_twice_gives_none() {
        let picked = prompter("7\nx\n").choice("Which?", &versions(), Some(0)).unwrap();
        assert_eq!(picked, None);
    }

    #[test]
    fn choice_ignores_invalid_default() {
        let p = prompter("0\n");
        p.choice("Which?", &versions(), Some(9)).unwrap();
        let written = String::from_utf8(p.into_output()).unwrap();
        assert!(written.starts_with("Which?:\n"));
    }

    #[test]
    fn choices_are_unique_and_ordered() {
        let picked = prompter("2, 0,2\n").choices("Which?", &versions(), None).unwrap();
        assert_eq!(picked, Some(vec![2, 0]));
    }

    #[test]
    fn choices_reject_any_invalid_index() {
        let picked = prompter("0,5\n1\n").choices("Which?", &versions(), None).unwrap();
        assert_eq!(picked, Some(vec![1]));
    }
}
