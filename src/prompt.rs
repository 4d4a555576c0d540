use std::io::{self, BufRead, Write};

/// Yes/no question asked before destructive work.
pub trait Prompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Asks on a writer and reads the answer from a line-based reader.
/// Defaults to "no": only `y`/`yes` (any case) confirm; EOF declines.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{} (yes/no) [no]: ", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            writeln!(self.output)?;
            return Ok(false);
        }

        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(input: &str) -> (bool, String) {
        let mut prompt = TerminalPrompt::new(input.as_bytes(), Vec::new());
        let answer = prompt.confirm("Continue?").unwrap();
        (answer, String::from_utf8(prompt.into_output()).unwrap())
    }

    #[test]
    fn test_yes_answers_confirm() {
        assert!(ask("y\n").0);
        assert!(ask("yes\n").0);
        assert!(ask("  YES  \n").0);
    }

    #[test]
    fn test_anything_else_declines() {
        assert!(!ask("\n").0);
        assert!(!ask("no\n").0);
        assert!(!ask("yep\n").0);
        assert!(!ask("").0, "EOF declines");
    }

    #[test]
    fn test_question_is_written_with_default() {
        let (_, out) = ask("n\n");
        assert_eq!(out, "Continue? (yes/no) [no]: ");
    }
}
