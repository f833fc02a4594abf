//! Yes/no questions on the terminal.
//!
//! Prompts go to stderr so that `--json` output on stdout stays parseable.

use std::io::{self, BufRead, Write};

/// Ask `question` on stderr and read the answer from stdin. Anything other
/// than "y" or "yes" (any case), including a read failure, counts as no.
pub fn confirm(question: &str) -> bool {
    let stdin = io::stdin();
    let stderr = io::stderr();
    ask(&mut stdin.lock(), &mut stderr.lock(), question).unwrap_or(false)
}

pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "{question} [Y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> bool {
        let mut input = io::Cursor::new(text.as_bytes().to_vec());
        let mut output = Vec::new();
        ask(&mut input, &mut output, "Continue?").unwrap()
    }

    #[test]
    fn yes_answers() {
        assert!(answer("y\n"));
        assert!(answer("Y\n"));
        assert!(answer("  yes \r\n"));
    }

    #[test]
    fn everything_else_is_no() {
        assert!(!answer("n\n"));
        assert!(!answer("\n"));
        assert!(!answer(""));
        assert!(!answer("yep\n"));
    }

    #[test]
    fn question_is_written() {
        let mut input = io::Cursor::new(b"n\n".to_vec());
        let mut output = Vec::new();
        ask(&mut input, &mut output, "Show instructions?").unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Show instructions? [Y/N] ");
    }
}
