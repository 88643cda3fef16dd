//! Yes/no prompts on the terminal.

use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stderr and read the answer from stdin.
///
/// Only `y`/`yes` (any case) count as yes; end of input counts as no.
///
/// # Errors
///
/// Returns an I/O error if the terminal cannot be written or read.
pub fn confirm(question: &str) -> io::Result<bool> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{question} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

/// Ask unless `assume_yes` is set.
///
/// # Errors
///
/// Returns an I/O error if the terminal cannot be written or read.
pub fn confirm_or_assume(question: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    confirm(question)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
