//! Interactive yes/no confirmation.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{CommandError, Result};

/// Asks `question` until the user answers yes or no.
///
/// Accepts `y`/`yes`/`n`/`no` in any case. Any other line, including one that
/// is not valid UTF-8, re-asks without a retry limit. End of input is taken
/// as "no".
pub fn confirm<R, W>(question: &str, input: &mut R, output: &mut W) -> Result<bool>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let mut line = Vec::new();
    loop {
        write!(output, "{question} (y/n): ")?;
        output.flush()?;

        line.clear();
        if input.read_until(b'\n', &mut line).map_err(CommandError::Input)? == 0 {
            writeln!(output)?;
            debug!(question, "Input closed before confirmation, declining");
            return Ok(false);
        }

        match String::from_utf8_lossy(&line).trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Invalid input. Please enter 'y' or 'n'.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answers: &str) -> (bool, String) {
        ask_bytes(answers.as_bytes())
    }

    fn ask_bytes(mut input: &[u8]) -> (bool, String) {
        let mut output = Vec::new();
        let answer = confirm("Delete?", &mut input, &mut output).unwrap();
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_accepts_yes_variants() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(ask("  Yes  \r\n").0);
    }

    #[test]
    fn test_accepts_no_variants() {
        assert!(!ask("n\n").0);
        assert!(!ask("No\n").0);
    }

    #[test]
    fn test_reprompts_on_invalid_input() {
        let (answer, output) = ask("maybe\n\nyes\n");
        assert!(answer);
        assert_eq!(output.matches("Delete? (y/n): ").count(), 3);
        assert_eq!(
            output.matches("Invalid input. Please enter 'y' or 'n'.").count(),
            2
        );
    }

    #[test]
    fn test_reprompts_on_non_utf8_line() {
        let (answer, output) = ask_bytes(b"\xff\xfe\n y\n");
        assert!(answer);
        assert_eq!(output.matches("Delete? (y/n): ").count(), 2);
        assert_eq!(
            output.matches("Invalid input. Please enter 'y' or 'n'.").count(),
            1
        );
    }

    #[test]
    fn test_read_failure_is_an_input_error() {
        struct Broken;

        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("stdin gone"))
            }
        }

        let mut input = std::io::BufReader::new(Broken);
        let mut output = Vec::new();
        let err = confirm("Delete?", &mut input, &mut output).unwrap_err();
        assert!(matches!(err, CommandError::Input(_)));
        assert_eq!(err.to_string(), "Failed to read input: stdin gone");
    }

    #[test]
    fn test_end_of_input_declines() {
        let (answer, output) = ask("perhaps\n");
        assert!(!answer);
        assert_eq!(output.matches("Delete? (y/n): ").count(), 2);
    }
}
