use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Check if the inquire error is a user cancellation/interruption.
const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Turns a cancelled prompt (Ctrl+C or Escape) into `Ok(None)`.
///
/// A newline is printed on cancellation to leave the terminal tidy; other
/// prompt errors are propagated.
pub fn answer_or_cancel<T>(answer: Result<T, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_prompt_cancelled(&e) => {
            println!();
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Prints a user-facing failure on stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_is_passed_through() {
        let answer = answer_or_cancel(Ok("hola".to_string())).unwrap();
        assert_eq!(answer.as_deref(), Some("hola"));
    }

    #[test]
    fn test_cancelled_prompt_is_none() {
        assert!(
            answer_or_cancel::<String>(Err(InquireError::OperationCanceled))
                .unwrap()
                .is_none()
        );
        assert!(
            answer_or_cancel::<String>(Err(InquireError::OperationInterrupted))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_other_prompt_errors_propagate() {
        let result = answer_or_cancel::<String>(Err(InquireError::Custom("broken".into())));
        let Err(err) = result else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_is_prompt_cancelled_other_error() {
        let err = InquireError::NotTTY;
        assert!(!is_prompt_cancelled(&err));
    }
}
