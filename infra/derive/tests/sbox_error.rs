use sbox_derive::sbox_error;
use std::borrow::Cow;

#[sbox_error]
pub enum SampleError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Flush failed{}: {source}", format_context(.context))]
    Flush { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Not found{}", format_context(.context))]
    NotFound { context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn missing_file() -> Result<(), std::io::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
}

#[test]
fn sbox_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/sbox_error_pass.rs");
}

#[test]
fn source_errors_convert_through_question_mark() {
    fn run() -> Result<(), SampleError> {
        missing_file()?;
        Ok(())
    }

    let err = run().unwrap_err();
    assert!(matches!(err, SampleError::Io { context: None, .. }));
    assert_eq!(err.to_string(), "IO error: gone");
}

#[test]
fn shared_source_type_converts_into_first_variant() {
    fn flush() -> Result<(), SampleError> {
        missing_file().map_err(|source| SampleError::Flush { source, context: None })
    }

    assert!(matches!(flush().unwrap_err(), SampleError::Flush { .. }));
    assert!(matches!(SampleError::from(missing_file().unwrap_err()), SampleError::Io { .. }));
}

#[test]
fn context_is_attached_to_foreign_results() {
    let err = missing_file().context("Opening index").unwrap_err();
    assert!(matches!(err, SampleError::Io { .. }));
    assert_eq!(err.to_string(), "IO error (Opening index): gone");
}

#[test]
fn context_overrides_on_own_results() {
    let result: Result<(), SampleError> = Err(SampleError::NotFound { context: None });
    let err = result.context("variable TOKEN").unwrap_err();
    assert_eq!(err.to_string(), "Not found (variable TOKEN)");
}

#[test]
fn strings_become_internal_errors() {
    let from_static: SampleError = "broken invariant".into();
    let from_owned: SampleError = format!("broken {}", 42).into();

    assert!(matches!(from_static, SampleError::Internal { .. }));
    assert_eq!(from_owned.to_string(), "Internal error: broken 42");
}
