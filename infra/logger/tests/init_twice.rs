use sbox_logger::{Logger, LoggerError};

#[test]
fn second_subscriber_is_refused() {
    let first = Logger::builder("strongbox")
        .filter("sbox_variables=debug,sbox_storage=warn")
        .init()
        .expect("first init should succeed");
    assert!(!first.has_file_output());

    let second = Logger::builder("strongbox-again").init();
    assert!(
        matches!(second, Err(LoggerError::Subscriber { .. })),
        "a process has exactly one global subscriber"
    );
}
