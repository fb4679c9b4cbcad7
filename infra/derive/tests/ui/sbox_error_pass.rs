use sbox_derive::sbox_error;
use std::borrow::Cow;

#[sbox_error]
pub enum ArchiveError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Checksum read failed{}: {source}", format_context(.context))]
    Checksum { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Missing entry{}: {name}", format_context(.context))]
    Missing { name: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<Vec<u8>, ArchiveError> {
    std::fs::read("/nonexistent").context("Reading archive")
}

fn main() {
    let _ = read();
}
