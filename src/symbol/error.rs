// Sat Oct 17 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("{0} symbols are not loaded")]
    NotLoaded(&'static str),
    #[error("Invalid address {0:#010x}")]
    InvalidAddress(u32),
    #[error("Address {address:#010x} is past the end of custom code at {end:#010x}")]
    OutOfRange { address: u32, end: u32 },
    #[error("No symbol at or below {0:#010x}")]
    NotFound(u32),
    #[error("Parse error on line {line}: {text:?}")]
    ParseError { line: usize, text: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
