// Sat Oct 17 2026 - Alex

pub mod error;
pub mod table;

pub use error::SymbolError;
pub use table::{SymbolLookup, SymbolTable};
