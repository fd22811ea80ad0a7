// Sat Oct 17 2026 - Alex

use crate::memory::MemoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("Game is not currently running: {0}")]
    GameNotRunning(#[source] MemoryError),

    #[error("Unknown region code {0:#04x}")]
    UnknownRegion(u8),

    #[error("Control block is not set up yet, wait for the strap screen to end")]
    ControlBlockUnavailable,

    #[error("Control block pointer {0:#010x} is outside guest memory")]
    InvalidControlBlock(u32),

    #[error("An opcode holds at most 3 parameters, got {0}")]
    TooManyParams(usize),

    #[error("Game message {0:#010x} is not a valid OSContext pointer")]
    InvalidContext(u32),
}

impl ToolkitError {
    /// Whether waiting for the guest and retrying can succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ToolkitError::ControlBlockUnavailable => true,
            ToolkitError::Memory(e) | ToolkitError::GameNotRunning(e) => e.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds() {
        assert!(ToolkitError::ControlBlockUnavailable.is_transient());
        assert!(ToolkitError::Memory(MemoryError::TranslationUnavailable).is_transient());
        assert!(!ToolkitError::Memory(MemoryError::ProcessClosed).is_transient());
        assert!(!ToolkitError::TooManyParams(4).is_transient());
    }
}
