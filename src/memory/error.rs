// Fri Oct 16 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Emulator process is closed")]
    ProcessClosed,
    #[error("Guest RAM region not found, the game may still be booting")]
    RegionNotFound,
    #[error("Guest RAM mapping is currently unavailable")]
    TranslationUnavailable,
    #[error("Access of {length} bytes at offset {offset} overflows a {capacity} byte buffer")]
    Overflow {
        offset: u32,
        length: u32,
        capacity: u32,
    },
    #[error("Invalid guest address 0x{0:08X}")]
    InvalidAddress(u32),
    #[error("Read failed at host address 0x{0:x}")]
    ReadFailed(u64),
    #[error("Write failed at host address 0x{0:x}")]
    WriteFailed(u64),
    #[error("Process not found: {0}")]
    ProcessNotFound(String),
    #[error("Main module not found: {0}")]
    ModuleNotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl MemoryError {
    /// Whether waiting and retrying the same operation can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RegionNotFound | Self::TranslationUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds() {
        assert!(MemoryError::RegionNotFound.is_transient());
        assert!(MemoryError::TranslationUnavailable.is_transient());
        assert!(!MemoryError::ProcessClosed.is_transient());
        assert!(!MemoryError::InvalidAddress(0).is_transient());
        assert!(!MemoryError::Overflow { offset: 2, length: 4, capacity: 4 }.is_transient());
    }

    #[test]
    fn test_overflow_message() {
        let err = MemoryError::Overflow { offset: 2, length: 4, capacity: 4 };
        assert_eq!(err.to_string(), "Access of 4 bytes at offset 2 overflows a 4 byte buffer");
    }
}
