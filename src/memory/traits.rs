// Fri Oct 16 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRegion};

/// Base and size of the emulator's main executable image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    pub base: Address,
    pub size: u64,
}

/// Lazy, restartable walk over a process's regions.
///
/// A failed OS query ends the walk instead of surfacing an error; callers
/// retry by resetting and walking again.
pub trait RegionEnumerator: Iterator<Item = MemoryRegion> {
    fn reset(&mut self);
}

/// OS boundary for one attached emulator process.
pub trait ProcessAccess: Send + Sync {
    fn pid(&self) -> u32;

    fn is_alive(&self) -> bool;

    fn main_module(&self) -> ModuleInfo;

    /// Width in bytes of a host pointer inside the target.
    fn pointer_width(&self) -> usize {
        std::mem::size_of::<usize>()
    }

    fn read_bytes(&self, addr: Address, buffer: &mut [u8]) -> Result<(), MemoryError>;

    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError>;

    fn regions(&self) -> Box<dyn RegionEnumerator + '_>;

    /// Whether the page at `addr` is in the working set. `None` when the
    /// platform has no such query.
    fn is_resident(&self, addr: Address) -> Option<bool>;

    fn read_image(&self) -> Result<Vec<u8>, MemoryError> {
        let module = self.main_module();
        let mut image = vec![0u8; module.size as usize];
        self.read_bytes(module.base, &mut image)?;
        Ok(image)
    }

    fn read_pointer(&self, addr: Address) -> Result<Address, MemoryError> {
        let width = self.pointer_width();
        let mut bytes = [0u8; 8];
        self.read_bytes(addr, &mut bytes[..width])?;
        Ok(Address::new(decode_pointer(&bytes[..width])))
    }
}

/// Decodes a native-endian host pointer of 4 or 8 bytes.
pub fn decode_pointer(bytes: &[u8]) -> u64 {
    match bytes.len() {
        4 => u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64,
        _ => {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[..8]);
            u64::from_ne_bytes(word)
        }
    }
}
