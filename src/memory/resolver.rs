// Sat Oct 17 2026 - Alex

use crate::memory::guest::GUEST_RAM_SIZE;
use crate::memory::{scan, Address, MemoryError, MemoryRegion, ProcessAccess};
use crate::utils::logging::scoped_timer;
use parking_lot::Mutex;

/// Locates the host address of guest RAM.
///
/// The first call walks every region of the target looking for the RAM
/// mapping, then searches the main image for the static pointer the
/// emulator keeps to that mapping. Later calls only re-read that pointer,
/// so a remapped RAM block is still followed.
pub struct BaseResolver {
    slot: Mutex<Option<Address>>,
    ram_size: u64,
}

impl BaseResolver {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            ram_size: GUEST_RAM_SIZE,
        }
    }

    pub fn with_ram_size(mut self, ram_size: u64) -> Self {
        self.ram_size = ram_size;
        self
    }

    pub fn pointer_slot(&self) -> Option<Address> {
        *self.slot.lock()
    }

    pub fn resolve(&self, process: &dyn ProcessAccess) -> Result<Address, MemoryError> {
        let cached = *self.slot.lock();
        if let Some(slot) = cached {
            let base = process.read_pointer(slot)?;
            if base.is_null() {
                return Err(MemoryError::TranslationUnavailable);
            }
            return Ok(base);
        }
        self.discover(process)
    }

    fn discover(&self, process: &dyn ProcessAccess) -> Result<Address, MemoryError> {
        let _timer = scoped_timer("guest RAM discovery");

        let region = self.find_ram_region(process)?;
        log::debug!("Guest RAM region found at {}", region.base());

        let module = process.main_module();
        let image = process.read_image()?;
        match scan::find_pointer(&image, region.base().as_u64(), process.pointer_width()) {
            Some(offset) => {
                let slot = module.base + offset as u64;
                log::info!("Guest RAM pointer slot at {} (module + {:#x})", slot, offset);
                *self.slot.lock() = Some(slot);
            }
            None => {
                log::warn!(
                    "No pointer to guest RAM in the main module, discovery will repeat on next access"
                );
            }
        }
        Ok(region.base())
    }

    /// First mapped region of exactly the guest RAM size whose first page
    /// is resident. Residency is only checked where the platform reports it.
    pub fn find_ram_region(&self, process: &dyn ProcessAccess) -> Result<MemoryRegion, MemoryError> {
        let mut regions = process.regions();
        regions
            .find(|region| {
                region.size() == self.ram_size
                    && region.is_mapped()
                    && process.is_resident(region.base()).unwrap_or(true)
            })
            .ok_or(MemoryError::RegionNotFound)
    }
}

impl Default for BaseResolver {
    fn default() -> Self {
        Self::new()
    }
}
