// Sat Oct 17 2026 - Alex

pub mod address;
pub mod buffer;
pub mod value;

pub use address::TypedAddress;
pub use buffer::{BufferAddress, StringEncoding};
pub use value::GuestValue;

use crate::memory::guest::{guest_offset, is_valid_guest_span};
use crate::memory::{Address, BaseResolver, MemoryError, ProcessAccess};
use std::sync::Arc;

/// One attachment to a running emulator.
///
/// Every access re-resolves the host location of guest RAM, so values
/// handed out by [`EmulatorBridge::address`] and [`EmulatorBridge::buffer`]
/// stay valid across remaps.
pub struct EmulatorBridge {
    process: Arc<dyn ProcessAccess>,
    resolver: BaseResolver,
}

impl EmulatorBridge {
    #[cfg(any(target_os = "linux", windows))]
    pub fn attach(pid: u32) -> Result<Self, MemoryError> {
        let process = crate::memory::NativeProcess::attach(pid)?;
        log::info!("Attached to emulator process {}", pid);
        Ok(Self::with_process(Arc::new(process)))
    }

    pub fn with_process(process: Arc<dyn ProcessAccess>) -> Self {
        Self {
            process,
            resolver: BaseResolver::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: BaseResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn process(&self) -> &Arc<dyn ProcessAccess> {
        &self.process
    }

    pub fn pid(&self) -> u32 {
        self.process.pid()
    }

    pub fn is_open(&self) -> bool {
        self.process.is_alive()
    }

    pub fn ensure_open(&self) -> Result<(), MemoryError> {
        if !self.process.is_alive() {
            return Err(MemoryError::ProcessClosed);
        }
        Ok(())
    }

    /// Host address of guest RAM's first byte.
    pub fn ram_base(&self) -> Result<Address, MemoryError> {
        self.resolver.resolve(self.process.as_ref())
    }

    pub fn pointer_slot(&self) -> Option<Address> {
        self.resolver.pointer_slot()
    }

    pub fn translate(&self, guest: u32) -> Result<Address, MemoryError> {
        self.translate_span(guest, 1)
    }

    pub fn translate_span(&self, guest: u32, len: u32) -> Result<Address, MemoryError> {
        check_span(guest, len)?;
        Ok(self.ram_base()? + guest_offset(guest))
    }

    /// Validates, then checks liveness, then resolves.
    fn host_span(&self, guest: u32, len: usize) -> Result<Address, MemoryError> {
        let len = u32::try_from(len).map_err(|_| MemoryError::InvalidAddress(guest))?;
        check_span(guest, len)?;
        self.ensure_open()?;
        Ok(self.ram_base()? + guest_offset(guest))
    }

    /// Copies guest bytes as-is, without any byte swapping.
    pub fn read_raw(&self, guest: u32, buffer: &mut [u8]) -> Result<(), MemoryError> {
        let host = self.host_span(guest, buffer.len())?;
        self.process.read_bytes(host, buffer)
    }

    pub fn write_raw(&self, guest: u32, data: &[u8]) -> Result<(), MemoryError> {
        let host = self.host_span(guest, data.len())?;
        self.process.write_bytes(host, data)
    }

    pub fn address(&self, guest: u32) -> TypedAddress<'_> {
        TypedAddress::new(self, guest)
    }

    pub fn buffer(&self, guest: u32, size: u32) -> BufferAddress<'_> {
        BufferAddress::new(self, guest, size)
    }
}

fn check_span(guest: u32, len: u32) -> Result<(), MemoryError> {
    if !is_valid_guest_span(guest, len) {
        return Err(MemoryError::InvalidAddress(guest));
    }
    Ok(())
}
