// Sat Oct 17 2026 - Alex

//! In-memory stand-in for an emulator process, used by the unit tests.

use crate::memory::{
    Address, MemoryError, MemoryRegion, ModuleInfo, PageType, ProcessAccess, Protection,
    RegionEnumerator,
};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub const MODULE_BASE: u64 = 0x1_4000_0000;
pub const MODULE_SIZE: u64 = 0x2000;
pub const SLOT_OFFSET: u64 = 0x1235;
pub const RAM_BASE: u64 = 0x7f00_0000_0000;
pub const RAM_SIZE: u64 = 0x0200_0000;

struct Segment {
    base: u64,
    bytes: Vec<u8>,
}

pub struct SimulatedProcess {
    module: ModuleInfo,
    segments: RwLock<Vec<Segment>>,
    regions: RwLock<Vec<MemoryRegion>>,
    resident: RwLock<Option<HashSet<u64>>>,
    alive: AtomicBool,
    enumerations: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
    image_reads: AtomicUsize,
}

impl SimulatedProcess {
    pub fn new() -> Self {
        let process = Self {
            module: ModuleInfo { base: Address::new(MODULE_BASE), size: MODULE_SIZE },
            segments: RwLock::new(Vec::new()),
            regions: RwLock::new(Vec::new()),
            resident: RwLock::new(None),
            alive: AtomicBool::new(true),
            enumerations: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            image_reads: AtomicUsize::new(0),
        };
        process.map(MODULE_BASE, MODULE_SIZE as usize);
        process.add_region(
            MemoryRegion::new(Address::new(MODULE_BASE), MODULE_SIZE, Protection::READ)
                .with_page_type(PageType::Image),
        );
        process
    }

    /// A process whose main image holds a pointer slot to a mapped 32 MiB
    /// guest RAM block, next to a few decoy regions.
    pub fn dolphin() -> Self {
        let process = Self::new();
        process.add_region(
            MemoryRegion::new(Address::new(0x10_0000), 0x1000, Protection::READ | Protection::WRITE)
                .with_page_type(PageType::Mapped),
        );
        process.add_region(
            MemoryRegion::new(Address::new(0x20_0000), RAM_SIZE, Protection::READ | Protection::WRITE)
                .with_page_type(PageType::Private),
        );
        process.map_guest_ram(RAM_BASE);
        process.poke(MODULE_BASE + SLOT_OFFSET, &RAM_BASE.to_ne_bytes());
        process
    }

    pub fn map(&self, base: u64, size: usize) {
        self.segments.write().push(Segment { base, bytes: vec![0u8; size] });
    }

    pub fn map_guest_ram(&self, base: u64) {
        self.map(base, RAM_SIZE as usize);
        self.add_region(
            MemoryRegion::new(Address::new(base), RAM_SIZE, Protection::READ | Protection::WRITE)
                .with_page_type(PageType::Mapped),
        );
    }

    pub fn add_region(&self, region: MemoryRegion) {
        self.regions.write().push(region);
    }

    pub fn clear_regions(&self) {
        self.regions.write().clear();
    }

    pub fn enable_residency(&self) {
        *self.resident.write() = Some(HashSet::new());
    }

    pub fn mark_resident(&self, addr: u64) {
        if let Some(set) = self.resident.write().as_mut() {
            set.insert(addr);
        }
    }

    pub fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn poke(&self, addr: u64, data: &[u8]) {
        let mut segments = self.segments.write();
        let segment = segments
            .iter_mut()
            .find(|s| addr >= s.base && addr + data.len() as u64 <= s.base + s.bytes.len() as u64)
            .expect("poke outside mapped memory");
        let start = (addr - segment.base) as usize;
        segment.bytes[start..start + data.len()].copy_from_slice(data);
    }

    pub fn peek(&self, addr: u64, len: usize) -> Vec<u8> {
        let mut buffer = vec![0u8; len];
        self.copy_out(addr, &mut buffer).expect("peek outside mapped memory");
        buffer
    }

    pub fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn image_reads(&self) -> usize {
        self.image_reads.load(Ordering::SeqCst)
    }

    fn copy_out(&self, addr: u64, buffer: &mut [u8]) -> Option<()> {
        let segments = self.segments.read();
        let segment = segments.iter().find(|s| {
            addr >= s.base && addr + buffer.len() as u64 <= s.base + s.bytes.len() as u64
        })?;
        let start = (addr - segment.base) as usize;
        buffer.copy_from_slice(&segment.bytes[start..start + buffer.len()]);
        Some(())
    }
}

struct SnapshotEnumerator {
    regions: Vec<MemoryRegion>,
    cursor: usize,
}

impl Iterator for SnapshotEnumerator {
    type Item = MemoryRegion;

    fn next(&mut self) -> Option<MemoryRegion> {
        let region = self.regions.get(self.cursor).cloned();
        self.cursor += 1;
        region
    }
}

impl RegionEnumerator for SnapshotEnumerator {
    fn reset(&mut self) {
        self.cursor = 0;
    }
}

impl ProcessAccess for SimulatedProcess {
    fn pid(&self) -> u32 {
        4242
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn main_module(&self) -> ModuleInfo {
        self.module
    }

    fn pointer_width(&self) -> usize {
        8
    }

    fn read_bytes(&self, addr: Address, buffer: &mut [u8]) -> Result<(), MemoryError> {
        if !self.is_alive() {
            return Err(MemoryError::ProcessClosed);
        }
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.copy_out(addr.as_u64(), buffer)
            .ok_or(MemoryError::ReadFailed(addr.as_u64()))
    }

    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        if !self.is_alive() {
            return Err(MemoryError::ProcessClosed);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut segments = self.segments.write();
        let a = addr.as_u64();
        let segment = segments
            .iter_mut()
            .find(|s| a >= s.base && a + data.len() as u64 <= s.base + s.bytes.len() as u64)
            .ok_or(MemoryError::WriteFailed(a))?;
        let start = (a - segment.base) as usize;
        segment.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn regions(&self) -> Box<dyn RegionEnumerator + '_> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        Box::new(SnapshotEnumerator {
            regions: self.regions.read().clone(),
            cursor: 0,
        })
    }

    fn is_resident(&self, addr: Address) -> Option<bool> {
        self.resident
            .read()
            .as_ref()
            .map(|set| set.contains(&addr.as_u64()))
    }

    fn read_image(&self) -> Result<Vec<u8>, MemoryError> {
        self.image_reads.fetch_add(1, Ordering::SeqCst);
        let mut image = vec![0u8; self.module.size as usize];
        self.read_bytes(self.module.base, &mut image)?;
        Ok(image)
    }
}
