// Fri Oct 16 2026 - Alex

use crate::memory::{Address, Protection};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageType {
    Private,
    Mapped,
    Image,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    Committed,
    Reserved,
    Free,
    Unknown,
}

/// One contiguous range of the target's virtual address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    base: Address,
    size: u64,
    protection: Protection,
    page_type: PageType,
    state: PageState,
    path: Option<String>,
}

impl MemoryRegion {
    pub fn new(base: Address, size: u64, protection: Protection) -> Self {
        Self {
            base,
            size,
            protection,
            page_type: PageType::Mapped,
            state: PageState::Committed,
            path: None,
        }
    }

    pub fn with_page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    pub fn with_state(mut self, state: PageState) -> Self {
        self.state = state;
        self
    }

    pub fn with_path(mut self, path: String) -> Self {
        self.path = Some(path);
        self
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn end(&self) -> Address {
        self.base + self.size
    }

    pub fn protection(&self) -> Protection {
        self.protection
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.base && addr < self.end()
    }

    pub fn is_mapped(&self) -> bool {
        self.page_type == PageType::Mapped
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {} {:?} {:?} {}",
            self.base,
            self.end(),
            self.protection,
            self.page_type,
            self.state,
            self.path.as_deref().unwrap_or("")
        )
    }
}
