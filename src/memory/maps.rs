// Sat Oct 17 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRegion, PageType, Protection, RegionEnumerator};
use std::fs;
use std::path::PathBuf;

/// Walks a `/proc/<pid>/maps` style listing one line at a time.
pub struct MapsEnumerator {
    source: Option<PathBuf>,
    listing: String,
    cursor: usize,
    finished: bool,
}

impl MapsEnumerator {
    pub fn open(pid: u32) -> Result<Self, MemoryError> {
        let path = PathBuf::from(format!("/proc/{}/maps", pid));
        let listing = fs::read_to_string(&path)?;
        Ok(Self {
            source: Some(path),
            listing,
            cursor: 0,
            finished: false,
        })
    }

    pub fn from_listing(listing: impl Into<String>) -> Self {
        Self {
            source: None,
            listing: listing.into(),
            cursor: 0,
            finished: false,
        }
    }

    fn next_line(&mut self) -> Option<&str> {
        if self.cursor >= self.listing.len() {
            return None;
        }
        let rest = &self.listing[self.cursor..];
        let len = rest.find('\n').unwrap_or(rest.len());
        self.cursor += len + 1;
        Some(&rest[..len])
    }
}

/// Splits the next whitespace-delimited field off `line`.
fn take_field(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }
    let end = line.find(char::is_whitespace).unwrap_or(line.len());
    Some(line.split_at(end))
}

/// Parses one mapping line. `None` for anything that is not a valid
/// non-empty range. The path is everything after the inode, so it keeps
/// embedded spaces and a ` (deleted)` suffix.
pub fn parse_maps_line(line: &str) -> Option<MemoryRegion> {
    let (range, rest) = take_field(line)?;
    let (start, end) = range.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    if end <= start {
        return None;
    }

    let (protection, mut rest) = match take_field(rest) {
        Some((perms, rest)) => (Protection::from_perms(perms), rest),
        None => (Protection::default(), ""),
    };
    // offset, device, inode
    for _ in 0..3 {
        rest = take_field(rest).map_or("", |(_, tail)| tail);
    }
    let path = rest.trim();

    let region = MemoryRegion::new(Address::new(start), end - start, protection)
        .with_page_type(PageType::Mapped);
    Some(match path {
        "" => region,
        path => region.with_path(path.to_string()),
    })
}

impl Iterator for MapsEnumerator {
    type Item = MemoryRegion;

    fn next(&mut self) -> Option<MemoryRegion> {
        if self.finished {
            return None;
        }
        let region = self.next_line().and_then(parse_maps_line);
        if region.is_none() {
            self.finished = true;
        }
        region
    }
}

impl RegionEnumerator for MapsEnumerator {
    fn reset(&mut self) {
        if let Some(path) = &self.source {
            match fs::read_to_string(path) {
                Ok(listing) => self.listing = listing,
                Err(e) => {
                    log::debug!("Re-reading {} failed: {}", path.display(), e);
                    self.listing.clear();
                }
            }
        }
        self.cursor = 0;
        self.finished = false;
    }
}
