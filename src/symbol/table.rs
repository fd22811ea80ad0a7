// Sat Oct 17 2026 - Alex

use crate::memory::guest::{is_valid_guest_address, GUEST_SPACE_END, GUEST_SPACE_ORIGIN};
use crate::symbol::SymbolError;
use crate::toolkit::Region;
use crate::utils::parse_hex_u32;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Lines at the top of a custom code link map that carry no symbols.
const CUSTOM_MAP_HEADER_LINES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolLookup {
    pub name: String,
    pub address: u32,
}

impl SymbolLookup {
    pub fn offset_of(&self, address: u32) -> u32 {
        address.wrapping_sub(self.address)
    }
}

impl fmt::Display for SymbolLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:08X}", self.name, self.address)
    }
}

/// Names for guest code addresses: the base game's symbols below the
/// custom code start, the custom link map above it.
pub struct SymbolTable {
    region: Region,
    base: Option<BTreeMap<u32, String>>,
    custom: Option<BTreeMap<u32, String>>,
    custom_start: u32,
    custom_end: u32,
}

impl SymbolTable {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            base: None,
            custom: None,
            custom_start: region.default_custom_start(),
            custom_end: GUEST_SPACE_END,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn custom_range(&self) -> (u32, u32) {
        (self.custom_start, self.custom_end)
    }

    pub fn base_len(&self) -> usize {
        self.base.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn custom_len(&self) -> usize {
        self.custom.as_ref().map_or(0, BTreeMap::len)
    }

    /// Parses `name=0xADDRESS` lines. Lines without `=` are skipped.
    pub fn load_base<R: BufRead>(&mut self, reader: R) -> Result<usize, SymbolError> {
        let mut symbols = BTreeMap::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let Some((name, address)) = line.split_once('=') else {
                continue;
            };
            let address = parse_hex_u32(address.trim()).ok_or_else(|| SymbolError::ParseError {
                line: index + 1,
                text: line.clone(),
            })?;
            symbols.insert(address, name.trim().to_string());
        }

        let count = symbols.len();
        log::info!("Loaded {} base symbols for {}", count, self.region);
        self.base = Some(symbols);
        Ok(count)
    }

    pub fn load_base_file(&mut self, path: &Path) -> Result<usize, SymbolError> {
        self.load_base(BufReader::new(File::open(path)?))
    }

    pub fn set_custom_start(&mut self, address: u32) -> Result<(), SymbolError> {
        if !is_valid_guest_address(address) {
            return Err(SymbolError::InvalidAddress(address));
        }
        self.custom_start = address;
        Ok(())
    }

    pub fn use_default_custom_start(&mut self) {
        self.custom_start = self.region.default_custom_start();
        self.custom_end = GUEST_SPACE_END;
    }

    /// Parses a custom code link map. Each entry is `<offset> <size> <name>`
    /// in hex after a two character indent, with offsets relative to the
    /// custom code start. The custom range then ends just past the last entry.
    pub fn load_custom<R: BufRead>(&mut self, reader: R) -> Result<usize, SymbolError> {
        let mut symbols = BTreeMap::new();
        let mut end = self.custom_start;

        for (index, line) in reader.lines().enumerate().skip(CUSTOM_MAP_HEADER_LINES) {
            let line = line?;
            let Some(entry) = line.get(2..) else {
                continue;
            };
            let parts: Vec<&str> = entry.splitn(3, ' ').collect();
            let [offset, size, name] = parts.as_slice() else {
                continue;
            };

            let parse_error = || SymbolError::ParseError {
                line: index + 1,
                text: line.clone(),
            };
            let offset = parse_hex_u32(offset).ok_or_else(parse_error)?;
            let size = parse_hex_u32(size).ok_or_else(parse_error)?;
            let address = self.custom_start.checked_add(offset).ok_or_else(parse_error)?;

            symbols.insert(address, name.to_string());
            end = address.wrapping_add(size).wrapping_add(4);
        }

        let count = symbols.len();
        self.custom_end = end;
        self.custom = Some(symbols);
        log::info!(
            "Loaded {} custom symbols, range {:#010x} - {:#010x}",
            count,
            self.custom_start,
            self.custom_end
        );
        Ok(count)
    }

    pub fn load_custom_file(&mut self, path: &Path) -> Result<usize, SymbolError> {
        self.load_custom(BufReader::new(File::open(path)?))
    }

    pub fn unload(&mut self) {
        self.base = None;
        self.custom = None;
    }

    /// Nearest symbol at or below `address`.
    pub fn lookup(&self, address: u32) -> Result<SymbolLookup, SymbolError> {
        let base = self.base.as_ref().ok_or(SymbolError::NotLoaded("Base"))?;
        if !is_valid_guest_address(address) {
            return Err(SymbolError::InvalidAddress(address));
        }

        if address < self.custom_start {
            return nearest(base, GUEST_SPACE_ORIGIN, address);
        }

        let custom = self.custom.as_ref().ok_or(SymbolError::NotLoaded("Custom code"))?;
        if address > self.custom_end {
            return Err(SymbolError::OutOfRange { address, end: self.custom_end });
        }
        nearest(custom, self.custom_start, address)
    }

    pub fn try_lookup(&self, address: u32) -> Option<SymbolLookup> {
        self.lookup(address).ok()
    }
}

fn nearest(symbols: &BTreeMap<u32, String>, floor: u32, address: u32) -> Result<SymbolLookup, SymbolError> {
    symbols
        .range(floor..=address)
        .next_back()
        .map(|(&address, name)| SymbolLookup { name: name.clone(), address })
        .ok_or(SymbolError::NotFound(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "\
__start=0x80004000
main=0x80004100
# comment without separator
GameScene::update=0x80451230
";

    const CUSTOM: &str = "\
  .text section layout
  Starting        Virtual
  00000000 000010 MyActor::init
  00000010 000024 MyActor::movement
";

    fn loaded() -> SymbolTable {
        let mut table = SymbolTable::new(Region::Usa);
        table.load_base(BASE.as_bytes()).unwrap();
        table
    }

    #[test]
    fn test_load_base() {
        let table = loaded();
        assert_eq!(table.base_len(), 3);
        let hit = table.lookup(0x80004100).unwrap();
        assert_eq!(hit, SymbolLookup { name: "main".into(), address: 0x80004100 });
    }

    #[test]
    fn test_lookup_nearest_below() {
        let table = loaded();
        let hit = table.lookup(0x80004188).unwrap();
        assert_eq!(hit.name, "main");
        assert_eq!(hit.offset_of(0x80004188), 0x88);
        assert!(matches!(table.lookup(0x80003000), Err(SymbolError::NotFound(_))));
    }

    #[test]
    fn test_lookup_requires_base() {
        let table = SymbolTable::new(Region::Jpn);
        assert!(matches!(table.lookup(0x80004000), Err(SymbolError::NotLoaded(_))));
    }

    #[test]
    fn test_lookup_rejects_invalid_address() {
        let table = loaded();
        assert!(matches!(table.lookup(0x7000_0000), Err(SymbolError::InvalidAddress(_))));
    }

    #[test]
    fn test_bad_base_line() {
        let mut table = SymbolTable::new(Region::Usa);
        let err = table.load_base("ok=0x80000000\nbad=zz\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SymbolError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_custom_map() {
        let mut table = loaded();
        table.set_custom_start(0x8100_0000).unwrap();
        assert_eq!(table.load_custom(CUSTOM.as_bytes()).unwrap(), 2);
        assert_eq!(table.custom_range(), (0x8100_0000, 0x8100_0010 + 0x24 + 4));

        let hit = table.lookup(0x8100_0014).unwrap();
        assert_eq!(hit.name, "MyActor::movement");
        assert_eq!(table.lookup(0x80FF_FFFF).unwrap().name, "GameScene::update");
        assert!(matches!(table.lookup(0x8100_0040), Err(SymbolError::OutOfRange { .. })));
    }

    #[test]
    fn test_custom_range_needs_custom_symbols() {
        let table = loaded();
        let start = Region::Usa.default_custom_start();
        assert_eq!(table.custom_range(), (start, GUEST_SPACE_END));
        assert!(matches!(table.lookup(start), Err(SymbolError::NotLoaded(_))));
    }

    #[test]
    fn test_custom_start_validation_and_default() {
        let mut table = SymbolTable::new(Region::Pal);
        assert!(table.set_custom_start(0x1000).is_err());
        table.set_custom_start(0x8100_0000).unwrap();
        table.use_default_custom_start();
        assert_eq!(table.custom_range(), (0x807F_8888, GUEST_SPACE_END));
    }

    #[test]
    fn test_unload() {
        let mut table = loaded();
        table.unload();
        assert_eq!(table.base_len(), 0);
        assert!(table.try_lookup(0x80004000).is_none());
    }
}
