// Fri Oct 16 2026 - Alex

use bitflags::bitflags;
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Protection: u32 {
        const READ = 1;
        const WRITE = 2;
        const EXECUTE = 4;
        const GUARD = 8;
    }
}

impl Protection {
    /// Parses the `rwxp` permission column of a mapping listing.
    pub fn from_perms(perms: &str) -> Self {
        let mut protection = Self::empty();
        for (i, c) in perms.chars().take(3).enumerate() {
            match (i, c) {
                (0, 'r') => protection |= Self::READ,
                (1, 'w') => protection |= Self::WRITE,
                (2, 'x') => protection |= Self::EXECUTE,
                _ => {}
            }
        }
        protection
    }

    /// Maps Win32 `PAGE_*` protection constants.
    pub fn from_page_flags(flags: u32) -> Self {
        let mut protection = match flags & 0xFF {
            0x02 => Self::READ,
            0x04 | 0x08 => Self::READ | Self::WRITE,
            0x10 => Self::EXECUTE,
            0x20 => Self::READ | Self::EXECUTE,
            0x40 | 0x80 => Self::READ | Self::WRITE | Self::EXECUTE,
            _ => Self::empty(),
        };
        if flags & 0x100 != 0 {
            protection |= Self::GUARD;
        }
        protection
    }

    pub fn can_read(self) -> bool {
        self.contains(Self::READ) && !self.contains(Self::GUARD)
    }

    pub fn can_write(self) -> bool {
        self.contains(Self::WRITE) && !self.contains(Self::GUARD)
    }

    pub fn can_execute(self) -> bool {
        self.contains(Self::EXECUTE)
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.contains(Self::READ) { 'r' } else { '-' },
            if self.contains(Self::WRITE) { 'w' } else { '-' },
            if self.contains(Self::EXECUTE) { 'x' } else { '-' },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_perms() {
        let p = Protection::from_perms("rw-s");
        assert!(p.can_read());
        assert!(p.can_write());
        assert!(!p.can_execute());
        assert_eq!(p.to_string(), "rw-");
        assert_eq!(Protection::from_perms("---p"), Protection::empty());
    }

    #[test]
    fn test_from_page_flags() {
        assert_eq!(Protection::from_page_flags(0x04), Protection::READ | Protection::WRITE);
        assert_eq!(Protection::from_page_flags(0x20).to_string(), "r-x");
        let guarded = Protection::from_page_flags(0x104);
        assert!(!guarded.can_read());
        assert_eq!(Protection::from_page_flags(0x01), Protection::empty());
    }
}
