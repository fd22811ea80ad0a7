// Sat Oct 17 2026 - Alex

use std::fmt;

/// Game release region, read from the disc header copy in low guest RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Usa,
    Pal,
    Jpn,
    Kor,
    Twn,
}

impl Region {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'E' => Some(Region::Usa),
            b'P' => Some(Region::Pal),
            b'J' => Some(Region::Jpn),
            b'K' => Some(Region::Kor),
            b'W' => Some(Region::Twn),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Region::Usa => 'E',
            Region::Pal => 'P',
            Region::Jpn => 'J',
            Region::Kor => 'K',
            Region::Twn => 'W',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Usa => "USA",
            Region::Pal => "PAL",
            Region::Jpn => "JPN",
            Region::Kor => "KOR",
            Region::Twn => "TWN",
        }
    }

    /// Where custom code is loaded when no address is supplied.
    pub fn default_custom_start(&self) -> u32 {
        match self {
            Region::Jpn => 0x807F_2948,
            Region::Usa => 0x807F_3188,
            Region::Pal => 0x807F_8888,
            Region::Kor => 0x807F_2010,
            Region::Twn => 0x807F_3450,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_codes() {
        for code in [b'E', b'P', b'J', b'K', b'W'] {
            let region = Region::from_code(code).unwrap();
            assert_eq!(region.code(), code as char);
        }
        assert_eq!(Region::from_code(b'X'), None);
        assert_eq!(Region::Pal.name(), "PAL");
        assert_eq!(Region::Usa.to_string(), "USA (E)");
    }
}
