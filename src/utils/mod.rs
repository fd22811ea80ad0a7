// Sat Oct 17 2026 - Alex

pub mod logging;
pub mod process;

pub use logging::LoggingUtils;
pub use process::ProcessUtils;

/// Parses a hexadecimal word with or without a leading `0x`.
pub fn parse_hex_u32(s: &str) -> Option<u32> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).ok()
}

/// Accepts `true`/`false` in any case and `1`/`0`.
pub fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") || s == "1" {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") || s == "0" {
        Some(false)
    } else {
        None
    }
}

pub fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_u32() {
        assert_eq!(parse_hex_u32("0x80002FF4"), Some(0x8000_2FF4));
        assert_eq!(parse_hex_u32("80002ff4"), Some(0x8000_2FF4));
        assert_eq!(parse_hex_u32("0xZZ"), None);
        assert_eq!(parse_hex_u32(""), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }
}
