//! Regular expression pattern wrapper
//!
//! Flag characters map one-to-one onto a fixed set of option bits. An
//! unrecognized flag character is a construction-time failure; it is never
//! silently dropped.

use std::fmt;

use crate::error::ConvertError;

/// Regex option bits.
///
/// The bit assignments are internal; only the flag characters are contract.
/// Canonical character order on re-derivation is `ilmsux`, matching the order
/// BSON stores regex options in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegexFlags(u8);

impl RegexFlags {
    /// `i` - case-insensitive matching
    pub const CASE_INSENSITIVE: Self = Self(0x01);
    /// `l` - locale-dependent matching
    pub const LOCALE: Self = Self(0x02);
    /// `m` - multiline matching
    pub const MULTILINE: Self = Self(0x04);
    /// `s` - dot matches newlines
    pub const DOT_ALL: Self = Self(0x08);
    /// `u` - Unicode-aware matching
    pub const UNICODE: Self = Self(0x10);
    /// `x` - extended (whitespace-insensitive) patterns
    pub const EXTENDED: Self = Self(0x20);

    const TABLE: [(char, Self); 6] = [
        ('i', Self::CASE_INSENSITIVE),
        ('l', Self::LOCALE),
        ('m', Self::MULTILINE),
        ('s', Self::DOT_ALL),
        ('u', Self::UNICODE),
        ('x', Self::EXTENDED),
    ];

    /// Parse a flag string, failing on any unrecognized character.
    pub fn parse(flags: &str) -> Result<Self, ConvertError> {
        let mut bits = Self::default();
        for ch in flags.chars() {
            let bit = Self::TABLE
                .iter()
                .find(|(c, _)| *c == ch)
                .map(|(_, bit)| *bit)
                .ok_or_else(|| {
                    ConvertError::InvalidFormat(format!("unrecognized regex flag: {ch}"))
                })?;
            bits.0 |= bit.0;
        }
        Ok(bits)
    }

    /// True when `flag` is set.
    pub fn contains(&self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ch, bit) in Self::TABLE {
            if self.contains(bit) {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Regular expression pattern: source text plus validated option flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegexPattern {
    source: String,
    flags: RegexFlags,
}

impl RegexPattern {
    /// Construct from source text and a flag string.
    pub fn new(source: impl Into<String>, flags: &str) -> Result<Self, ConvertError> {
        Ok(Self {
            source: source.into(),
            flags: RegexFlags::parse(flags)?,
        })
    }

    /// Pattern source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Option bits.
    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    /// Flag string re-derived from the stored option bits, in canonical order.
    pub fn flags_string(&self) -> String {
        self.flags.to_string()
    }
}

impl fmt::Display for RegexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_flags() {
        let flags = RegexFlags::parse("im").unwrap();
        assert!(flags.contains(RegexFlags::CASE_INSENSITIVE));
        assert!(flags.contains(RegexFlags::MULTILINE));
        assert!(!flags.contains(RegexFlags::DOT_ALL));
    }

    #[test]
    fn test_unknown_flag_fails() {
        assert!(RegexFlags::parse("ig").is_err());
    }

    #[test]
    fn test_canonical_order() {
        // Input order does not matter, re-derivation is canonical.
        let pattern = RegexPattern::new("a+", "msi").unwrap();
        assert_eq!(pattern.flags_string(), "ims");
    }

    #[test]
    fn test_display() {
        let pattern = RegexPattern::new("^x$", "i").unwrap();
        assert_eq!(pattern.to_string(), "/^x$/i");
    }
}
