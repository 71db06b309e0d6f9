use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Opaque 128-bit point-set identifier in canonical UUID text form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointSetId([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a point-set id (expected 8-4-4-4-12 hex digits): {0:?}")]
pub struct IdParseError(pub String);

/// Hex digits per hyphen-separated group.
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

impl PointSetId {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl FromStr for PointSetId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || IdParseError(s.to_string());
        let groups: Vec<&str> = s.split('-').collect();
        if groups.len() != GROUPS.len()
            || groups.iter().zip(GROUPS).any(|(g, len)| g.len() != len)
        {
            return Err(err());
        }
        let digits: Vec<u8> = groups
            .concat()
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(err)?;
        let mut bytes = [0u8; 16];
        for (b, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
            *b = (pair[0] << 4) | pair[1];
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for PointSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
