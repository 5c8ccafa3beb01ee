use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;

use crate::PieceKind;

/// Seeded source of piece kinds.
///
/// Every draw is an independent uniform pick among the seven kinds; there is
/// no bag and no history. Two generators built from the same [`PieceSeed`]
/// yield the same sequence.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceSeed};
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// let mut a = PieceGenerator::with_seed(seed);
/// let mut b = PieceGenerator::with_seed(seed);
/// for _ in 0..10 {
///     assert_eq!(a.next_kind(), b.next_kind());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator seeded from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    pub fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// 128-bit seed for deterministic piece generation.
///
/// Displayed and parsed as 32 hexadecimal digits, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex digits, got {len} characters")]
    InvalidLength { len: usize },
    #[display("invalid seed: {input:?} is not hexadecimal")]
    InvalidDigit { input: String },
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::InvalidLength { len: s.len() });
        }
        // `from_str_radix` accepts a leading sign, which is not a hex digit.
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError::InvalidDigit {
                input: s.to_owned(),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::InvalidDigit {
            input: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_32_hex_digits() {
        assert_eq!(
            PieceSeed::from_bytes([0; 16]).to_string(),
            "00000000000000000000000000000000"
        );
        let seed = PieceSeed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_parse_round_trip() {
        let seed: PieceSeed = rand::rng().random();
        let parsed: PieceSeed = seed.to_string().parse().unwrap();
        assert_eq!(parsed, seed);

        let upper: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(upper.to_string(), "0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abc".parse::<PieceSeed>(),
            Err(ParseSeedError::InvalidLength { len: 3 })
        );
        assert!(matches!(
            "ghijklmnopqrstuvwxyzghijklmnopqr".parse::<PieceSeed>(),
            Err(ParseSeedError::InvalidDigit { .. })
        ));
        assert!(matches!(
            "+123456789abcdef0123456789abcdef".parse::<PieceSeed>(),
            Err(ParseSeedError::InvalidDigit { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let seed: PieceSeed = rand::rng().random();
        let mut a = PieceGenerator::with_seed(seed);
        let mut b = PieceGenerator::with_seed(seed);
        for _ in 0..50 {
            assert_eq!(a.next_kind(), b.next_kind());
        }
    }

    #[test]
    fn test_every_kind_is_drawn() {
        let mut generator = PieceGenerator::with_seed(PieceSeed::from_bytes([7; 16]));
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            seen[generator.next_kind() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
