// src/bitpack.rs

//! Arbitrary-width bit fields inside a 64-bit word.
//!
//! A field is described by its `width` (0..=64) and the index of its least
//! significant bit `lsb`, with `width + lsb <= 64`. Unsigned fields are
//! zero-extended on extraction, signed fields use two's complement and are
//! sign-extended from their top bit.
//!
//! Two failure modes are kept apart:
//! - a malformed field descriptor is a programming error and panics;
//! - a value that does not fit its field is an [`Overflow`] the caller may
//!   recover from.

use thiserror::Error;

/// The packing substrate.
pub type Word = u64;

/// Number of bits in a [`Word`].
pub const WORD_BITS: u32 = Word::BITS;

/// A value did not fit the width of the field it was stored into.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    #[error("unsigned value {value} does not fit in {width} bits")]
    Unsigned { value: u64, width: u32 },
    #[error("signed value {value} does not fit in {width} bits")]
    Signed { value: i64, width: u32 },
}

/// Location of one value inside a [`Word`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    pub width: u32,
    pub lsb: u32,
}

impl Field {
    /// Creates a field descriptor. Panics if it does not fit in a word.
    pub const fn new(width: u32, lsb: u32) -> Self {
        assert!(
            width <= WORD_BITS && lsb <= WORD_BITS - width,
            "bit field does not fit in a 64-bit word"
        );
        Self { width, lsb }
    }

    /// Bits of a word covered by this field.
    pub fn mask(&self) -> Word {
        field_mask(self.width, self.lsb)
    }

    pub fn get_unsigned(&self, word: Word) -> u64 {
        get_unsigned(word, self.width, self.lsb)
    }

    pub fn get_signed(&self, word: Word) -> i64 {
        get_signed(word, self.width, self.lsb)
    }

    pub fn set_unsigned(&self, word: Word, value: u64) -> Result<Word, Overflow> {
        set_unsigned(word, self.width, self.lsb, value)
    }

    pub fn set_signed(&self, word: Word, value: i64) -> Result<Word, Overflow> {
        set_signed(word, self.width, self.lsb, value)
    }
}

// Native shifts are undefined at or past the word width; these yield 0 there.
#[inline]
fn shl(value: Word, amount: u32) -> Word {
    if amount >= WORD_BITS { 0 } else { value << amount }
}

#[inline]
fn shr(value: Word, amount: u32) -> Word {
    if amount >= WORD_BITS { 0 } else { value >> amount }
}

#[inline]
fn check_field(width: u32, lsb: u32) {
    assert!(
        width <= WORD_BITS && lsb <= WORD_BITS - width,
        "invalid bit field: width {} at lsb {} exceeds {} bits",
        width,
        lsb,
        WORD_BITS
    );
}

#[inline]
fn field_mask(width: u32, lsb: u32) -> Word {
    // width == 0 shifts the ones out entirely
    shl(shr(!0, WORD_BITS - width), lsb)
}

/// Returns true if `value` is representable in `width` unsigned bits.
pub fn fits_unsigned(value: u64, width: u32) -> bool {
    width >= WORD_BITS || value < shl(1, width)
}

/// Returns true if `value` lies in `[-2^(width-1), 2^(width-1))`.
///
/// No value fits in zero bits; every value fits in 64 or more.
pub fn fits_signed(value: i64, width: u32) -> bool {
    if width == 0 {
        return false;
    }
    if width >= WORD_BITS {
        return true;
    }
    let half = 1i64 << (width - 1);
    (-half..half).contains(&value)
}

/// Extracts `width` bits starting at `lsb`, zero-extended.
pub fn get_unsigned(word: Word, width: u32, lsb: u32) -> u64 {
    check_field(width, lsb);
    shr(word & field_mask(width, lsb), lsb)
}

/// Extracts `width` bits starting at `lsb`, sign-extended from the top bit.
pub fn get_signed(word: Word, width: u32, lsb: u32) -> i64 {
    check_field(width, lsb);
    if width == 0 {
        return 0;
    }
    let raw = get_unsigned(word, width, lsb);
    let spare = WORD_BITS - width;
    ((raw << spare) as i64) >> spare
}

/// Returns `word` with the field at (`width`, `lsb`) replaced by `value`.
pub fn set_unsigned(word: Word, width: u32, lsb: u32, value: u64) -> Result<Word, Overflow> {
    check_field(width, lsb);
    if !fits_unsigned(value, width) {
        return Err(Overflow::Unsigned { value, width });
    }
    Ok((word & !field_mask(width, lsb)) | shl(value, lsb))
}

/// Returns `word` with the field at (`width`, `lsb`) replaced by the
/// two's-complement bits of `value`.
pub fn set_signed(word: Word, width: u32, lsb: u32, value: i64) -> Result<Word, Overflow> {
    check_field(width, lsb);
    if !fits_signed(value, width) {
        return Err(Overflow::Signed { value, width });
    }
    let mask = field_mask(width, lsb);
    Ok((word & !mask) | (shl(value as u64, lsb) & mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;
    use rstest::rstest;

    const PATTERNS: [Word; 4] = [
        0,
        !0,
        0xDEAD_BEEF_0123_4567,
        0x5555_AAAA_5555_AAAA,
    ];

    #[rstest]
    #[case(0, 0, true)]
    #[case(1, 0, false)]
    #[case(1, 1, true)]
    #[case(2, 1, false)]
    #[case(63, 6, true)]
    #[case(64, 6, false)]
    #[case((1 << 63) - 1, 63, true)]
    #[case(1 << 63, 63, false)]
    #[case(u64::MAX, 64, true)]
    #[case(u64::MAX, 200, true)]
    fn test_fits_unsigned(#[case] value: u64, #[case] width: u32, #[case] expected: bool) {
        assert_eq!(fits_unsigned(value, width), expected);
    }

    #[rstest]
    #[case(0, 0, false)]
    #[case(-1, 1, true)]
    #[case(0, 1, true)]
    #[case(1, 1, false)]
    #[case(-2, 1, false)]
    #[case(31, 6, true)]
    #[case(32, 6, false)]
    #[case(-32, 6, true)]
    #[case(-33, 6, false)]
    #[case(i64::MIN, 64, true)]
    #[case(i64::MAX, 64, true)]
    #[case(i64::MIN, 99, true)]
    fn test_fits_signed(#[case] value: i64, #[case] width: u32, #[case] expected: bool) {
        assert_eq!(fits_signed(value, width), expected);
    }

    #[test]
    fn test_fits_matches_range_for_every_width() {
        for width in 1..64u32 {
            let limit = 1u64 << width;
            assert!(fits_unsigned(limit - 1, width));
            assert!(!fits_unsigned(limit, width));

            let half = 1i64 << (width - 1);
            assert!(fits_signed(-half, width));
            assert!(fits_signed(half - 1, width));
            assert!(!fits_signed(half, width));
            assert!(!fits_signed(-half - 1, width));
        }
    }

    #[test]
    fn test_get_unsigned_matches_bitvec() {
        for &word in PATTERNS.iter() {
            let bits = word.view_bits::<Lsb0>();
            for width in 1..=64u32 {
                for lsb in 0..=(64 - width) {
                    let start = lsb as usize;
                    let end = (lsb + width) as usize;
                    let expected: u64 = bits[start..end].load_le();
                    assert_eq!(
                        get_unsigned(word, width, lsb),
                        expected,
                        "word {:#x} width {} lsb {}",
                        word,
                        width,
                        lsb
                    );
                }
            }
        }
    }

    #[test]
    fn test_zero_width_fields() {
        assert_eq!(get_unsigned(!0, 0, 0), 0);
        assert_eq!(get_unsigned(!0, 0, 64), 0);
        assert_eq!(get_signed(!0, 0, 17), 0);
        assert_eq!(set_unsigned(0x1234, 0, 64, 0), Ok(0x1234));
        assert!(set_unsigned(0x1234, 0, 3, 1).is_err());
        // no signed value fits in zero bits, not even zero
        assert!(set_signed(0x1234, 0, 3, 0).is_err());
    }

    #[test]
    fn test_full_width_fields() {
        assert_eq!(get_unsigned(0xFEDC_BA98_7654_3210, 64, 0), 0xFEDC_BA98_7654_3210);
        assert_eq!(get_signed(!0, 64, 0), -1);
        assert_eq!(get_signed(1 << 63, 64, 0), i64::MIN);
        assert_eq!(set_unsigned(0, 64, 0, u64::MAX), Ok(u64::MAX));
        assert_eq!(set_signed(0, 64, 0, i64::MIN), Ok(1 << 63));
        assert_eq!(set_signed(0, 64, 0, -1), Ok(!0));
    }

    #[test]
    fn test_get_signed_sign_extends() {
        // 6-bit field holding 0b111111 at lsb 20
        let word = 0x3Fu64 << 20;
        assert_eq!(get_signed(word, 6, 20), -1);
        assert_eq!(get_unsigned(word, 6, 20), 63);

        let word = 0x20u64 << 8;
        assert_eq!(get_signed(word, 6, 8), -32);

        let word = 0x1Fu64 << 8;
        assert_eq!(get_signed(word, 6, 8), 31);

        // top bit of the word
        assert_eq!(get_signed(1 << 63, 1, 63), -1);
    }

    #[test]
    fn test_unsigned_round_trip_preserves_other_bits() {
        for &word in PATTERNS.iter() {
            for width in 1..=64u32 {
                let max = if width == 64 { u64::MAX } else { (1u64 << width) - 1 };
                for lsb in [0, 1, 7, 31, 64 - width] {
                    if lsb + width > 64 {
                        continue;
                    }
                    for value in [0, 1, max / 3, max] {
                        let packed = set_unsigned(word, width, lsb, value).unwrap();
                        assert_eq!(get_unsigned(packed, width, lsb), value);
                        let outside = !field_mask(width, lsb);
                        assert_eq!(packed & outside, word & outside);
                    }
                }
            }
        }
    }

    #[test]
    fn test_signed_round_trip_preserves_other_bits() {
        for &word in PATTERNS.iter() {
            for width in 1..=64u32 {
                let (min, max) = if width == 64 {
                    (i64::MIN, i64::MAX)
                } else {
                    let half = 1i64 << (width - 1);
                    (-half, half - 1)
                };
                for lsb in [0, 5, 64 - width] {
                    if lsb + width > 64 {
                        continue;
                    }
                    for value in [min, -1, 0, max] {
                        let packed = set_signed(word, width, lsb, value).unwrap();
                        assert_eq!(get_signed(packed, width, lsb), value);
                        let outside = !field_mask(width, lsb);
                        assert_eq!(packed & outside, word & outside);
                    }
                }
            }
        }
    }

    #[rstest]
    #[case(6, 64)]
    #[case(4, 16)]
    #[case(1, 2)]
    #[case(63, 1 << 63)]
    fn test_set_unsigned_overflow(#[case] width: u32, #[case] value: u64) {
        assert_eq!(
            set_unsigned(0, width, 0, value),
            Err(Overflow::Unsigned { value, width })
        );
        assert!(set_unsigned(0, width, 0, value - 1).is_ok());
    }

    #[rstest]
    #[case(6, 32, -32)]
    #[case(6, -33, 31)]
    #[case(1, 1, -1)]
    #[case(4, -9, -8)]
    fn test_set_signed_overflow(#[case] width: u32, #[case] bad: i64, #[case] good: i64) {
        assert_eq!(
            set_signed(0, width, 3, bad),
            Err(Overflow::Signed { value: bad, width })
        );
        assert!(set_signed(0, width, 3, good).is_ok());
    }

    #[test]
    fn test_negative_value_does_not_leak_outside_field() {
        let packed = set_signed(0, 6, 20, -1).unwrap();
        assert_eq!(packed, 0x3F << 20);
    }

    #[test]
    fn test_field_descriptor_methods() {
        let field = Field::new(6, 26);
        assert_eq!(field.mask(), 0xFC00_0000);
        let word = field.set_unsigned(0, 42).unwrap();
        assert_eq!(field.get_unsigned(word), 42);
        let word = Field::new(6, 8).set_signed(word, -15).unwrap();
        assert_eq!(Field::new(6, 8).get_signed(word), -15);
        assert_eq!(field.get_unsigned(word), 42);
    }

    #[test]
    #[should_panic(expected = "invalid bit field")]
    fn test_width_past_word_panics() {
        get_unsigned(0, 65, 0);
    }

    #[test]
    #[should_panic(expected = "invalid bit field")]
    fn test_field_past_word_end_panics() {
        let _ = set_unsigned(0, 8, 60, 1);
    }

    #[test]
    #[should_panic]
    fn test_field_descriptor_past_word_end_panics() {
        Field::new(40, 30);
    }
}
