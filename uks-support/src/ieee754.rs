//! Portable IEEE-754 style float packing
//!
//! Encodes a float into an integer of `bits` bits with `expbits` exponent
//! bits, independent of the host float representation. Zero maps to zero.
//! There is no encoding for infinities, NaN or subnormals.

use crate::error::{Result, SupportError};

/// Widest exponent field accepted; keeps the scaling loops short
const MAX_EXPONENT_BITS: u32 = 15;

/// Significand width for a layout
fn significand_bits(bits: u32, expbits: u32) -> Result<u32> {
    if bits > 64 || expbits == 0 || expbits > MAX_EXPONENT_BITS || expbits >= bits {
        return Err(SupportError::InvalidLayout { bits, expbits });
    }
    Ok(bits - expbits - 1)
}

fn bias(expbits: u32) -> i64 {
    (1i64 << (expbits - 1)) - 1
}

/// Pack `f` into a `bits`-wide integer with an `expbits`-wide exponent.
pub fn pack754(f: f64, bits: u32, expbits: u32) -> Result<u64> {
    if f == 0.0 {
        return Ok(0);
    }
    if !f.is_finite() {
        return Err(SupportError::NonFinite(f));
    }
    let sigbits = significand_bits(bits, expbits)?;

    let (sign, mut fnorm) = if f < 0.0 { (1u64, -f) } else { (0u64, f) };

    // normalize into [1, 2)
    let mut shift: i64 = 0;
    while fnorm >= 2.0 {
        fnorm /= 2.0;
        shift += 1;
    }
    while fnorm < 1.0 {
        fnorm *= 2.0;
        shift -= 1;
    }
    fnorm -= 1.0;

    let scale = (1u64 << sigbits) as f64 + 0.5;
    let sig_mask = (1u64 << sigbits) - 1;
    let significand = (fnorm * scale) as u64 & sig_mask;

    let exp = shift + bias(expbits);
    if exp < 0 || exp >= (1i64 << expbits) {
        return Err(SupportError::ExponentOutOfRange { value: f, expbits });
    }

    Ok((sign << (bits - 1)) | ((exp as u64) << sigbits) | significand)
}

/// Unpack a value produced by [`pack754`] with the same layout.
///
/// Only the low `bits` bits of `i` are read, so negative inputs are taken as
/// their two's complement bit pattern.
pub fn unpack754(i: i64, bits: u32, expbits: u32) -> Result<f64> {
    if i == 0 {
        return Ok(0.0);
    }
    let sigbits = significand_bits(bits, expbits)?;
    let raw = i as u64;

    let sig_mask = (1u64 << sigbits) - 1;
    let mut result = (raw & sig_mask) as f64;
    result /= (1u64 << sigbits) as f64;
    result += 1.0;

    let exp_mask = (1u64 << expbits) - 1;
    let mut shift = ((raw >> sigbits) & exp_mask) as i64 - bias(expbits);
    while shift > 0 {
        result *= 2.0;
        shift -= 1;
    }
    while shift < 0 {
        result /= 2.0;
        shift += 1;
    }

    if (raw >> (bits - 1)) & 1 == 1 {
        result = -result;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_zero() {
        assert_eq!(pack754(0.0, 1, 1).unwrap(), 0);
        assert_eq!(pack754(0.0, 64, 11).unwrap(), 0);
    }

    #[test]
    fn test_pack_reference_values() {
        assert_eq!(pack754(2.0, 5, 1).unwrap(), 8);
        assert_eq!(pack754(-2.0, 12, 11).unwrap(), 3072);
        assert_eq!(pack754(0.4, 12, 11).unwrap(), 1021);
        assert_eq!(pack754(24.0, 53, 11).unwrap(), 2259496395079680);
    }

    #[test]
    fn test_unpack_zero() {
        assert_eq!(unpack754(0, 1, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_unpack_reference_values() {
        assert_eq!(unpack754(2, 5, 4).unwrap(), 0.03125);
        assert_eq!(unpack754(-2, 3, 2).unwrap(), -2.0);
        assert_eq!(unpack754(2, 10, 4).unwrap(), 0.00830078125);
        assert_eq!(unpack754(-1, 4, 1).unwrap(), -3.5);
    }

    #[test]
    fn test_double_layout_roundtrip() {
        for f in [1.0, -1.0, 0.5, 1234.5678, 1_700_000_000.25, -3.0e-5] {
            let packed = pack754(f, 64, 11).unwrap();
            let back = unpack754(packed as i64, 64, 11).unwrap();
            let err = ((back - f) / f).abs();
            assert!(err < 1e-12, "{} came back as {}", f, back);
        }
    }

    #[test]
    fn test_single_layout_roundtrip() {
        let packed = pack754(1.2345678, 32, 8).unwrap();
        let back = unpack754(packed as i64, 32, 8).unwrap();
        assert!((back - 1.2345678).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            pack754(f64::NAN, 64, 11),
            Err(SupportError::NonFinite(_))
        ));
        assert!(matches!(
            pack754(f64::INFINITY, 64, 11),
            Err(SupportError::NonFinite(_))
        ));
    }

    #[test]
    fn test_rejects_bad_layouts() {
        assert_eq!(
            pack754(1.0, 65, 11),
            Err(SupportError::InvalidLayout { bits: 65, expbits: 11 })
        );
        assert!(pack754(1.0, 8, 0).is_err());
        assert!(pack754(1.0, 8, 8).is_err());
        assert!(unpack754(1, 8, 9).is_err());
    }

    #[test]
    fn test_exponent_out_of_range() {
        // 2^10 needs a biased exponent of 13, a 3-bit field holds at most 7
        assert!(matches!(
            pack754(1024.0, 8, 3),
            Err(SupportError::ExponentOutOfRange { expbits: 3, .. })
        ));
    }
}
