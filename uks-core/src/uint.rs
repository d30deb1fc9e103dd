//! Fixed-width 160-bit unsigned integer
//!
//! Keys are 160-bit big-endian values. This type stores them as three
//! little-endian 64-bit limbs, the top limb only ever using its low 32 bits.
//! All arithmetic is either checked or explicitly wrapping modulo 2^160.

use crate::error::{Result, UksError};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr, Shl, Shr};

/// Width of a key in bits
pub const KEY_BITS: u32 = 160;

/// Width of a key in hex digits
pub const KEY_HEX_DIGITS: usize = 40;

/// Width of a key in bytes
pub const KEY_BYTES: usize = 20;

const LIMBS: usize = 3;
const TOP_MASK: u64 = (1 << 32) - 1;

/// Unsigned integer in `[0, 2^160)`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U160 {
    limbs: [u64; LIMBS],
}

impl U160 {
    pub const ZERO: Self = Self { limbs: [0; LIMBS] };
    pub const ONE: Self = Self {
        limbs: [1, 0, 0],
    };
    pub const MAX: Self = Self {
        limbs: [u64::MAX, u64::MAX, TOP_MASK],
    };

    /// Create from a 64-bit value
    pub const fn from_u64(value: u64) -> Self {
        Self {
            limbs: [value, 0, 0],
        }
    }

    /// Create from a 128-bit value
    pub const fn from_u128(value: u128) -> Self {
        Self {
            limbs: [value as u64, (value >> 64) as u64, 0],
        }
    }

    /// `2^bits`, or `None` when it does not fit in 160 bits
    pub fn pow2(bits: u32) -> Option<Self> {
        if bits >= KEY_BITS {
            return None;
        }
        Some(Self::ONE << bits)
    }

    /// Create from 20 big-endian bytes
    pub fn from_be_bytes(bytes: [u8; KEY_BYTES]) -> Self {
        let mut top = [0u8; 4];
        let mut mid = [0u8; 8];
        let mut low = [0u8; 8];
        top.copy_from_slice(&bytes[0..4]);
        mid.copy_from_slice(&bytes[4..12]);
        low.copy_from_slice(&bytes[12..20]);
        Self {
            limbs: [
                u64::from_be_bytes(low),
                u64::from_be_bytes(mid),
                u32::from_be_bytes(top) as u64,
            ],
        }
    }

    /// Convert to 20 big-endian bytes
    pub fn to_be_bytes(&self) -> [u8; KEY_BYTES] {
        let mut out = [0u8; KEY_BYTES];
        out[0..4].copy_from_slice(&(self.limbs[2] as u32).to_be_bytes());
        out[4..12].copy_from_slice(&self.limbs[1].to_be_bytes());
        out[12..20].copy_from_slice(&self.limbs[0].to_be_bytes());
        out
    }

    /// Parse a base-16 string of at most 40 digits (either case, no sign or prefix)
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.is_empty() {
            return Err(UksError::InvalidKeyValue("empty hex string".to_string()));
        }
        if hex.starts_with('-') {
            return Err(UksError::InvalidKeyValue(format!(
                "value must not be negative: {}",
                hex
            )));
        }
        if hex.len() > KEY_HEX_DIGITS {
            return Err(UksError::InvalidKeyValue(format!(
                "hex value longer than {} digits: {}",
                KEY_HEX_DIGITS,
                hex.len()
            )));
        }

        let mut value = Self::ZERO;
        for c in hex.chars() {
            let digit = c.to_digit(16).ok_or_else(|| {
                UksError::InvalidKeyValue(format!("not a hex digit: {:?}", c))
            })?;
            value = (value << 4) | Self::from_u64(digit as u64);
        }
        Ok(value)
    }

    /// Lowercase hex without leading zeros (`"0"` for zero)
    pub fn to_hex(&self) -> String {
        format!("{:x}", self)
    }

    /// Lowercase hex left-padded with zeros to exactly 40 digits
    pub fn to_hex_padded(&self) -> String {
        format!(
            "{:08x}{:016x}{:016x}",
            self.limbs[2], self.limbs[1], self.limbs[0]
        )
    }

    pub fn is_zero(&self) -> bool {
        self.limbs == [0; LIMBS]
    }

    /// Low 64 bits, truncating
    pub fn low_u64(&self) -> u64 {
        self.limbs[0]
    }

    /// Number of significant bits
    pub fn bits(&self) -> u32 {
        for i in (0..LIMBS).rev() {
            if self.limbs[i] != 0 {
                return 64 * i as u32 + (64 - self.limbs[i].leading_zeros());
            }
        }
        0
    }

    /// Keep only the lowest `bits` bits
    pub fn low_bits(self, bits: u32) -> Self {
        let mut out = self.limbs;
        for (i, limb) in out.iter_mut().enumerate() {
            let start = 64 * i as u32;
            if bits <= start {
                *limb = 0;
            } else if bits - start < 64 {
                *limb &= (1u64 << (bits - start)) - 1;
            }
        }
        Self { limbs: out }
    }

    /// Extract `width` bits starting at bit `offset` (width <= 64)
    pub fn field(&self, offset: u32, width: u32) -> u64 {
        (*self >> offset).low_bits(width).low_u64()
    }

    fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        let mut out = [0u64; LIMBS];
        let mut carry = false;
        for (i, limb) in out.iter_mut().enumerate() {
            let (s1, c1) = self.limbs[i].overflowing_add(rhs.limbs[i]);
            let (s2, c2) = s1.overflowing_add(carry as u64);
            *limb = s2;
            carry = c1 || c2;
        }
        let overflow = out[2] > TOP_MASK;
        out[2] &= TOP_MASK;
        (Self { limbs: out }, overflow)
    }

    fn overflowing_sub(self, rhs: Self) -> (Self, bool) {
        let mut out = [0u64; LIMBS];
        let mut borrow = false;
        for (i, limb) in out.iter_mut().enumerate() {
            let (d1, b1) = self.limbs[i].overflowing_sub(rhs.limbs[i]);
            let (d2, b2) = d1.overflowing_sub(borrow as u64);
            *limb = d2;
            borrow = b1 || b2;
        }
        out[2] &= TOP_MASK;
        (Self { limbs: out }, borrow)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.overflowing_add(rhs) {
            (value, false) => Some(value),
            _ => None,
        }
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.overflowing_sub(rhs) {
            (value, false) => Some(value),
            _ => None,
        }
    }

    /// Addition modulo 2^160
    pub fn wrapping_add(self, rhs: Self) -> Self {
        self.overflowing_add(rhs).0
    }

    /// Subtraction modulo 2^160
    pub fn wrapping_sub(self, rhs: Self) -> Self {
        self.overflowing_sub(rhs).0
    }

    /// Multiply by a small factor, `None` on overflow past 160 bits
    pub fn checked_mul_u64(self, factor: u64) -> Option<Self> {
        let mut out = [0u64; LIMBS];
        let mut carry: u128 = 0;
        for (i, limb) in out.iter_mut().enumerate() {
            let product = self.limbs[i] as u128 * factor as u128 + carry;
            *limb = product as u64;
            carry = product >> 64;
        }
        if carry != 0 || out[2] > TOP_MASK {
            return None;
        }
        Some(Self { limbs: out })
    }

    /// Floor division by a small divisor, returning `(quotient, remainder)`.
    /// `None` when dividing by zero.
    pub fn div_rem_u64(self, divisor: u64) -> Option<(Self, u64)> {
        if divisor == 0 {
            return None;
        }
        let divisor = divisor as u128;
        let mut out = [0u64; LIMBS];
        let mut rem: u128 = 0;
        for i in (0..LIMBS).rev() {
            let cur = (rem << 64) | self.limbs[i] as u128;
            out[i] = (cur / divisor) as u64;
            rem = cur % divisor;
        }
        Some((Self { limbs: out }, rem as u64))
    }
}

impl Ord for U160 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..LIMBS).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for U160 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Shl<u32> for U160 {
    type Output = Self;

    /// Shift left, discarding bits pushed past bit 159
    fn shl(self, n: u32) -> Self {
        if n >= KEY_BITS {
            return Self::ZERO;
        }
        let limb_shift = (n / 64) as usize;
        let bit_shift = n % 64;
        let mut out = [0u64; LIMBS];
        for i in limb_shift..LIMBS {
            let src = i - limb_shift;
            let mut v = self.limbs[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                v |= self.limbs[src - 1] >> (64 - bit_shift);
            }
            out[i] = v;
        }
        out[2] &= TOP_MASK;
        Self { limbs: out }
    }
}

impl Shr<u32> for U160 {
    type Output = Self;

    fn shr(self, n: u32) -> Self {
        if n >= KEY_BITS {
            return Self::ZERO;
        }
        let limb_shift = (n / 64) as usize;
        let bit_shift = n % 64;
        let mut out = [0u64; LIMBS];
        for (i, limb) in out.iter_mut().enumerate().take(LIMBS - limb_shift) {
            let src = i + limb_shift;
            let mut v = self.limbs[src] >> bit_shift;
            if bit_shift > 0 && src + 1 < LIMBS {
                v |= self.limbs[src + 1] << (64 - bit_shift);
            }
            *limb = v;
        }
        Self { limbs: out }
    }
}

impl BitAnd for U160 {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self {
            limbs: [
                self.limbs[0] & rhs.limbs[0],
                self.limbs[1] & rhs.limbs[1],
                self.limbs[2] & rhs.limbs[2],
            ],
        }
    }
}

impl BitOr for U160 {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            limbs: [
                self.limbs[0] | rhs.limbs[0],
                self.limbs[1] | rhs.limbs[1],
                self.limbs[2] | rhs.limbs[2],
            ],
        }
    }
}

impl From<u8> for U160 {
    fn from(value: u8) -> Self {
        Self::from_u64(value as u64)
    }
}

impl From<u32> for U160 {
    fn from(value: u32) -> Self {
        Self::from_u64(value as u64)
    }
}

impl From<u64> for U160 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for U160 {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl fmt::LowerHex for U160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let padded = self.to_hex_padded();
        let trimmed = padded.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        f.pad_integral(true, "0x", digits)
    }
}

impl fmt::UpperHex for U160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let upper = format!("{:x}", self).to_uppercase();
        f.pad_integral(true, "0x", &upper)
    }
}

impl fmt::Debug for U160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U160(0x{:x})", self)
    }
}

impl fmt::Display for U160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self)
    }
}
