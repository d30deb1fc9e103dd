//! Random hex strings and keys
//!
//! Callers pass the rng, so tests can use a seeded one.

use crate::error::Result;
use rand::{Rng, RngCore};
use uks_core::arc::HASH_BITS;
use uks_core::uint::KEY_BYTES;
use uks_core::{is_valid_class, ArcKeyBuilder, ArcKeyOptions, Key, UksError, CLASS_RAIN, U160};

/// `digits` random lowercase hex digits
pub fn random_hex<R: RngCore + ?Sized>(rng: &mut R, digits: usize) -> String {
    let mut bytes = vec![0u8; digits.div_ceil(2)];
    rng.fill_bytes(&mut bytes);
    let mut out = hex::encode(bytes);
    out.truncate(digits);
    out
}

/// Random 160-bit value
pub fn random_value<R: RngCore + ?Sized>(rng: &mut R) -> U160 {
    let mut bytes = [0u8; KEY_BYTES];
    rng.fill_bytes(&mut bytes);
    U160::from_be_bytes(bytes)
}

/// Key with random entropy, the given class and replica 0.
///
/// RAIN keys carry their shape in the low bits; use [`random_arc_key`].
pub fn random_key<R: RngCore + ?Sized>(rng: &mut R, class: u8) -> Result<Key> {
    if class == CLASS_RAIN || !is_valid_class(class) {
        return Err(UksError::InvalidClass(class).into());
    }
    let entropy = random_value(rng) >> 8 << 8;
    Ok(Key::from_value(entropy | U160::from_u64((class as u64) << 4)))
}

/// Erasure-coded key over a random 88-bit hash
pub fn random_arc_key<R: RngCore + ?Sized>(rng: &mut R, options: ArcKeyOptions) -> Result<Key> {
    let hash = random_value(rng).low_bits(HASH_BITS);
    let key = ArcKeyBuilder::new(hash).with_options(options).build()?;
    Ok(key)
}

/// Random replica-0 key over the plain classes 0..=5
pub fn random_plain_key<R: Rng>(rng: &mut R) -> Key {
    let class = rng.gen_range(0..=5u8);
    let entropy = random_value(rng) >> 8 << 8;
    Key::from_value(entropy | U160::from_u64((class as u64) << 4))
}
