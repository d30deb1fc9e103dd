//! Replica and fragment derivation
//!
//! Given one key, every sibling replica (or RAIN fragment) can be computed
//! without a lookup: the entropy field is rotated by the distance between the
//! current slot and the next one, where slot `i` sits at
//! `floor(modulus * position(i) / divisor)` of the entropy space.
//!
//! The rotation subtracts the current slot offset and adds the next one, so
//! walking the whole set brings the entropy back to where it started.

use crate::error::{Result, UksError};
use crate::key::{
    Key, CLASS_OFFSET, CLASS_RAIN, PLAIN_METADATA_BITS, RAIN_METADATA_BITS,
    RAIN_REPLICA_HIGH_OFFSET,
};
use crate::scheme::{Placement, CLASS1_TRANSLATION};
use crate::uint::{U160, KEY_BITS};
use tracing::{debug, trace};

/// Low byte that switches on the class-1 translation by default
const CLASS1_TRANSLATION_MARKER: u64 = 0x12;

impl Key {
    /// Whether class 1 is treated as class 6 when no explicit choice is made.
    ///
    /// Keys whose padded hex ends in `12` (class 1, replica 2) only exist in
    /// the three-replica geometry, so they opt in.
    pub fn default_class1_translation(&self) -> bool {
        self.value().field(0, 8) == CLASS1_TRANSLATION_MARKER
    }

    fn placement(&self, translate_class1: bool) -> Result<Placement> {
        let class = self
            .class()
            .ok_or_else(|| UksError::InvalidClass(self.raw_class()))?;
        let effective = if translate_class1 && class == 1 {
            CLASS1_TRANSLATION
        } else {
            class
        };
        Ok(Placement::resolve(effective, self.rain_fields()))
    }

    /// Number of replicas or fragments in this key's set
    pub fn replica_count(&self, translate_class1: bool) -> Result<u32> {
        Ok(self.placement(translate_class1)?.count())
    }

    /// Single derivation step: the key of the next replica index, wrapping.
    ///
    /// Returns `Ok(None)` when no valid next key can be formed, which only
    /// happens for malformed keys (replica number past the set, empty RAIN
    /// shape, zero divisor).
    pub fn next_replica_with(&self, translate_class1: bool) -> Result<Option<Key>> {
        let placement = self.placement(translate_class1)?;
        let next = rotate(self, &placement);
        if next.is_none() {
            debug!(key = %self, ?placement, "no next replica");
        }
        Ok(next)
    }

    /// All sibling keys in increasing replica order, starting after this one.
    ///
    /// `translate_class1` defaults to [`Key::default_class1_translation`].
    /// The set size is taken from this key and not recomputed per step; the
    /// walk stops early if a step cannot be formed.
    pub fn replicas(&self, include_self: bool, translate_class1: Option<bool>) -> Result<Vec<Key>> {
        let translate = translate_class1.unwrap_or_else(|| self.default_class1_translation());
        let count = self.replica_count(translate)?;

        let mut out = Vec::with_capacity(count as usize);
        if include_self {
            out.push(*self);
        }

        let mut current = *self;
        for _ in 1..count {
            match current.next_replica_with(translate)? {
                Some(next) => {
                    out.push(next);
                    current = next;
                }
                None => break,
            }
        }
        Ok(out)
    }

    /// Next replica, or `None` when the key has no siblings
    pub fn next_replica(&self) -> Result<Option<Key>> {
        Ok(self.replicas(false, None)?.first().copied())
    }

    /// Previous replica, or `None` when the key has no siblings.
    ///
    /// Stepping forward `n - 1` times from index `r` lands on `r - 1 mod n`.
    pub fn prev_replica(&self) -> Result<Option<Key>> {
        Ok(self.replicas(false, None)?.last().copied())
    }

    /// Padded hex of every key in the set, this one included
    pub fn replicas_as_hex(&self) -> Result<Vec<String>> {
        Ok(self
            .replicas(true, None)?
            .iter()
            .map(Key::to_hex_padded)
            .collect())
    }
}

/// `floor(modulus * position / divisor)`
fn slot_offset(modulus: U160, position: u32, divisor: u32) -> Option<U160> {
    let (quotient, _) = modulus
        .checked_mul_u64(position as u64)?
        .div_rem_u64(divisor as u64)?;
    Some(quotient)
}

fn rotate(key: &Key, placement: &Placement) -> Option<Key> {
    let count = placement.count();
    if count == 0 {
        return None;
    }

    let replica = key.replica_number() as u32;
    let next = (replica + 1) % count;

    let rain = key.raw_class() == CLASS_RAIN;
    let metadata_bits = if rain {
        RAIN_METADATA_BITS
    } else {
        PLAIN_METADATA_BITS
    };
    let modulus = U160::pow2(KEY_BITS - metadata_bits)?;
    let entropy = key.value() >> metadata_bits;

    let divisor = placement.divisor();
    let from = slot_offset(modulus, placement.position(replica)?, divisor)?;
    let to = slot_offset(modulus, placement.position(next)?, divisor)?;

    // entropy - from + to, brought back into [0, modulus) with one correction
    let shifted = entropy.checked_add(to)?;
    let rotated = match shifted.checked_sub(from) {
        Some(v) if v >= modulus => v.checked_sub(modulus).filter(|v| *v < modulus)?,
        Some(v) => v,
        None => modulus.checked_sub(from.checked_sub(shifted)?)?,
    };

    trace!(key = %key, replica, next, "rotated entropy");

    let next = next as u64;
    let value = if rain {
        let low = key.value().field(0, RAIN_METADATA_BITS);
        let low = (low & !0xf0f) | ((next >> 4) << RAIN_REPLICA_HIGH_OFFSET) | (next & 0xf);
        (rotated << RAIN_METADATA_BITS) | U160::from_u64(low)
    } else {
        let class = key.raw_class() as u64;
        (rotated << PLAIN_METADATA_BITS) | U160::from_u64((class << CLASS_OFFSET) | next)
    };
    Some(Key::from_value(value))
}
