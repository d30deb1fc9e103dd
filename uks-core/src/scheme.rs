//! Replica placement schemes
//!
//! A scheme tells the derivation step how far apart, in entropy space, the
//! replicas of one object sit: replica `i` lives at fraction
//! `position(i) / divisor` of the ring.
//!
//! Classes listed in [`SCHEME_TABLE`] use a fixed divisor and slot order.
//! Class 7 (RAIN) reads its divisor and fragment count from the key itself.
//! Every other class spreads `class + 1` replicas evenly.

use crate::key::{RainParams, CLASS_RAIN};

/// Table-driven scheme: ring divisor plus the slot assigned to each replica index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaScheme {
    /// Ring size used in the rotation formula
    pub divisor: u32,
    /// Slot position of each sequential replica index
    pub positions: &'static [u32],
}

/// Deployed scheme table, keyed by class
pub const SCHEME_TABLE: &[(u8, ReplicaScheme)] = &[
    (
        3,
        ReplicaScheme {
            divisor: 5,
            positions: &[0, 3, 2, 5],
        },
    ),
    (
        4,
        ReplicaScheme {
            divisor: 5,
            positions: &[0, 3, 2, 5, 1],
        },
    ),
    (
        6,
        ReplicaScheme {
            divisor: 3,
            positions: &[0, 2, 3],
        },
    ),
    (
        8,
        ReplicaScheme {
            divisor: 5,
            positions: &[0, 3, 2],
        },
    ),
];

/// Class substituted for class 1 when the class-1 translation is active
pub const CLASS1_TRANSLATION: u8 = 6;

/// Look up a table scheme for `class`
pub fn lookup(class: u8) -> Option<&'static ReplicaScheme> {
    SCHEME_TABLE
        .iter()
        .find(|(c, _)| *c == class)
        .map(|(_, scheme)| scheme)
}

/// Scheme resolved for one concrete key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Fixed divisor and slot order from [`SCHEME_TABLE`]
    Table(&'static ReplicaScheme),
    /// Erasure-coded key: divisor is the key's schema, `k + m` fragments
    Rain { schema: u32, fragments: u32 },
    /// Plain replication: `replicas` evenly spaced slots
    Even { replicas: u32 },
}

impl Placement {
    /// Resolve the placement for `class`, after class-1 translation has been applied
    pub fn resolve(class: u8, rain: RainParams) -> Self {
        if let Some(scheme) = lookup(class) {
            return Placement::Table(scheme);
        }
        if class == CLASS_RAIN {
            return Placement::Rain {
                schema: rain.schema as u32,
                fragments: rain.data_fragments as u32 + rain.coding_fragments as u32,
            };
        }
        Placement::Even {
            replicas: class as u32 + 1,
        }
    }

    /// Ring divisor
    pub fn divisor(&self) -> u32 {
        match self {
            Placement::Table(scheme) => scheme.divisor,
            Placement::Rain { schema, .. } => *schema,
            Placement::Even { replicas } => *replicas,
        }
    }

    /// Number of replicas or fragments in the set
    pub fn count(&self) -> u32 {
        match self {
            Placement::Table(scheme) => scheme.positions.len() as u32,
            Placement::Rain { fragments, .. } => *fragments,
            Placement::Even { replicas } => *replicas,
        }
    }

    /// Slot of replica `index`. Table schemes have no slot past their last entry.
    pub fn position(&self, index: u32) -> Option<u32> {
        match self {
            Placement::Table(scheme) => scheme.positions.get(index as usize).copied(),
            Placement::Rain { .. } | Placement::Even { .. } => Some(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_rain() -> RainParams {
        RainParams {
            data_fragments: 0,
            coding_fragments: 0,
            schema: 0,
        }
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(lookup(3).unwrap().divisor, 5);
        assert_eq!(lookup(4).unwrap().positions, &[0, 3, 2, 5, 1]);
        assert_eq!(lookup(6).unwrap().positions.len(), 3);
        assert_eq!(lookup(8).unwrap().positions, &[0, 3, 2]);
        assert!(lookup(0).is_none());
        assert!(lookup(7).is_none());
    }

    #[test]
    fn test_even_placement() {
        let p = Placement::resolve(2, no_rain());
        assert_eq!(p, Placement::Even { replicas: 3 });
        assert_eq!(p.divisor(), 3);
        assert_eq!(p.count(), 3);
        assert_eq!(p.position(2), Some(2));
    }

    #[test]
    fn test_rain_placement() {
        let rain = RainParams {
            data_fragments: 9,
            coding_fragments: 3,
            schema: 12,
        };
        let p = Placement::resolve(CLASS_RAIN, rain);
        assert_eq!(p.divisor(), 12);
        assert_eq!(p.count(), 12);
        assert_eq!(p.position(11), Some(11));
    }

    #[test]
    fn test_table_placement_out_of_range() {
        let p = Placement::resolve(6, no_rain());
        assert_eq!(p.count(), 3);
        assert_eq!(p.position(1), Some(2));
        assert_eq!(p.position(3), None);
    }
}
