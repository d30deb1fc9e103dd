//! Circular keyspace ranges
//!
//! A range runs from `start` to `end` going up the ring, wrapping through
//! zero when `start > end`. A range whose endpoints are equal covers the
//! whole ring.

use crate::error::{Result, UksError};
use crate::key::{Key, KeyInput};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interval `[start, end]` on the 160-bit ring
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRange {
    pub start: Key,
    pub end: Key,
}

impl KeyRange {
    /// Build a range from two key-like endpoints
    pub fn new(start: impl Into<KeyInput>, end: impl Into<KeyInput>) -> Result<Self> {
        Ok(Self {
            start: Key::new(start)?,
            end: Key::new(end)?,
        })
    }

    /// Build a range from a list that must hold exactly two endpoints
    pub fn from_endpoints(endpoints: Vec<KeyInput>) -> Result<Self> {
        let actual = endpoints.len();
        match <[KeyInput; 2]>::try_from(endpoints) {
            Ok([start, end]) => Self::new(start, end),
            Err(_) => Err(UksError::WrongArity {
                expected: 2,
                actual,
            }),
        }
    }

    /// Whether the range covers the whole ring
    pub fn is_full_ring(&self) -> bool {
        self.start == self.end
    }

    /// Whether `key` falls inside the range
    pub fn contains(&self, key: &Key) -> bool {
        key.is_between(&self.start, &self.end)
    }

    /// Intersection with `other`: zero, one or two arcs.
    ///
    /// Two intervals that meet in two arcs only through the wrap point, with
    /// neither start inside the other range, are reported as not overlapping.
    ///
    /// Two ranges that only touch at both ends, such as `[1, 10]` and
    /// `[10, 1]`, yield the single range `[1, 1]`, which reads as the whole
    /// ring rather than the two shared points.
    pub fn overlap(&self, other: &KeyRange) -> Vec<KeyRange> {
        let start_inside = other.contains(&self.start);
        let end_inside = other.contains(&self.end);
        let other_start_inside = self.contains(&other.start);

        match (start_inside, end_inside) {
            (true, true) if other_start_inside => vec![
                KeyRange {
                    start: self.start,
                    end: other.end,
                },
                KeyRange {
                    start: other.start,
                    end: self.end,
                },
            ],
            (true, true) => vec![*self],
            (true, false) => vec![KeyRange {
                start: self.start,
                end: other.end,
            }],
            (false, true) => vec![KeyRange {
                start: other.start,
                end: self.end,
            }],
            (false, false) if other_start_inside => vec![*other],
            (false, false) => Vec::new(),
        }
    }
}

impl fmt::Debug for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyRange({}..={})", self.start.to_hex(), self.end.to_hex())
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
