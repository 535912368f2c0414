// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable mark identity.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Identity of a rendered primitive.
///
/// Two marks with the same id in consecutive [`crate::Scene::tick`] calls are the same primitive:
/// the second one updates the first instead of replacing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Wraps a raw id. Guides (axes, legends, titles) use fixed raw ids.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives an id for a data-bound primitive from a layer tag and a key.
    ///
    /// The key is typically the category label the primitive encodes. Using different layers for
    /// the same key gives one data item several primitives (for example a weekday and a weekend
    /// bar for the same area).
    pub fn for_key(layer: u64, key: &str) -> Self {
        let mut hash = FNV_OFFSET;
        for byte in layer.to_le_bytes().iter().chain(key.as_bytes()) {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        Self(hash)
    }

    /// Derives an id for the `index`-th primitive belonging to `key` in `layer`.
    ///
    /// Used when one data item owns a fixed-length run of primitives (the points of a series).
    pub fn for_key_index(layer: u64, key: &str, index: usize) -> Self {
        let base = Self::for_key(layer, key).0;
        let mut hash = base;
        for byte in (index as u64).to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        Self(hash)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn key_ids_are_stable_and_layer_scoped() {
        let a = MarkId::for_key(1, "Downtown");
        let b = MarkId::for_key(1, "Downtown");
        let c = MarkId::for_key(2, "Downtown");
        let d = MarkId::for_key(1, "Kitsilano");
        assert_eq!(a, b, "same layer and key must give the same id");
        assert_ne!(a, c, "layers must separate ids");
        assert_ne!(a, d, "keys must separate ids");
    }

    #[test]
    fn indexed_ids_differ_per_index() {
        let a = MarkId::for_key_index(7, "Sat AM", 0);
        let b = MarkId::for_key_index(7, "Sat AM", 1);
        assert_ne!(a, b, "indices must separate ids");
    }
}
