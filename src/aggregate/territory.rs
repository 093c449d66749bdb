//! Central ownership index (spec §9 design note on shared/cyclic
//! references): every tile's owner lives here, mirrored by the ordered
//! `territories` vector on the owning `Tribe`/`Country`. Checking and
//! setting ownership through this index is what makes the disjointness
//! invariant an O(1) operation instead of an O(n) scan over every entity.

use std::collections::HashMap;

use ahash::RandomState;

use crate::core::types::{CountryId, TileCoord, TribeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Tribe(TribeId),
    Country(CountryId),
}

#[derive(Debug, Clone, Default)]
pub struct TerritoryIndex {
    owners: HashMap<TileCoord, Owner, RandomState>,
}

impl TerritoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self, coord: TileCoord) -> bool {
        self.owners.contains_key(&coord)
    }

    pub fn owner(&self, coord: TileCoord) -> Option<Owner> {
        self.owners.get(&coord).copied()
    }

    /// Claims a tile for a tribe. Debug-asserts the disjointness invariant
    /// rather than silently overwriting a prior owner.
    pub fn claim_tribe(&mut self, coord: TileCoord, id: TribeId) {
        debug_assert!(!self.owners.contains_key(&coord), "tile already owned");
        self.owners.insert(coord, Owner::Tribe(id));
    }

    pub fn claim_country(&mut self, coord: TileCoord, id: CountryId) {
        debug_assert!(!self.owners.contains_key(&coord), "tile already owned");
        self.owners.insert(coord, Owner::Country(id));
    }

    pub fn release(&mut self, coord: TileCoord) {
        self.owners.remove(&coord);
    }

    /// Transfers ownership of every tile `from` owns for `tribe_id` to the
    /// country that absorbed it (tribe-to-country conversion keeps the
    /// same tiles, just re-tags the owner).
    pub fn retag_tribe_to_country(&mut self, coords: &[TileCoord], country_id: CountryId) {
        for &c in coords {
            self.owners.insert(c, Owner::Country(country_id));
        }
    }

    pub fn release_all(&mut self, coords: &[TileCoord]) {
        for &c in coords {
            self.owners.remove(&c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_and_release_round_trips() {
        let mut idx = TerritoryIndex::new();
        let c = TileCoord::new(1, 1);
        assert!(!idx.is_claimed(c));
        idx.claim_tribe(c, TribeId(1));
        assert!(idx.is_claimed(c));
        idx.release(c);
        assert!(!idx.is_claimed(c));
    }

    #[test]
    #[should_panic]
    fn double_claim_panics_in_debug() {
        let mut idx = TerritoryIndex::new();
        let c = TileCoord::new(2, 2);
        idx.claim_tribe(c, TribeId(1));
        idx.claim_tribe(c, TribeId(2));
    }
}
