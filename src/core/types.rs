//! Core type definitions shared by worldgen and the civilization simulation.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::prng::Prng;

/// Pixel-grid width of the generated world. Fixed by design.
pub const MAP_W: usize = 2048;
/// Pixel-grid height of the generated world. Fixed by design.
pub const MAP_H: usize = 1024;
/// Coarse tile-grid width. One tile aggregates an 8x8 block of pixels.
pub const TILE_W: usize = 256;
/// Coarse tile-grid height.
pub const TILE_H: usize = 128;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);
    };
}

entity_id!(TribeId);
entity_id!(CountryId);
entity_id!(CityId);
entity_id!(WarId);
entity_id!(EventId);
entity_id!(LeaderId);

/// Mints monotonically increasing ids, one counter per entity kind, starting
/// at 1. Never reseeded, never reused — creation order is itself a pure
/// function of the seed, so the id stream is reproducible without a clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdGen {
    next_tribe: u64,
    next_country: u64,
    next_city: u64,
    next_war: u64,
    next_event: u64,
    next_leader: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_tribe(&mut self) -> TribeId {
        self.next_tribe += 1;
        TribeId(self.next_tribe)
    }

    pub fn next_country(&mut self) -> CountryId {
        self.next_country += 1;
        CountryId(self.next_country)
    }

    pub fn next_city(&mut self) -> CityId {
        self.next_city += 1;
        CityId(self.next_city)
    }

    pub fn next_war(&mut self) -> WarId {
        self.next_war += 1;
        WarId(self.next_war)
    }

    pub fn next_event(&mut self) -> EventId {
        self.next_event += 1;
        EventId(self.next_event)
    }

    pub fn next_leader(&mut self) -> LeaderId {
        self.next_leader += 1;
        LeaderId(self.next_leader)
    }
}

/// A coordinate on the coarse `TILE_W x TILE_H` tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u16,
    pub y: u16,
}

impl TileCoord {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Neighbor offset by `(dx, dy)`, wrapping the X axis (torus) and
    /// clamping the Y axis, per the simulation's invariant that every
    /// neighbor lookup stays in-bounds on both axes.
    pub fn neighbor(&self, dx: i32, dy: i32) -> Self {
        let w = TILE_W as i32;
        let h = TILE_H as i32;
        let x = (self.x as i32 + dx).rem_euclid(w);
        let y = (self.y as i32 + dy).clamp(0, h - 1);
        Self { x: x as u16, y: y as u16 }
    }

    /// Manhattan distance accounting for X wraparound.
    pub fn manhattan(&self, other: &Self) -> u32 {
        let dx_raw = (self.x as i32 - other.x as i32).abs();
        let dx = dx_raw.min(TILE_W as i32 - dx_raw);
        let dy = (self.y as i32 - other.y as i32).abs();
        (dx + dy) as u32
    }

    /// Chebyshev (ring) distance accounting for X wraparound.
    pub fn chebyshev(&self, other: &Self) -> u32 {
        let dx_raw = (self.x as i32 - other.x as i32).abs();
        let dx = dx_raw.min(TILE_W as i32 - dx_raw);
        let dy = (self.y as i32 - other.y as i32).abs();
        dx.max(dy) as u32
    }

    pub fn index(&self) -> usize {
        self.y as usize * TILE_W + self.x as usize
    }
}

/// A coordinate on the dense `MAP_W x MAP_H` pixel grid used by the
/// worldgen fields (elevation, temperature, moisture, river marks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

impl PixelCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn neighbor(&self, dx: i32, dy: i32) -> Self {
        let w = MAP_W as i32;
        let h = MAP_H as i32;
        let x = (self.x as i32 + dx).rem_euclid(w);
        let y = (self.y as i32 + dy).clamp(0, h - 1);
        Self { x: x as u32, y: y as u32 }
    }

    pub fn index(&self) -> usize {
        self.y as usize * MAP_W + self.x as usize
    }
}

/// Cosmetic RGB color used to tell tribes/countries apart in a renderer.
/// Has no bearing on simulation logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Samples a saturated, mid-brightness color from the PRNG by drawing a
    /// random hue and converting HSV(hue, 0.65, 0.9) to RGB.
    pub fn from_prng(prng: &mut Prng) -> Self {
        let hue = prng.next_f32() * 360.0;
        let (s, v) = (0.65_f32, 0.9_f32);
        let c = v * s;
        let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match hue as u32 {
            0..=59 => (c, x, 0.0),
            60..=119 => (x, c, 0.0),
            120..=179 => (0.0, c, x),
            180..=239 => (0.0, x, c),
            240..=299 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_u8 = |v: f32| (((v + m) * 255.0).round().clamp(0.0, 255.0)) as u8;
        Self([to_u8(r), to_u8(g), to_u8(b)])
    }
}

/// Closed set of biomes produced by the tile-index aggregation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Ice,
    Tundra,
    Alpine,
    Desert,
    Savanna,
    Grassland,
    Jungle,
    Forest,
}

impl Biome {
    /// Tiles an entity may never own, regardless of other checks.
    pub fn is_unclaimable(&self) -> bool {
        matches!(self, Biome::Ocean | Biome::Ice | Biome::Alpine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClimateZone {
    Polar,
    Temperate,
    Tropical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiverPresence {
    None,
    Minor,
    Major,
}

/// A leader's six behavioral axes, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub aggression: f32,
    pub caution: f32,
    pub diplomacy: f32,
    pub ambition: f32,
    pub freedom: f32,
    pub rationality: f32,
}

impl Traits {
    pub fn random(prng: &mut Prng) -> Self {
        Self {
            aggression: prng.next_f32(),
            caution: prng.next_f32(),
            diplomacy: prng.next_f32(),
            ambition: prng.next_f32(),
            freedom: prng.next_f32(),
            rationality: prng.next_f32(),
        }
    }

    /// An heir's traits: the predecessor's, each nudged by up to ±0.15 and
    /// clamped back into `[0, 1]`.
    pub fn inherited(&self, prng: &mut Prng) -> Self {
        let nudge = |v: f32, prng: &mut Prng| (v + prng.next_range(-0.15, 0.15)).clamp(0.0, 1.0);
        Self {
            aggression: nudge(self.aggression, prng),
            caution: nudge(self.caution, prng),
            diplomacy: nudge(self.diplomacy, prng),
            ambition: nudge(self.ambition, prng),
            freedom: nudge(self.freedom, prng),
            rationality: nudge(self.rationality, prng),
        }
    }
}
