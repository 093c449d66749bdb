//! Leaders and succession.

use serde::{Deserialize, Serialize};

use crate::core::types::{LeaderId, Traits};
use crate::prng::Prng;

const CULTURE_NAMES: &[&str] = &[
    "Aren", "Bora", "Calu", "Dresh", "Emeli", "Fenric", "Garo", "Hadia", "Isolde", "Juvash",
    "Kerel", "Lomir", "Mira", "Nashu", "Orvin", "Peyra",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leader {
    pub id: LeaderId,
    pub name: String,
    pub age: u32,
    pub years_in_power: u32,
    pub traits: Traits,
}

impl Leader {
    pub fn new_random(id: LeaderId, prng: &mut Prng) -> Self {
        Self {
            id,
            name: random_name(prng),
            age: prng.next_int(18, 45) as u32,
            years_in_power: 0,
            traits: Traits::random(prng),
        }
    }

    /// An heir's traits are the predecessor's, each axis nudged by up to
    /// ±0.15 and clamped. A revolutionary leader (spawned when unrest was
    /// above 70 at the moment of death) gets fully resampled traits
    /// instead.
    pub fn succeed(&self, id: LeaderId, revolutionary: bool, prng: &mut Prng) -> Self {
        let traits = if revolutionary {
            Traits::random(prng)
        } else {
            self.traits.inherited(prng)
        };
        Self {
            id,
            name: random_name(prng),
            age: prng.next_int(18, 35) as u32,
            years_in_power: 0,
            traits,
        }
    }
}

fn random_name(prng: &mut Prng) -> String {
    prng.choice(CULTURE_NAMES).cloned().unwrap_or("Unnamed").to_string()
}
