//! Civilization simulation: tribes, countries, wars, and the AI that
//! drives country decisions, layered over the generated `World`.

pub mod ai;
pub mod country;
pub mod events;
pub mod io;
pub mod leader;
pub mod simulation;
pub mod territory;
pub mod tribe;
pub mod war;

pub use ai::{AiAction, CountryAi};
pub use country::{City, Country};
pub use events::{Event, EventKind, EventLog};
pub use io::{load, save, LoadedState, SaveFile};
pub use leader::Leader;
pub use simulation::{Simulation, SimulationState, Speed, Stats};
pub use territory::{Owner, TerritoryIndex};
pub use tribe::Tribe;
pub use war::{BattleOutcome, War, WarWinner};
