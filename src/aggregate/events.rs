//! Append-only event stream (spec §4.9).
//!
//! Split into *surface* events (capped to the 200 most recent, meant for a
//! UI feed) and *latent* events (unbounded, for a full history export).
//! Both views share the same backing `Event` records; "surface" is a
//! windowed read over the tail, not a separate write path.

use serde::{Deserialize, Serialize};

use crate::core::types::{EventId, TileCoord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    TribeFormed,
    TribeSplit,
    CivilizationFormed,
    LeaderDied,
    WarDeclared,
    WarEnded,
    TerritoryConquered,
    AllianceFormed,
    CityFounded,
    PandemicStarted,
    DisasterOccurred,
    TechAdvancement,
    Settlement,
    Disaster,
    Extinction,
    Conquest,
    Collapse,
    TensionRising,
    IdeologicalShift,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub year: u32,
    pub kind: EventKind,
    pub message: String,
    pub location: Option<TileCoord>,
}

/// The cap on how many of the most recent events `surface()` returns.
const SURFACE_CAP: usize = 200;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: EventId, year: u32, kind: EventKind, message: impl Into<String>, location: Option<TileCoord>) {
        self.events.push(Event {
            id,
            year,
            kind,
            message: message.into(),
            location,
        });
    }

    /// The most recent events, up to `SURFACE_CAP`, oldest first — what a
    /// UI feed would render.
    pub fn surface(&self) -> &[Event] {
        let start = self.events.len().saturating_sub(SURFACE_CAP);
        &self.events[start..]
    }

    /// The full, unbounded history.
    pub fn latent(&self) -> &[Event] {
        &self.events
    }

    pub fn for_year(&self, year: u32) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.year == year)
    }

    pub fn last_kind(&self) -> Option<EventKind> {
        self.events.last().map(|e| e.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_caps_at_200() {
        let mut log = EventLog::new();
        for i in 0..500u64 {
            log.push(EventId(i + 1), i as u32, EventKind::Settlement, "settled", None);
        }
        assert_eq!(log.surface().len(), SURFACE_CAP);
        assert_eq!(log.latent().len(), 500);
        assert_eq!(log.surface().last().unwrap().year, 499);
    }
}
