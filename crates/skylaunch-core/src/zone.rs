//! Fixed, repeating zone visitation order

use crate::error::{CoreError, Result};

/// Cycles through the configured zones forever, in order
#[derive(Debug, Clone)]
pub struct ZoneRotator {
    zones: Vec<String>,
}

impl ZoneRotator {
    pub fn new(zones: Vec<String>) -> Result<Self> {
        if zones.is_empty() {
            return Err(CoreError::NoZones);
        }
        Ok(Self { zones })
    }

    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    /// Number of visits in one round
    pub fn round_len(&self) -> usize {
        self.zones.len()
    }

    /// A fresh cycle starting at round 1, first zone
    pub fn cycle(&self) -> ZoneCycle<'_> {
        ZoneCycle {
            zones: &self.zones,
            round: 1,
            position: 0,
        }
    }
}

/// One step of a [`ZoneCycle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneVisit<'a> {
    pub zone: &'a str,
    /// 1-based round number
    pub round: u64,
    /// 0-based position within the round
    pub position: usize,
    /// Last zone of the round
    pub closes_round: bool,
}

/// Infinite iterator over zone visits
#[derive(Debug, Clone)]
pub struct ZoneCycle<'a> {
    zones: &'a [String],
    round: u64,
    position: usize,
}

impl<'a> ZoneCycle<'a> {
    /// Never runs dry
    pub fn next_visit(&mut self) -> ZoneVisit<'a> {
        let zones: &'a [String] = self.zones;
        let visit = ZoneVisit {
            zone: zones[self.position].as_str(),
            round: self.round,
            position: self.position,
            closes_round: self.position + 1 == zones.len(),
        };

        if visit.closes_round {
            self.position = 0;
            self.round += 1;
        } else {
            self.position += 1;
        }

        visit
    }
}

impl<'a> Iterator for ZoneCycle<'a> {
    type Item = ZoneVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_visit())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
