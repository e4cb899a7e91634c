//! Roster building: turning a configuration into live selection structures.
//!
//! A trial works on three structures:
//! - the [`SpeedWeightedPool`], a multiset of live unit ids where every unit
//!   appears once per point of speed, so faster units are picked as
//!   attacker proportionally more often
//! - one [`SideRoster`] per side, the units of that side still alive, used
//!   to pick defenders and to detect elimination
//! - the unit arena owned by the [`Battlefield`]
//!
//! All three are rebuilt from scratch for every trial.

use tracing::debug;

use crate::battle::Battlefield;
use crate::data::{RosterConfig, UnitTemplates};
use crate::error::SkirmishError;
use crate::units::{Side, UnitId, UnitType};

/// Attacker selection pool. Each live unit appears exactly `speed` times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeedWeightedPool {
    entries: Vec<UnitId>,
}

impl SpeedWeightedPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `speed` copies of a unit.
    pub fn insert(&mut self, id: UnitId, speed: u32) {
        self.entries
            .extend(std::iter::repeat(id).take(speed as usize));
    }

    /// Remove every copy of a unit. Returns the number of copies removed.
    pub fn remove_unit(&mut self, id: UnitId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|&entry| entry != id);
        before - self.entries.len()
    }

    /// Number of copies of a unit in the pool.
    #[must_use]
    pub fn multiplicity(&self, id: UnitId) -> usize {
        self.entries.iter().filter(|&&entry| entry == id).count()
    }

    /// Whether the unit has any entries.
    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.entries.contains(&id)
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<UnitId> {
        self.entries.get(index).copied()
    }

    /// Total number of entries (sum of live speeds).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.entries.iter().copied()
    }
}

/// The live units of one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideRoster {
    side: Side,
    members: Vec<UnitId>,
}

impl SideRoster {
    /// Create an empty roster for a side.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            members: Vec::new(),
        }
    }

    /// Side this roster belongs to.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Add a unit.
    pub fn insert(&mut self, id: UnitId) {
        self.members.push(id);
    }

    /// Remove a unit. Returns whether it was present.
    pub fn remove(&mut self, id: UnitId) -> bool {
        let before = self.members.len();
        self.members.retain(|&member| member != id);
        before != self.members.len()
    }

    /// Whether the unit is alive on this side.
    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.members.contains(&id)
    }

    /// Member at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<UnitId> {
        self.members.get(index).copied()
    }

    /// Number of live units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the side has been eliminated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over live unit ids.
    pub fn iter(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.members.iter().copied()
    }
}

/// Output of [`build`].
#[derive(Debug, Clone)]
pub struct RosterBuild {
    /// Fresh units, pool and side rosters.
    pub battlefield: Battlefield,
    /// Configuration problems that caused entries to be skipped.
    pub issues: Vec<SkirmishError>,
}

impl RosterBuild {
    /// Whether every entry was built.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Instantiate the units described by `config`.
///
/// Units are created entry by entry, in configuration order, with ids
/// counting up from 0. Entries with an unknown unit type, a negative count
/// or an invalid template are returned in [`RosterBuild::issues`] and
/// skipped; they never abort the build.
pub fn build(config: &RosterConfig, templates: &UnitTemplates) -> RosterBuild {
    let mut battlefield = Battlefield::new();
    let mut issues = Vec::new();

    for entry in &config.entries {
        let (unit_type, count) = match entry.validate() {
            Ok(valid) => valid,
            Err(e) => {
                debug!("Skipping roster entry for {}: {}", entry.side, e);
                issues.push(e);
                continue;
            }
        };
        if count == 0 {
            continue;
        }

        let template = templates.get(unit_type);
        if let Err(e) = template.validate(unit_type) {
            debug!(
                "Skipping {} x{} for {}: {}",
                unit_type, count, entry.side, e
            );
            issues.push(e);
            continue;
        }

        for _ in 0..count {
            battlefield.spawn(unit_type, entry.side, template);
        }
    }

    debug!(
        "Built roster: {} units, pool size {}, {} vs {}",
        battlefield.units().len(),
        battlefield.pool().len(),
        battlefield.roster(Side::One).len(),
        battlefield.roster(Side::Two).len()
    );

    RosterBuild {
        battlefield,
        issues,
    }
}

/// Convenience for counting how many units of a type a side fields in a build.
#[must_use]
pub fn count_alive(battlefield: &Battlefield, side: Side, unit_type: UnitType) -> usize {
    battlefield
        .roster(side)
        .iter()
        .filter_map(|id| battlefield.unit(id))
        .filter(|unit| unit.unit_type == unit_type)
        .count()
}
