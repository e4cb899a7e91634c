//! Battle resolution.
//!
//! One combat step:
//! 1. Draw an attacker from the speed-weighted pool
//! 2. Draw a defender uniformly from the attacker's opponent
//! 3. Damage is `strength - armor`; archers add the armor back, so they
//!    always deal exactly their strength
//! 4. Subtract the damage from the defender's hp
//! 5. A defender at `hp <= 0` leaves the pool (every copy) and its roster
//!
//! Steps repeat until one roster is empty. Damage is never floored: an
//! attacker weaker than the defender's armor heals it.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::draw::DrawSource;
use crate::roster::{SideRoster, SpeedWeightedPool};
use crate::units::{Side, Unit, UnitId, UnitTemplate, UnitType};

/// Default cap on combat steps per trial.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// Damage dealt by `attacker` to `defender`.
///
/// Can be zero or negative for non-archers facing heavy armor.
#[must_use]
pub fn calculate_damage(attacker: &Unit, defender: &Unit) -> i32 {
    let mut damage = attacker.strength.saturating_sub(defender.armor);
    if attacker.unit_type.ignores_armor() {
        damage = damage.saturating_add(defender.armor);
    }
    damage
}

/// Resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Steps after which an unfinished battle is declared a stalemate.
    ///
    /// Battles only stall when no remaining attacker can lower hp
    /// (non-archers whose strength does not exceed the defender's armor).
    pub max_steps: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// What happened in a single combat step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvent {
    /// Attacking unit.
    pub attacker: UnitId,
    /// Attacker's side.
    pub attacker_side: Side,
    /// Attacker's type.
    pub attacker_type: UnitType,
    /// Defending unit.
    pub defender: UnitId,
    /// Defender's type.
    pub defender_type: UnitType,
    /// Damage applied (negative heals).
    pub damage: i32,
    /// Defender hp after the hit.
    pub defender_hp: i32,
    /// Whether the defender died and was removed.
    pub killed: bool,
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// One side eliminated the other.
    Victory(Side),
    /// At least one side had no units to begin with.
    NoContest,
    /// The step limit was reached with both sides standing.
    Stalemate,
}

/// Summary of a resolved battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// How it ended.
    pub outcome: BattleOutcome,
    /// Combat steps taken.
    pub steps: u64,
    /// Units left alive on the winning side (0 unless a victory).
    pub survivors: usize,
}

impl BattleReport {
    /// The winning side, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<Side> {
        match self.outcome {
            BattleOutcome::Victory(side) => Some(side),
            BattleOutcome::NoContest | BattleOutcome::Stalemate => None,
        }
    }
}

/// All state of one trial: the unit arena, the attacker pool and the two
/// side rosters.
#[derive(Debug, Clone)]
pub struct Battlefield {
    units: Vec<Unit>,
    pool: SpeedWeightedPool,
    side_one: SideRoster,
    side_two: SideRoster,
}

impl Default for Battlefield {
    fn default() -> Self {
        Self::new()
    }
}

impl Battlefield {
    /// Create an empty battlefield.
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            pool: SpeedWeightedPool::new(),
            side_one: SideRoster::new(Side::One),
            side_two: SideRoster::new(Side::Two),
        }
    }

    /// Create a unit from a template and register it with the pool and its
    /// side's roster. Ids are assigned sequentially.
    pub fn spawn(&mut self, unit_type: UnitType, side: Side, template: &UnitTemplate) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        let unit = Unit::from_template(id, unit_type, side, template);
        self.pool.insert(id, u32::try_from(unit.speed).unwrap_or(0));
        self.roster_mut(side).insert(id);
        self.units.push(unit);
        id
    }

    /// Every unit created this trial, dead or alive, indexed by id.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    /// Look up a unit mutably.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.index())
    }

    /// The attacker pool.
    #[must_use]
    pub fn pool(&self) -> &SpeedWeightedPool {
        &self.pool
    }

    /// Live units of a side.
    #[must_use]
    pub fn roster(&self, side: Side) -> &SideRoster {
        match side {
            Side::One => &self.side_one,
            Side::Two => &self.side_two,
        }
    }

    fn roster_mut(&mut self, side: Side) -> &mut SideRoster {
        match side {
            Side::One => &mut self.side_one,
            Side::Two => &mut self.side_two,
        }
    }

    /// Whether no further step can be taken.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.side_one.is_empty() || self.side_two.is_empty()
    }

    /// Outcome if the battle is over, `None` while both sides stand.
    #[must_use]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        match (self.side_one.is_empty(), self.side_two.is_empty()) {
            (false, false) => None,
            (false, true) => Some(BattleOutcome::Victory(Side::One)),
            (true, false) => Some(BattleOutcome::Victory(Side::Two)),
            (true, true) => Some(BattleOutcome::NoContest),
        }
    }

    /// Run one combat step. Returns `None` if the battle is already over.
    pub fn step(&mut self, draws: &mut impl DrawSource) -> Option<CombatEvent> {
        if self.is_over() || self.pool.is_empty() {
            return None;
        }

        let attacker_id = self.pool.get(draws.draw_index(self.pool.len()))?;
        let attacker = self.unit(attacker_id)?.clone();

        let targets = self.roster(attacker.side.opponent());
        let defender_id = targets.get(draws.draw_index(targets.len()))?;

        let defender = self.units.get_mut(defender_id.index())?;
        let damage = calculate_damage(&attacker, defender);
        defender.hp = defender.hp.saturating_sub(damage);

        let event = CombatEvent {
            attacker: attacker_id,
            attacker_side: attacker.side,
            attacker_type: attacker.unit_type,
            defender: defender_id,
            defender_type: defender.unit_type,
            damage,
            defender_hp: defender.hp,
            killed: !defender.is_alive(),
        };

        if event.killed {
            let defender_side = attacker.side.opponent();
            self.pool.remove_unit(defender_id);
            self.roster_mut(defender_side).remove(defender_id);
        }

        trace!(
            "{} {} {} hits {} {} for {} (hp {}){}",
            attacker.side,
            attacker.unit_type,
            attacker_id,
            event.defender_type,
            defender_id,
            damage,
            event.defender_hp,
            if event.killed { ", killed" } else { "" }
        );

        #[cfg(feature = "debug-validation")]
        debug_assert!(self.check_invariants(), "pool/roster bookkeeping broken");

        Some(event)
    }

    /// Verify the bookkeeping invariants: every live unit appears exactly
    /// `speed` times in the pool and once in its own roster; every dead
    /// unit appears nowhere.
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        self.units.iter().all(|unit| {
            let copies = self.pool.multiplicity(unit.id);
            let in_own = self.roster(unit.side).contains(unit.id);
            let in_other = self.roster(unit.side.opponent()).contains(unit.id);
            if unit.is_alive() {
                copies == unit.speed as usize && in_own && !in_other
            } else {
                copies == 0 && !in_own && !in_other
            }
        })
    }
}

/// Resolve a battle to completion with default settings.
pub fn resolve(battlefield: &mut Battlefield, draws: &mut impl DrawSource) -> BattleReport {
    resolve_with(battlefield, draws, &BattleConfig::default(), |_| {})
}

/// Resolve a battle to completion, passing every combat event to `observer`.
pub fn resolve_with(
    battlefield: &mut Battlefield,
    draws: &mut impl DrawSource,
    config: &BattleConfig,
    mut observer: impl FnMut(&CombatEvent),
) -> BattleReport {
    let mut steps = 0u64;

    while !battlefield.is_over() {
        if steps >= config.max_steps {
            return BattleReport {
                outcome: BattleOutcome::Stalemate,
                steps,
                survivors: 0,
            };
        }
        match battlefield.step(draws) {
            Some(event) => observer(&event),
            None => break,
        }
        steps += 1;
    }

    let outcome = battlefield
        .outcome()
        .unwrap_or(BattleOutcome::Stalemate);
    let survivors = match outcome {
        BattleOutcome::Victory(side) => battlefield.roster(side).len(),
        BattleOutcome::NoContest | BattleOutcome::Stalemate => 0,
    };

    BattleReport {
        outcome,
        steps,
        survivors,
    }
}
