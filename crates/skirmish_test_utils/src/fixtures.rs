//! Test fixtures and helpers.
//!
//! Pre-built rosters, battlefields and batch specs for consistent testing.

use skirmish_core::battle::Battlefield;
use skirmish_core::data::{RosterConfig, UnitTemplates};
use skirmish_core::trial::BatchSpec;
use skirmish_core::units::{Side, UnitTemplate, UnitType};

/// Footman stats used by the forced-draw duel: 5/3/3/10.
pub const DUEL_FOOTMAN: UnitTemplate = UnitTemplate::new(5, 3, 3, 10);

/// Archer stats used by the forced-draw duel: 5/1/4/10.
pub const DUEL_ARCHER: UnitTemplate = UnitTemplate::new(5, 1, 4, 10);

/// Pool index that always picks the duel footman (indices 0..3).
pub const DUEL_FOOTMAN_DRAW: usize = 0;

/// Pool index that always picks the duel archer (indices 3..7).
pub const DUEL_ARCHER_DRAW: usize = 3;

/// One footman (id 0, side one) against one archer (id 1, side two).
///
/// The pool is `[0, 0, 0, 1, 1, 1, 1]`.
#[must_use]
pub fn duel_battlefield() -> Battlefield {
    let mut field = Battlefield::new();
    field.spawn(UnitType::Footman, Side::One, &DUEL_FOOTMAN);
    field.spawn(UnitType::Archer, Side::Two, &DUEL_ARCHER);
    field
}

/// Roster matching [`duel_battlefield`].
#[must_use]
pub fn duel_roster() -> RosterConfig {
    RosterConfig::new()
        .with_units(Side::One, UnitType::Footman, 1)
        .with_units(Side::Two, UnitType::Archer, 1)
}

/// Templates matching [`duel_battlefield`].
#[must_use]
pub fn duel_templates() -> UnitTemplates {
    UnitTemplates {
        archer: DUEL_ARCHER,
        footman: DUEL_FOOTMAN,
    }
}

/// A mixed roster: footmen and archers on both sides.
#[must_use]
pub fn mixed_roster(footmen: i64, archers: i64) -> RosterConfig {
    RosterConfig::new()
        .with_units(Side::One, UnitType::Footman, footmen)
        .with_units(Side::One, UnitType::Archer, archers)
        .with_units(Side::Two, UnitType::Footman, footmen)
        .with_units(Side::Two, UnitType::Archer, archers)
}

/// Battlefield with one side-one unit per given speed, in order.
///
/// Used to measure attacker selection frequencies straight from the pool.
#[must_use]
pub fn speed_ladder(speeds: &[i32]) -> Battlefield {
    let mut field = Battlefield::new();
    for &speed in speeds {
        field.spawn(
            UnitType::Footman,
            Side::One,
            &UnitTemplate::new(1, 1, speed, 1_000),
        );
    }
    field
}

/// Batch spec for a roster with a fixed seed.
#[must_use]
pub fn seeded_spec(roster: RosterConfig, trials: u32, seed: u64) -> BatchSpec {
    BatchSpec::new(roster, trials).with_seed(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::units::UnitId;

    #[test]
    fn test_duel_pool_layout() {
        let field = duel_battlefield();
        assert_eq!(field.pool().get(DUEL_FOOTMAN_DRAW), Some(UnitId(0)));
        assert_eq!(field.pool().get(DUEL_ARCHER_DRAW), Some(UnitId(1)));
        assert_eq!(field.pool().len(), 7);
    }

    #[test]
    fn test_speed_ladder() {
        let field = speed_ladder(&[1, 2, 5]);
        assert_eq!(field.pool().len(), 8);
        assert_eq!(field.roster(Side::One).len(), 3);
        assert!(field.roster(Side::Two).is_empty());
    }

    #[test]
    fn test_mixed_roster_totals() {
        let roster = mixed_roster(2, 3);
        assert_eq!(roster.side_total(Side::One), 5);
        assert_eq!(roster.side_total(Side::Two), 5);
    }
}
