//! Unit definitions: types, sides, stat templates and concrete units.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkirmishError};

/// The kinds of unit that can take part in a skirmish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    /// Ranged unit. Ignores the defender's armor when attacking.
    Archer,
    /// Melee unit. Damage is reduced by the defender's armor.
    Footman,
}

impl UnitType {
    /// All unit types, in configuration order.
    pub const ALL: [UnitType; 2] = [UnitType::Archer, UnitType::Footman];

    /// Lowercase name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Archer => "archer",
            UnitType::Footman => "footman",
        }
    }

    /// Whether attacks from this unit type bypass armor.
    #[must_use]
    pub const fn ignores_armor(self) -> bool {
        matches!(self, UnitType::Archer)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitType {
    type Err = SkirmishError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "archer" => Ok(UnitType::Archer),
            "footman" => Ok(UnitType::Footman),
            _ => Err(SkirmishError::UnknownUnitType(s.to_string())),
        }
    }
}

/// One of the two opposing parties in a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Player 1.
    One,
    /// Player 2.
    Two,
}

impl Side {
    /// Both sides, side one first.
    pub const BOTH: [Side; 2] = [Side::One, Side::Two];

    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::One => f.write_str("Player 1"),
            Side::Two => f.write_str("Player 2"),
        }
    }
}

/// A tunable base stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    /// Attack power.
    Strength,
    /// Damage mitigation when defending.
    Armor,
    /// Selection weight in the attacker pool.
    Speed,
    /// Starting health.
    Hp,
}

impl Stat {
    /// All stats, in display order.
    pub const ALL: [Stat; 4] = [Stat::Strength, Stat::Armor, Stat::Speed, Stat::Hp];

    /// Lowercase name used in stat paths.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Stat::Strength => "strength",
            Stat::Armor => "armor",
            Stat::Speed => "speed",
            Stat::Hp => "hp",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stat on a specific unit type, written `archer.speed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatPath {
    /// Template the stat belongs to.
    pub unit_type: UnitType,
    /// The stat.
    pub stat: Stat,
}

impl fmt::Display for StatPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.unit_type, self.stat)
    }
}

impl FromStr for StatPath {
    type Err = SkirmishError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SkirmishError::InvalidStat(s.to_string());
        let (unit, stat) = s.split_once('.').ok_or_else(invalid)?;
        let unit_type = unit.parse::<UnitType>().map_err(|_| invalid())?;
        let stat = match stat.trim().to_ascii_lowercase().as_str() {
            "strength" | "str" => Stat::Strength,
            "armor" => Stat::Armor,
            "speed" => Stat::Speed,
            "hp" | "max_hp" => Stat::Hp,
            _ => return Err(invalid()),
        };
        Ok(Self { unit_type, stat })
    }
}

/// Base stats for a unit type.
///
/// Every stat must be strictly positive for the template to be usable.
/// A speed of 0 would leave a unit with no entries in the attacker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Attack power.
    pub strength: i32,
    /// Damage mitigation when defending.
    pub armor: i32,
    /// Selection weight and turn frequency.
    pub speed: i32,
    /// Starting health.
    #[serde(alias = "hp")]
    pub max_hp: i32,
}

impl UnitTemplate {
    /// Create a new template.
    #[must_use]
    pub const fn new(strength: i32, armor: i32, speed: i32, max_hp: i32) -> Self {
        Self {
            strength,
            armor,
            speed,
            max_hp,
        }
    }

    /// Classic archer stats: hits hard through armor, poorly armored itself.
    #[must_use]
    pub const fn archer() -> Self {
        Self::new(5, 1, 4, 10)
    }

    /// Classic footman stats.
    #[must_use]
    pub const fn footman() -> Self {
        Self::new(5, 3, 3, 10)
    }

    /// Read a stat.
    #[must_use]
    pub const fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Armor => self.armor,
            Stat::Speed => self.speed,
            Stat::Hp => self.max_hp,
        }
    }

    fn get_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Strength => &mut self.strength,
            Stat::Armor => &mut self.armor,
            Stat::Speed => &mut self.speed,
            Stat::Hp => &mut self.max_hp,
        }
    }

    /// Change a stat by `delta`, but only if it stays strictly positive.
    ///
    /// Returns `true` if the change was applied.
    pub fn adjust(&mut self, stat: Stat, delta: i32) -> bool {
        let slot = self.get_mut(stat);
        match slot.checked_add(delta) {
            Some(value) if value > 0 => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    /// Overwrite a stat. Fails without changing anything if `value` is not positive.
    pub fn set(&mut self, unit_type: UnitType, stat: Stat, value: i32) -> Result<()> {
        if value <= 0 {
            return Err(SkirmishError::InvalidTemplate {
                unit_type,
                stat: stat.name(),
                value,
            });
        }
        *self.get_mut(stat) = value;
        Ok(())
    }

    /// Check that every stat is positive.
    pub fn validate(&self, unit_type: UnitType) -> Result<()> {
        for stat in Stat::ALL {
            let value = self.get(stat);
            if value <= 0 {
                return Err(SkirmishError::InvalidTemplate {
                    unit_type,
                    stat: stat.name(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Identifier of a unit, unique within one trial.
///
/// Ids are assigned sequentially from 0 and double as the unit's index in
/// the battlefield's unit arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Arena index of this unit.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A concrete combat participant.
///
/// Stats are copied out of the template by value, so damage taken by one
/// unit never reaches the template or any other unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique id within the trial.
    pub id: UnitId,
    /// Which template this unit was created from.
    pub unit_type: UnitType,
    /// Owning side.
    pub side: Side,
    /// Attack power.
    pub strength: i32,
    /// Damage mitigation.
    pub armor: i32,
    /// Number of entries in the attacker pool.
    pub speed: i32,
    /// Current health. Dead at `<= 0`.
    pub hp: i32,
}

impl Unit {
    /// Instantiate a unit from a template.
    #[must_use]
    pub fn from_template(
        id: UnitId,
        unit_type: UnitType,
        side: Side,
        template: &UnitTemplate,
    ) -> Self {
        Self {
            id,
            unit_type,
            side,
            strength: template.strength,
            armor: template.armor,
            speed: template.speed,
            hp: template.max_hp,
        }
    }

    /// Whether the unit is still alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }
}
