use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::normalize::{MISSING_NUMBER, to_number};

/// The eight stats every creature carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Health,
    Stamina,
    Oxygen,
    Food,
    Weight,
    Damage,
    Speed,
    Torpor,
}
impl Stat {
    /// All stats, in spreadsheet column order.
    pub const ALL: [Stat; 8] = [
        Stat::Health,
        Stat::Stamina,
        Stat::Oxygen,
        Stat::Food,
        Stat::Weight,
        Stat::Damage,
        Stat::Speed,
        Stat::Torpor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Health => "Health",
            Stat::Stamina => "Stamina",
            Stat::Oxygen => "Oxygen",
            Stat::Food => "Food",
            Stat::Weight => "Weight",
            Stat::Damage => "Damage",
            Stat::Speed => "Speed",
            Stat::Torpor => "Torpor",
        }
    }

    /// Speed doesn't level up in the wild.
    pub fn has_wild(&self) -> bool {
        !matches!(self, Stat::Speed)
    }

    /// Torpor doesn't level up once tamed.
    pub fn has_tame(&self) -> bool {
        !matches!(self, Stat::Torpor)
    }
}
impl Display for Stat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Base value plus per-level gains of a single stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StatValues {
    pub base: i64,
    pub wild: i64,
    pub tame: i64,
}

/// All eight stats of a creature.
///
/// The shape is uniform: every stat has `Base`, `Wild` and `Tame`, even the
/// ones where a slot doesn't apply (see [`Stat::has_wild`], [`Stat::has_tame`]).
/// Those slots are always zero when built from tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StatBlock {
    pub health: StatValues,
    pub stamina: StatValues,
    pub oxygen: StatValues,
    pub food: StatValues,
    pub weight: StatValues,
    pub damage: StatValues,
    pub speed: StatValues,
    pub torpor: StatValues,
}
impl StatBlock {
    /// Builds a stat block by assigning tokens positionally: three values
    /// (base, wild, tame) for each stat, except two for speed (base, tame) and
    /// torpor (base, wild). Missing tokens count as zero.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = TokenQueue::new(tokens);
        let mut block = Self::default();
        for stat in Stat::ALL {
            let values = block.get_mut(stat);
            values.base = tokens.pop();
            if stat.has_wild() {
                values.wild = tokens.pop();
            }
            if stat.has_tame() {
                values.tame = tokens.pop();
            }
        }
        block
    }

    pub fn get(&self, stat: Stat) -> &StatValues {
        match stat {
            Stat::Health => &self.health,
            Stat::Stamina => &self.stamina,
            Stat::Oxygen => &self.oxygen,
            Stat::Food => &self.food,
            Stat::Weight => &self.weight,
            Stat::Damage => &self.damage,
            Stat::Speed => &self.speed,
            Stat::Torpor => &self.torpor,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut StatValues {
        match stat {
            Stat::Health => &mut self.health,
            Stat::Stamina => &mut self.stamina,
            Stat::Oxygen => &mut self.oxygen,
            Stat::Food => &mut self.food,
            Stat::Weight => &mut self.weight,
            Stat::Damage => &mut self.damage,
            Stat::Speed => &mut self.speed,
            Stat::Torpor => &mut self.torpor,
        }
    }
}

/// Raw tokens consumed left to right. An exhausted queue keeps yielding
/// [`MISSING_NUMBER`], which the "fill if zero" merges rely on.
pub struct TokenQueue<I> {
    tokens: I,
}
impl<T> TokenQueue<T> {
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<IntoIter = T>,
    {
        Self { tokens: tokens.into_iter() }
    }
}
impl<I, S> TokenQueue<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn pop(&mut self) -> i64 {
        self.tokens.next().map(|token| to_number(token.as_ref())).unwrap_or(MISSING_NUMBER)
    }
}
