//! Typed column keys
//!
//! Columns are addressed by `(statistic, metric)` rather than by ad hoc
//! strings, so a misspelt race or population shows up as a type or
//! validation error instead of a silently disconnected column. The rendered
//! names follow the census convention consumers rely on:
//!
//! | Statistic | Column stem | Example |
//! |---|---|---|
//! | count | `{race_}{pop}` | `adu_est`, `blk_cvap_moe` |
//! | disenfranchised proportion | `p_{race_}dvap` | `p_dvap_est`, `p_his_dvap_moe` |
//! | race share | `prop_{pop}_{race}` | `prop_adu_his_est` |
//! | representation disparity | `disp_{race}` | `disp_blk_est` |
//! | disparity score | `disp_score` | `disp_score_moe` |

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Population subgroup of a count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Population {
    /// Everyone
    Tot,
    /// Adults (18 and over)
    Adu,
    /// Citizens
    Cit,
    /// Citizen voting-age population
    Cvap,
    /// Disenfranchised voting-age population (adults who are not citizens)
    Dvap,
}

impl Population {
    /// Subgroups reported directly by the source tables
    pub const BASE: [Population; 4] = [
        Population::Tot,
        Population::Adu,
        Population::Cit,
        Population::Cvap,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Population::Tot => "tot",
            Population::Adu => "adu",
            Population::Cit => "cit",
            Population::Cvap => "cvap",
            Population::Dvap => "dvap",
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Race/ethnicity code used as a column prefix (e.g. `blk`, `his`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Race(String);

impl Race {
    /// Code of the synthetic residual category
    pub const OTHER: &'static str = "oth";

    /// Validate and wrap a race code.
    ///
    /// Codes are lowercase ASCII letters, digits and inner underscores.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let valid = !code.is_empty()
            && !code.starts_with('_')
            && !code.ends_with('_')
            && code
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if valid {
            Ok(Self(code))
        } else {
            Err(Error::InvalidRace(code))
        }
    }

    /// The residual "other" race
    pub fn other() -> Self {
        Self(Self::OTHER.to_string())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_other(&self) -> bool {
        self.0 == Self::OTHER
    }
}

impl TryFrom<String> for Race {
    type Error = Error;

    fn try_from(code: String) -> Result<Self> {
        Race::new(code)
    }
}

impl From<Race> for String {
    fn from(race: Race) -> Self {
        race.0
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which half of an estimate/margin pair a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Est,
    Moe,
}

impl Metric {
    pub fn suffix(&self) -> &'static str {
        match self {
            Metric::Est => "est",
            Metric::Moe => "moe",
        }
    }
}

/// A statistic stored as an estimate/margin pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stat {
    /// Population count; `race: None` means all races combined
    Count {
        race: Option<Race>,
        pop: Population,
    },
    /// Share of adults who are not eligible to vote
    DvapProportion { race: Option<Race> },
    /// Share of a population subgroup belonging to one race
    Share { pop: Population, race: Race },
    /// Race's share of CVAP minus its share of adults
    Disparity { race: Race },
    /// Aggregate under-representation across races
    DisparityScore,
}

impl Stat {
    /// Count for all races combined
    pub fn total(pop: Population) -> Self {
        Stat::Count { race: None, pop }
    }

    /// Count for one race
    pub fn count(race: &Race, pop: Population) -> Self {
        Stat::Count {
            race: Some(race.clone()),
            pop,
        }
    }

    /// Count for an optional race, `None` meaning all races
    pub fn count_for(race: Option<&Race>, pop: Population) -> Self {
        Stat::Count {
            race: race.cloned(),
            pop,
        }
    }

    pub fn dvap_proportion(race: Option<&Race>) -> Self {
        Stat::DvapProportion {
            race: race.cloned(),
        }
    }

    pub fn share(pop: Population, race: &Race) -> Self {
        Stat::Share {
            pop,
            race: race.clone(),
        }
    }

    pub fn disparity(race: &Race) -> Self {
        Stat::Disparity { race: race.clone() }
    }

    /// Column name without the `_est`/`_moe` suffix
    pub fn stem(&self) -> String {
        match self {
            Stat::Count { race: None, pop } => pop.code().to_string(),
            Stat::Count {
                race: Some(race),
                pop,
            } => format!("{race}_{pop}"),
            Stat::DvapProportion { race: None } => "p_dvap".to_string(),
            Stat::DvapProportion { race: Some(race) } => format!("p_{race}_dvap"),
            Stat::Share { pop, race } => format!("prop_{pop}_{race}"),
            Stat::Disparity { race } => format!("disp_{race}"),
            Stat::DisparityScore => "disp_score".to_string(),
        }
    }

    pub fn key(&self, metric: Metric) -> ColumnKey {
        ColumnKey {
            stat: self.clone(),
            metric,
        }
    }

    /// Both rendered column names, computed once
    pub fn columns(&self) -> StatColumns {
        let stem = self.stem();
        StatColumns {
            est: format!("{stem}_est"),
            moe: format!("{stem}_moe"),
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

/// One column: a statistic and which half of its pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub stat: Stat,
    pub metric: Metric,
}

impl ColumnKey {
    pub fn name(&self) -> String {
        format!("{}_{}", self.stat.stem(), self.metric.suffix())
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Pre-rendered `_est`/`_moe` column names of a statistic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatColumns {
    pub est: String,
    pub moe: String,
}
