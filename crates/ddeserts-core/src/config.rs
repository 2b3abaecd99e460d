//! Configuration for reshaping and annotation
//!
//! Read-only data describing the source tables: which breakdown labels map to
//! which race codes, which fine-grained races fold into a catch-all, and which
//! races are tracked after that. The default matches the 2015-2019 CVAP
//! special tabulation and is built once per process ([`DEFAULT_CONFIG`]).

use crate::error::{Error, Result};
use crate::key::Race;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

lazy_static! {
    /// Process-wide default configuration
    pub static ref DEFAULT_CONFIG: CensusConfig = CensusConfig::default();
}

/// What a breakdown label stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Breakdown {
    /// The unqualified "Total" row
    AllRaces,
    Race(Race),
}

impl Breakdown {
    /// Column prefix: empty for all races, `"{race}_"` otherwise
    pub fn prefix(&self) -> String {
        match self {
            Breakdown::AllRaces => String::new(),
            Breakdown::Race(race) => format!("{race}_"),
        }
    }

    pub fn race(&self) -> Option<&Race> {
        match self {
            Breakdown::AllRaces => None,
            Breakdown::Race(race) => Some(race),
        }
    }
}

/// Lookup from human-readable breakdown label to race code.
///
/// Serialized as a map of label to code, with `""` for the total row.
/// Labels not in the table are excluded when reshaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct BreakdownTable {
    entries: BTreeMap<String, Breakdown>,
}

impl BreakdownTable {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add a label; an empty code marks the all-races total
    pub fn with(mut self, label: impl Into<String>, code: &str) -> Result<Self> {
        let breakdown = if code.is_empty() {
            Breakdown::AllRaces
        } else {
            Breakdown::Race(Race::new(code)?)
        };
        self.entries.insert(label.into(), breakdown);
        Ok(self)
    }

    pub fn get(&self, label: &str) -> Option<&Breakdown> {
        self.entries.get(label)
    }

    /// Label that maps to `race`, if any
    pub fn label_for(&self, race: &Race) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, b)| b.race() == Some(race))
            .map(|(label, _)| label.as_str())
    }

    /// Every race code some label maps to
    pub fn races(&self) -> impl Iterator<Item = &Race> {
        self.entries.values().filter_map(Breakdown::race)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BreakdownTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<BTreeMap<String, String>> for BreakdownTable {
    type Error = Error;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self> {
        map.into_iter()
            .try_fold(BreakdownTable::new(), |table, (label, code)| {
                table.with(label, &code)
            })
    }
}

impl From<BreakdownTable> for BTreeMap<String, String> {
    fn from(table: BreakdownTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(label, b)| {
                let code = b.race().map(|r| r.code().to_string()).unwrap_or_default();
                (label, code)
            })
            .collect()
    }
}

/// Fine-grained races folded into one catch-all race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consolidation {
    pub target: Race,
    pub sources: Vec<Race>,
}

/// Names of the identifying fields in raw input rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
    /// Geography identifier; rows are grouped on it
    pub id_field: String,
    /// Geography display name
    pub name_field: String,
    /// Race/ethnicity breakdown label
    pub breakdown_field: String,
    /// Numeric fields that are not statistics (line numbers and the like)
    #[serde(default)]
    pub ignored_fields: Vec<String>,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            id_field: "geoid".to_string(),
            name_field: "geoname".to_string(),
            breakdown_field: "lntitle".to_string(),
            ignored_fields: vec!["lnnumber".to_string()],
        }
    }
}

impl RowLayout {
    /// True for fields that are never copied as statistics
    pub fn is_identifying(&self, field: &str) -> bool {
        field == self.id_field
            || field == self.name_field
            || field == self.breakdown_field
            || self.ignored_fields.iter().any(|f| f == field)
    }
}

/// Everything the reshaper and annotation pipeline need to know about the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusConfig {
    pub breakdowns: BreakdownTable,
    #[serde(default)]
    pub consolidations: Vec<Consolidation>,
    /// Races tracked after consolidation, not including "other"
    pub races: Vec<Race>,
    #[serde(default = "Race::other")]
    pub other_race: Race,
    #[serde(default)]
    pub layout: RowLayout,
    /// Whether the aggregate disparity score is computed
    #[serde(default = "default_true")]
    pub disparity_score: bool,
}

fn default_true() -> bool {
    true
}

fn race(code: &str) -> Race {
    Race::new(code).expect("built-in race code is valid")
}

impl Default for CensusConfig {
    fn default() -> Self {
        let labels = [
            ("Total", ""),
            ("American Indian or Alaska Native Alone", "aian"),
            ("Asian Alone", "asn"),
            ("Black or African American Alone", "blk"),
            ("Native Hawaiian or Other Pacific Islander Alone", "nhpi"),
            ("White Alone", "wht"),
            ("American Indian or Alaska Native and White", "aian_wht"),
            ("Asian and White", "asn_wht"),
            ("Black or African American and White", "blk_wht"),
            (
                "American Indian or Alaska Native and Black or African American",
                "aian_blk",
            ),
            ("Remainder of Two or More Race Responses", "tmr_rem"),
            ("Hispanic or Latino", "his"),
        ];
        // "Not Hispanic or Latino" overlaps the race rows and is left out
        let mut breakdowns = BreakdownTable::new();
        for (label, code) in labels {
            breakdowns = breakdowns
                .with(label, code)
                .expect("built-in race code is valid");
        }

        Self {
            breakdowns,
            consolidations: vec![Consolidation {
                target: race("tmr"),
                sources: ["aian_wht", "asn_wht", "blk_wht", "aian_blk", "tmr_rem"]
                    .into_iter()
                    .map(race)
                    .collect(),
            }],
            races: ["aian", "asn", "blk", "nhpi", "wht", "tmr", "his"]
                .into_iter()
                .map(race)
                .collect(),
            other_race: Race::other(),
            layout: RowLayout::default(),
            disparity_score: true,
        }
    }
}

impl CensusConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CensusConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Configuration for tables with no race breakdowns, such as B05003.
    ///
    /// Nothing is tracked or consolidated, so annotation derives the
    /// all-races DVAP count and proportion only.
    pub fn all_races() -> Self {
        Self {
            breakdowns: BreakdownTable {
                entries: BTreeMap::from([("Total".to_string(), Breakdown::AllRaces)]),
            },
            consolidations: Vec::new(),
            races: Vec::new(),
            other_race: Race::other(),
            layout: RowLayout::default(),
            disparity_score: false,
        }
    }

    /// True when some race beyond the all-races total is tracked
    pub fn tracks_races(&self) -> bool {
        !self.races.is_empty()
    }

    /// Tracked races followed by the "other" race; empty when no race is
    /// tracked, since there is then nothing for "other" to be left over from
    pub fn races_with_other(&self) -> impl Iterator<Item = &Race> {
        let other = self.tracks_races().then_some(&self.other_race);
        self.races.iter().chain(other)
    }

    /// Check that the pieces agree with each other.
    ///
    /// - every consolidation source is produced by some breakdown label
    /// - every tracked race is a breakdown race or a consolidation target,
    ///   and is not itself consumed by a consolidation
    /// - the "other" race is neither tracked nor a breakdown race
    pub fn validate(&self) -> Result<()> {
        let breakdown_races: HashSet<&Race> = self.breakdowns.races().collect();
        let mut consumed = HashSet::new();
        let mut targets = HashSet::new();

        for c in &self.consolidations {
            if c.sources.is_empty() {
                return Err(Error::config(format!(
                    "consolidation into `{}` has no sources",
                    c.target
                )));
            }
            for source in &c.sources {
                if !breakdown_races.contains(source) {
                    return Err(Error::UnknownBreakdown(format!(
                        "no breakdown label maps to `{source}` (consolidated into `{}`)",
                        c.target
                    )));
                }
                if !consumed.insert(source) {
                    return Err(Error::config(format!(
                        "`{source}` is consolidated more than once"
                    )));
                }
            }
            if breakdown_races.contains(&c.target) {
                return Err(Error::config(format!(
                    "consolidation target `{}` collides with a breakdown race",
                    c.target
                )));
            }
            targets.insert(&c.target);
        }

        let mut tracked = HashSet::new();
        for r in &self.races {
            if !tracked.insert(r) {
                return Err(Error::config(format!("race `{r}` is tracked twice")));
            }
            if consumed.contains(r) {
                return Err(Error::config(format!(
                    "race `{r}` is tracked but consolidated away"
                )));
            }
            if !breakdown_races.contains(r) && !targets.contains(r) {
                return Err(Error::UnknownBreakdown(format!(
                    "no breakdown label maps to tracked race `{r}`"
                )));
            }
        }

        if tracked.contains(&self.other_race) || breakdown_races.contains(&self.other_race) {
            return Err(Error::config(format!(
                "other race `{}` must be synthetic",
                self.other_race
            )));
        }

        debug!(
            breakdowns = self.breakdowns.len(),
            consolidations = self.consolidations.len(),
            races = self.races.len(),
            "config validated"
        );
        Ok(())
    }
}
