//! Geography display-name parsing
//!
//! Census display names look like `"Bayview CDP (Contra Costa County), California"`.
//! The reshaper only needs the parsed form for reporting, so the parser is a
//! seam: anything implementing [`GeoNameParser`] can replace the census rules.

use ddeserts_core::{GeoType, Geography};

/// Turns a composite display name into name, state and geography type
pub trait GeoNameParser: Send + Sync {
    fn parse(&self, display_name: &str) -> Geography;
}

/// Rules for census place and county names
#[derive(Debug, Clone, Copy, Default)]
pub struct CensusGeoNames;

impl GeoNameParser for CensusGeoNames {
    fn parse(&self, display_name: &str) -> Geography {
        // a bare name is a state
        let Some((rest, state)) = display_name.rsplit_once(", ") else {
            return Geography {
                name: display_name.to_string(),
                state: display_name.to_string(),
                kind: GeoType::State,
            };
        };

        // no type word, e.g. "Princeton, New Jersey"
        if !rest.contains(' ') {
            return Geography {
                name: rest.to_string(),
                state: state.to_string(),
                kind: GeoType::Unknown,
            };
        }

        // trailing clarification, e.g. "Milford city (balance)"
        let (rest, clarification) = match rest
            .strip_suffix(')')
            .and_then(|r| r.rsplit_once(" ("))
        {
            Some((r, c)) => (r, Some(c)),
            None => (rest, None),
        };

        let (name, type_word) = rest.rsplit_once(' ').unwrap_or((rest, ""));

        // prefer the common name: "San Buenaventura (Ventura)" -> "Ventura"
        let mut name = match name.strip_suffix(')') {
            Some(inner) if inner.contains('(') => {
                inner.rsplit('(').next().unwrap_or(inner).to_string()
            }
            _ => name.to_string(),
        };

        let mut kind = GeoType::from_census(type_word);
        // California towns are cities in all but name
        if kind == GeoType::Town && state == "California" {
            kind = GeoType::City;
        }

        // places sharing a name are told apart by county
        if let Some(c) = clarification {
            if c.contains("County") || c.contains("Counties") {
                name = format!("{name} ({c})");
            }
        }

        Geography {
            name,
            state: state.to_string(),
            kind,
        }
    }
}
