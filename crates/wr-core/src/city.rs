//! City identity.
//!
//! A city is identified by its normalized `(name, state)` pair.  Input files
//! spell the same place in different ways ("Fort Wayne", "fortwayne",
//! " FORT WAYNE "), so every label is lower-cased and stripped of all
//! whitespace before it is stored.  Coordinates ride along once known but
//! never take part in equality or hashing.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::{CoreError, GeoPoint};

/// Lower-case `s` and remove every whitespace character.
///
/// ```
/// assert_eq!(wr_core::normalize_label(" Fort  Wayne "), "fortwayne");
/// ```
pub fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A graph node identified by `(name, state)`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    name:  String,
    state: String,
    /// Latitude/longitude, attached once the weather data has been read.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<GeoPoint>,
}

impl City {
    /// Build a city from raw labels.  Both labels are normalized.
    pub fn new(name: &str, state: &str) -> Self {
        Self {
            name:     normalize_label(name),
            state:    normalize_label(state),
            location: None,
        }
    }

    /// Builder-style coordinate attachment.
    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// `false` if the state label is empty (unknown at ingestion time).
    pub fn has_state(&self) -> bool {
        !self.state.is_empty()
    }

    /// Fill an empty state from `other`.  No-op if a state is already set.
    pub fn inherit_state(&mut self, other: &City) {
        if self.state.is_empty() {
            self.state = other.state.clone();
        }
    }
}

impl PartialEq for City {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.state == other.state
    }
}

impl Eq for City {}

impl Hash for City {
    fn hash<H: Hasher>(&self, h: &mut H) {
        self.name.hash(h);
        self.state.hash(h);
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.state.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}, {}", self.name, self.state)
        }
    }
}

/// Parses `"name,state"`, the form used on the command line.
impl FromStr for City {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(',') {
            Some((name, state)) if !normalize_label(name).is_empty() => Ok(City::new(name, state)),
            _ => Err(CoreError::City(s.to_owned())),
        }
    }
}
