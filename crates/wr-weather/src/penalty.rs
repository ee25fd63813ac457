//! Weather condition → distance penalty.
//!
//! Bad weather is modelled as extra miles added to a leg before the gradient
//! factor is applied.  The table is data, not code: the default covers the
//! conditions seen in the collected weather files, and deployments can load
//! their own from a two-column CSV or a config file.
//!
//! Default table (miles):
//!
//! | Condition      | Penalty |
//! |----------------|---------|
//! | `fair`         | 0       |
//! | `partlycloudy` | 1       |
//! | `mostlycloudy` | 2       |
//! | `cloudy`       | 3       |
//! | `lightrain`    | 4       |
//! | `heavyrain`    | 5       |
//! | `mist`         | 5       |
//! | `fog`          | 6       |
//! | `lightsnow`    | 7       |
//! | anything else  | 0       |

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;

use wr_core::normalize_label;

use crate::{WeatherError, WeatherResult};

const DEFAULT_PENALTIES: &[(&str, f64)] = &[
    ("fair",         0.0),
    ("partlycloudy", 1.0),
    ("mostlycloudy", 2.0),
    ("cloudy",       3.0),
    ("lightrain",    4.0),
    ("heavyrain",    5.0),
    ("mist",         5.0),
    ("fog",          6.0),
    ("lightsnow",    7.0),
];

/// Condition label → extra miles.  Labels are normalized on insert and on
/// lookup, so `"Light Rain"` and `"lightrain"` are the same key.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>"))]
pub struct PenaltyTable {
    penalties: FxHashMap<String, f64>,
}

impl PenaltyTable {
    /// A table with no entries: every condition costs 0.
    pub fn empty() -> Self {
        Self { penalties: FxHashMap::default() }
    }

    /// Builder-style insert.
    pub fn with(mut self, condition: &str, miles: f64) -> Self {
        self.insert(condition, miles);
        self
    }

    pub fn insert(&mut self, condition: &str, miles: f64) {
        self.penalties.insert(normalize_label(condition), miles);
    }

    /// Extra miles for `condition`; 0 for unlisted labels (including
    /// `"unknown"`).
    pub fn penalty(&self, condition: &str) -> f64 {
        if let Some(&p) = self.penalties.get(condition) {
            return p;
        }
        self.penalties
            .get(&normalize_label(condition))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.penalties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.penalties.is_empty()
    }

    /// Entries sorted by label.
    pub fn entries(&self) -> Vec<(&str, f64)> {
        let mut v: Vec<_> = self.penalties.iter().map(|(k, &p)| (k.as_str(), p)).collect();
        v.sort_by(|a, b| a.0.cmp(b.0));
        v
    }

    /// Load a table from a CSV file with header `condition,penalty`.
    pub fn from_csv(path: &Path) -> WeatherResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Like [`from_csv`](Self::from_csv) but accepts any `Read` source.
    ///
    /// Strict, unlike the weather loader: a bad row fails the load.
    pub fn from_reader<R: Read>(reader: R) -> WeatherResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut table = Self::empty();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let (Some(condition), Some(penalty)) = (record.get(0), record.get(1)) else {
                return Err(WeatherError::Penalty(format!("line {line}: expected condition,penalty")));
            };
            let miles = penalty
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .ok_or_else(|| WeatherError::Penalty(format!("line {line}: invalid penalty {penalty:?}")))?;
            table.insert(condition, miles);
        }
        Ok(table)
    }
}

impl Default for PenaltyTable {
    fn default() -> Self {
        DEFAULT_PENALTIES
            .iter()
            .fold(Self::empty(), |t, &(c, p)| t.with(c, p))
    }
}

impl From<BTreeMap<String, f64>> for PenaltyTable {
    fn from(map: BTreeMap<String, f64>) -> Self {
        map.iter().fold(Self::empty(), |t, (c, &p)| t.with(c, p))
    }
}

impl From<PenaltyTable> for BTreeMap<String, f64> {
    fn from(table: PenaltyTable) -> Self {
        table.penalties.into_iter().collect()
    }
}
