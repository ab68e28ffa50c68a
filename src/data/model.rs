use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::InvalidMetricError;

// ---------------------------------------------------------------------------
// Field – one numeric observation column
// ---------------------------------------------------------------------------

/// The numeric observation columns carried by every [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TotalCases,
    TotalDeaths,
    NewCases,
    NewDeaths,
    PeopleFullyVaccinatedPerHundred,
}

/// Fields that can be drawn as per-entity time series.
pub const SERIES_FIELDS: [Field; 4] = [
    Field::TotalCases,
    Field::TotalDeaths,
    Field::NewCases,
    Field::NewDeaths,
];

/// Fields offered for the map. The first one is the default.
pub const MAP_FIELDS: [Field; 3] = [
    Field::TotalCases,
    Field::TotalDeaths,
    Field::PeopleFullyVaccinatedPerHundred,
];

impl Field {
    pub const ALL: [Field; 5] = [
        Field::TotalCases,
        Field::TotalDeaths,
        Field::NewCases,
        Field::NewDeaths,
        Field::PeopleFullyVaccinatedPerHundred,
    ];

    /// Column name as it appears in the source file header.
    pub fn column(self) -> &'static str {
        match self {
            Field::TotalCases => "total_cases",
            Field::TotalDeaths => "total_deaths",
            Field::NewCases => "new_cases",
            Field::NewDeaths => "new_deaths",
            Field::PeopleFullyVaccinatedPerHundred => "people_fully_vaccinated_per_hundred",
        }
    }

    /// Human-readable label: underscores become spaces, each word capitalised.
    pub fn label(self) -> String {
        self.column()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse `name` and require it to be one of `allowed`.
    pub fn parse_among(name: &str, allowed: &[Field]) -> Result<Field, InvalidMetricError> {
        name.parse::<Field>()
            .ok()
            .filter(|f| allowed.contains(f))
            .ok_or_else(|| InvalidMetricError::new(name, allowed))
    }
}

impl FromStr for Field {
    type Err = InvalidMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.column() == s)
            .ok_or_else(|| InvalidMetricError::new(s, &Field::ALL))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// One observation: an entity on a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub iso_code: String,
    pub location: String,
    pub date: NaiveDate,
    pub total_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_cases: Option<f64>,
    pub new_deaths: Option<f64>,
    pub people_fully_vaccinated_per_hundred: Option<f64>,
}

impl Record {
    /// Value of a numeric field, `None` when not recorded.
    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::TotalCases => self.total_cases,
            Field::TotalDeaths => self.total_deaths,
            Field::NewCases => self.new_cases,
            Field::NewDeaths => self.new_deaths,
            Field::PeopleFullyVaccinatedPerHundred => self.people_fully_vaccinated_per_hundred,
        }
    }

    /// Both cumulative fields are present.
    pub fn has_cumulative_counts(&self) -> bool {
        self.total_cases.is_some() && self.total_deaths.is_some()
    }
}

// ---------------------------------------------------------------------------
// DateInterval – closed calendar range
// ---------------------------------------------------------------------------

/// Closed date interval `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateInterval {
    /// Returns `None` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(DateInterval { start, end })
    }

    /// Interval covering a single day.
    pub fn day(date: NaiveDate) -> Self {
        DateInterval {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Grow the interval so that it covers `date`.
    pub fn extend(&mut self, date: NaiveDate) {
        self.start = self.start.min(date);
        self.end = self.end.max(date);
    }

    /// Intersect with `bounds`. If nothing overlaps, the bounds themselves are returned.
    pub fn clamp_to(&self, bounds: &DateInterval) -> DateInterval {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        DateInterval::new(start, end).unwrap_or(*bounds)
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All records in source order. Never mutated after loading.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    /// Rows dropped at load time because their date cell was empty.
    skipped_rows: usize,
}

impl Dataset {
    pub fn new(records: Vec<Record>, skipped_rows: usize) -> Self {
        Dataset {
            records,
            skipped_rows,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest observed dates, `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<DateInterval> {
        date_bounds(self.records.iter())
    }
}

/// Smallest interval covering every record yielded by `rows`.
pub fn date_bounds<'a>(rows: impl IntoIterator<Item = &'a Record>) -> Option<DateInterval> {
    rows.into_iter().fold(None, |acc: Option<DateInterval>, r| {
        Some(match acc {
            Some(mut interval) => {
                interval.extend(r.date);
                interval
            }
            None => DateInterval::day(r.date),
        })
    })
}
