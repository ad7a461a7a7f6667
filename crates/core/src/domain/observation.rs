use crate::error::DashboardError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Columns the dashboard understands. Anything else in the file is carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Stock,
    Sector,
    Analysis,
    RatingBefore,
    RatingAfter,
    Note,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Date,
        Column::Stock,
        Column::Sector,
        Column::Analysis,
        Column::RatingBefore,
        Column::RatingAfter,
        Column::Note,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Stock => "Stock",
            Column::Sector => "Sector",
            Column::Analysis => "Analysis",
            Column::RatingBefore => "Rating_Before",
            Column::RatingAfter => "Rating_After",
            Column::Note => "Note",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Self::ALL.into_iter().find(|c| c.header() == header)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Buy,
    Sell,
    Not,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Buy, Rating::Sell, Rating::Not];

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Buy => "Buy",
            Rating::Sell => "Sell",
            Rating::Not => "Not",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Buy" => Ok(Rating::Buy),
            "Sell" => Ok(Rating::Sell),
            "Not" => Ok(Rating::Not),
            other => Err(DashboardError::invalid_edit(format!(
                "Invalid rating '{other}' (expected Buy, Sell or Not)"
            ))),
        }
    }
}

/// Which of the two rating columns an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingSection {
    Before,
    After,
}

impl RatingSection {
    pub fn column(self) -> Column {
        match self {
            RatingSection::Before => Column::RatingBefore,
            RatingSection::After => Column::RatingAfter,
        }
    }
}

impl FromStr for RatingSection {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "before" => Ok(RatingSection::Before),
            "after" => Ok(RatingSection::After),
            other => Err(DashboardError::invalid_edit(format!(
                "Invalid section '{other}' (expected before or after)"
            ))),
        }
    }
}

/// One spreadsheet row.
///
/// The raw date text is kept next to the parsed date so rows that fail to parse still
/// round-trip through a save. Rating cells hold the raw text for the same reason; use
/// [`Observation::rating`] for the typed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub date_raw: String,
    pub date: Option<NaiveDate>,
    pub stock: String,
    pub sector: Option<String>,
    pub analysis: Option<String>,
    pub rating_before: Option<String>,
    pub rating_after: Option<String>,
    pub note: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl Observation {
    pub fn rating(&self, section: RatingSection) -> Option<Rating> {
        let raw = match section {
            RatingSection::Before => self.rating_before.as_deref(),
            RatingSection::After => self.rating_after.as_deref(),
        };
        raw.and_then(|s| s.parse().ok())
    }

    pub fn set_rating(&mut self, section: RatingSection, rating: Rating) {
        let slot = match section {
            RatingSection::Before => &mut self.rating_before,
            RatingSection::After => &mut self.rating_after,
        };
        *slot = Some(rating.as_str().to_string());
    }

    /// Case-insensitive, whitespace-insensitive identity of the row's stock.
    pub fn stock_key(&self) -> String {
        stock_key(&self.stock)
    }

    /// Cell text for a named header, in the shape it is written back to the file.
    pub fn cell(&self, header: &str) -> &str {
        let value = match Column::from_header(header) {
            Some(Column::Date) => Some(self.date_raw.as_str()),
            Some(Column::Stock) => Some(self.stock.as_str()),
            Some(Column::Sector) => self.sector.as_deref(),
            Some(Column::Analysis) => self.analysis.as_deref(),
            Some(Column::RatingBefore) => self.rating_before.as_deref(),
            Some(Column::RatingAfter) => self.rating_after.as_deref(),
            Some(Column::Note) => self.note.as_deref(),
            None => self.extra.get(header).map(String::as_str),
        };
        value.unwrap_or("")
    }
}

pub fn stock_key(stock: &str) -> String {
    stock.trim().to_uppercase()
}

/// The whole dataset plus the header row it was read with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    pub columns: Vec<String>,
    pub rows: Vec<Observation>,
}

impl ObservationTable {
    pub fn has_column(&self, column: Column) -> bool {
        self.columns
            .iter()
            .any(|h| Column::from_header(h) == Some(column))
    }

    pub fn missing_columns(&self, required: &[Column]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.has_column(**c))
            .map(|c| c.header().to_string())
            .collect()
    }

    pub fn require_columns(&self, required: &[Column]) -> anyhow::Result<()> {
        let columns = self.missing_columns(required);
        if !columns.is_empty() {
            return Err(DashboardError::MissingColumns { columns }.into());
        }
        Ok(())
    }

    /// Append a header for a column the file did not have yet.
    pub fn ensure_column(&mut self, column: Column) {
        if !self.has_column(column) {
            self.columns.push(column.header().to_string());
        }
    }
}
