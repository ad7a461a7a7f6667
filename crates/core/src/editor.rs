use crate::domain::observation::{stock_key, Column, ObservationTable, Rating, RatingSection};
use crate::error::DashboardError;
use crate::storage::lock::WriteGate;
use crate::storage::TabularStore;
use crate::time::day_first::display_date;
use serde::{Deserialize, Serialize};

const NO_ANALYSIS: &str = "No analysis available yet.";
const NOT_AVAILABLE: &str = "N/A";
const EMPTY_CELL: &str = "—";

/// A single user change to a stock's latest row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Rating {
        section: RatingSection,
        rating: Rating,
    },
    Note(String),
}

impl Edit {
    pub fn note(text: &str) -> Self {
        Edit::Note(text.trim().to_string())
    }

    pub fn column(&self) -> Column {
        match self {
            Edit::Rating { section, .. } => section.column(),
            Edit::Note(_) => Column::Note,
        }
    }

    pub fn confirmation(&self) -> &'static str {
        match self {
            Edit::Rating { .. } => "Rating saved",
            Edit::Note(_) => "Note saved",
        }
    }
}

/// Form fields posted by the stock page (`action=save_rating|save_note`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditForm {
    pub action: Option<String>,
    pub section: Option<String>,
    pub rating: Option<String>,
    pub note: Option<String>,
}

impl EditForm {
    pub fn into_edit(self) -> Result<Edit, DashboardError> {
        match self.action.as_deref().map(str::trim) {
            Some("save_rating") => {
                let section = self
                    .section
                    .as_deref()
                    .ok_or_else(|| DashboardError::invalid_edit("Missing section"))?
                    .parse()?;
                let rating = self
                    .rating
                    .as_deref()
                    .ok_or_else(|| DashboardError::invalid_edit("Missing rating"))?
                    .parse()?;
                Ok(Edit::Rating { section, rating })
            }
            Some("save_note") => Ok(Edit::note(self.note.as_deref().unwrap_or_default())),
            Some(other) => Err(DashboardError::invalid_edit(format!(
                "Unknown action '{other}'"
            ))),
            None => Err(DashboardError::invalid_edit("Missing action")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockView {
    pub stock: String,
    pub sector: String,
    pub analysis: String,
    pub latest_date: String,
    pub rating_before: Option<Rating>,
    pub rating_after: Option<Rating>,
    pub note: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub date: String,
    pub sector: String,
    pub analysis: String,
}

/// Index of the row that edits for `stock` apply to: the greatest parsed date, with the
/// later file position winning ties. Undated rows rank below every dated one.
pub fn latest_row_index(table: &ObservationTable, stock: &str) -> Option<usize> {
    let key = stock_key(stock);
    if key.is_empty() {
        return None;
    }
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.stock_key() == key)
        .max_by_key(|(idx, row)| (row.date, *idx))
        .map(|(idx, _)| idx)
}

pub fn stock_view(table: &ObservationTable, stock: &str) -> Option<StockView> {
    let latest = &table.rows[latest_row_index(table, stock)?];
    let key = latest.stock_key();

    let history = table
        .rows
        .iter()
        .filter(|row| row.stock_key() == key)
        .map(|row| HistoryEntry {
            date: display_date(row.date),
            sector: row.sector.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            analysis: row.analysis.clone().unwrap_or_else(|| EMPTY_CELL.to_string()),
        })
        .collect();

    Some(StockView {
        stock: latest.stock.trim().to_string(),
        sector: latest
            .sector
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        analysis: latest
            .analysis
            .clone()
            .unwrap_or_else(|| NO_ANALYSIS.to_string()),
        latest_date: display_date(latest.date),
        rating_before: latest.rating(RatingSection::Before),
        rating_after: latest.rating(RatingSection::After),
        note: latest.note.clone().unwrap_or_default(),
        history,
    })
}

/// Apply `edit` to the latest row of `stock`, returning the row index touched.
pub fn apply_edit(table: &mut ObservationTable, stock: &str, edit: &Edit) -> anyhow::Result<usize> {
    let idx = latest_row_index(table, stock).ok_or_else(|| DashboardError::StockNotFound {
        stock: stock.trim().to_string(),
    })?;

    table.ensure_column(edit.column());
    let row = &mut table.rows[idx];
    match edit {
        Edit::Rating { section, rating } => row.set_rating(*section, *rating),
        Edit::Note(text) => row.note = (!text.is_empty()).then(|| text.clone()),
    }
    Ok(idx)
}

/// Load, edit, and write back the whole table while holding the write gate.
pub async fn edit_and_persist(
    store: &dyn TabularStore,
    gate: &WriteGate,
    stock: &str,
    edit: &Edit,
) -> anyhow::Result<usize> {
    let _guard = gate.acquire().await;

    let mut table = store.load().await?;
    let idx = apply_edit(&mut table, stock, edit)?;
    store.save(&table).await?;

    tracing::info!(stock = %stock.trim(), row = idx, column = edit.column().header(), "stock record updated");
    Ok(idx)
}
