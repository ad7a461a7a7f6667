use crate::domain::observation::{Column, Observation, ObservationTable};
use crate::time::day_first::axis_label;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub mod layout;
pub mod palette;

use palette::{sector_color, text_color};

pub const REQUIRED_COLUMNS: [Column; 3] = [Column::Date, Column::Stock, Column::Sector];

pub const BAR_HEIGHT: f64 = 1.0;
const BAR_WIDTH: f64 = 0.75;
const TEXT_SIZE: u32 = 11;

/// Everything the page needs to draw the chart: Plotly traces, layout and our own legend.
#[derive(Debug, Clone, Serialize)]
pub struct ChartDocument {
    pub data: Vec<BarSeries>,
    pub layout: Value,
    pub legend: Vec<LegendEntry>,
}

/// One Plotly bar trace per sector, one slot per date label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub textposition: &'static str,
    pub textfont: TextFont,
    pub hovertext: Vec<String>,
    pub hovertemplate: &'static str,
    /// First stock per day; the page links bar clicks to its detail view.
    pub customdata: Vec<String>,
    pub marker: Marker,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFont {
    pub size: u32,
    pub color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: String,
}

/// What one sector looked like on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayCell<'a> {
    pub first_stock: Option<&'a str>,
    pub count: usize,
}

impl<'a> DayCell<'a> {
    fn push(&mut self, stock: &'a str) {
        self.first_stock.get_or_insert(stock);
        self.count += 1;
    }

    pub fn height(&self) -> f64 {
        if self.count > 0 {
            BAR_HEIGHT
        } else {
            0.0
        }
    }

    pub fn display_text(&self) -> String {
        match self.first_stock {
            None => String::new(),
            Some(stock) if self.count > 1 => format!("{stock} (+{})", self.count - 1),
            Some(stock) => stock.to_string(),
        }
    }

    pub fn hover_text(&self, sector: &str) -> String {
        if self.count == 0 {
            return String::new();
        }
        let plural = if self.count > 1 { "s" } else { "" };
        format!(
            "{}<br>{sector}<br>{} stock{plural} this day",
            self.display_text(),
            self.count
        )
    }
}

pub fn build_chart(table: &ObservationTable) -> anyhow::Result<ChartDocument> {
    table.require_columns(&REQUIRED_COLUMNS)?;

    let mut dated: Vec<(NaiveDate, &Observation)> = table
        .rows
        .iter()
        .filter_map(|row| row.date.map(|d| (d, row)))
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    // Labels repeat across years ("Jan 05"); each distinct label is one x slot.
    let mut labels: Vec<String> = Vec::new();
    let mut slot_of: HashMap<String, usize> = HashMap::new();
    let mut slots = Vec::with_capacity(dated.len());
    for (date, _) in &dated {
        let label = axis_label(*date);
        let slot = *slot_of.entry(label.clone()).or_insert_with(|| {
            labels.push(label);
            labels.len() - 1
        });
        slots.push(slot);
    }

    let mut sectors: Vec<&str> = Vec::new();
    let mut cells: HashMap<&str, Vec<DayCell>> = HashMap::new();
    for ((_, row), slot) in dated.iter().zip(&slots) {
        let Some(sector) = row.sector.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        let days = cells.entry(sector).or_insert_with(|| {
            sectors.push(sector);
            vec![DayCell::default(); labels.len()]
        });
        days[*slot].push(row.stock.trim());
    }

    let data: Vec<BarSeries> = sectors
        .iter()
        .filter_map(|sector| {
            let days = cells.get(sector)?;
            days.iter()
                .any(|c| c.height() > 0.0)
                .then(|| sector_series(sector, &labels, days))
        })
        .collect();

    tracing::debug!(
        rows = table.rows.len(),
        dated = dated.len(),
        days = labels.len(),
        series = data.len(),
        "built sector chart"
    );

    Ok(ChartDocument {
        data,
        layout: layout::stacked_layout(),
        legend: legend(&sectors),
    })
}

fn sector_series(sector: &str, labels: &[String], days: &[DayCell]) -> BarSeries {
    let color = sector_color(sector).to_string();
    let font_color = text_color(&color).to_string();

    BarSeries {
        kind: "bar",
        name: sector.to_string(),
        x: labels.to_vec(),
        y: days.iter().map(DayCell::height).collect(),
        text: days.iter().map(DayCell::display_text).collect(),
        textposition: "auto",
        textfont: TextFont {
            size: TEXT_SIZE,
            color: vec![font_color; days.len()],
        },
        hovertext: days.iter().map(|c| c.hover_text(sector)).collect(),
        hovertemplate: "%{hovertext}<extra></extra>",
        customdata: days
            .iter()
            .map(|c| c.first_stock.unwrap_or_default().to_string())
            .collect(),
        marker: Marker {
            color: vec![color; days.len()],
        },
        width: BAR_WIDTH,
    }
}

/// One entry per sector ignoring case, first spelling wins, sorted ignoring case.
pub fn legend(sectors: &[&str]) -> Vec<LegendEntry> {
    let mut sorted = sectors.to_vec();
    sorted.sort_by_key(|s| s.to_lowercase());

    let mut seen = HashSet::new();
    sorted
        .into_iter()
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(|s| LegendEntry {
            name: s.trim().to_string(),
            color: sector_color(s).to_string(),
        })
        .collect()
}
