use crate::domain::observation::{Column, Observation, ObservationTable};
use crate::time::day_first::parse_day_first;

pub fn observation(date: &str, stock: &str, sector: &str) -> Observation {
    Observation {
        date_raw: date.to_string(),
        date: parse_day_first(date),
        stock: stock.to_string(),
        sector: (!sector.is_empty()).then(|| sector.to_string()),
        ..Default::default()
    }
}

pub fn rated(date: &str, stock: &str, before: &str, after: &str) -> Observation {
    Observation {
        rating_before: (!before.is_empty()).then(|| before.to_string()),
        rating_after: (!after.is_empty()).then(|| after.to_string()),
        ..observation(date, stock, "Energy")
    }
}

pub fn table(rows: Vec<Observation>) -> ObservationTable {
    ObservationTable {
        columns: Column::ALL.iter().map(|c| c.header().to_string()).collect(),
        rows,
    }
}
