use crate::config::Settings;
use crate::domain::observation::{Column, Observation, ObservationTable};
use crate::error::DashboardError;
use crate::storage::TabularStore;
use crate::time::day_first::parse_day_first;
use anyhow::Context;
use std::path::{Path, PathBuf};

const UTF8_BOM: char = '\u{feff}';

/// Observation table backed by a single CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.data_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl TabularStore for CsvFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn load(&self) -> anyhow::Result<ObservationTable> {
        if !self.exists().await {
            return Err(DashboardError::FileNotFound {
                path: self.location(),
            }
            .into());
        }

        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let table = decode_table(&bytes)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;

        tracing::debug!(
            path = %self.path.display(),
            rows = table.rows.len(),
            columns = table.columns.len(),
            "loaded observation table"
        );
        Ok(table)
    }

    async fn save(&self, table: &ObservationTable) -> anyhow::Result<()> {
        let bytes = encode_table(table)?;

        // Write aside and rename so a failed write leaves the previous file intact.
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        tracing::info!(
            path = %self.path.display(),
            rows = table.rows.len(),
            "saved observation table"
        );
        Ok(())
    }
}

pub fn decode_table(bytes: &[u8]) -> anyhow::Result<ObservationTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .context("failed to read header row")?
        .iter()
        .map(|h| h.trim_start_matches(UTF8_BOM).trim().to_string())
        .collect();
    let known: Vec<Option<Column>> = columns.iter().map(|h| Column::from_header(h)).collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Header is line 1; quoted cells may span lines, so prefer the reader's position.
        let record = record.with_context(|| format!("malformed record {}", idx + 1))?;
        let line = record.position().map_or(idx as u64 + 2, |p| p.line());
        // Short records read as blank cells; extra fields would be lost on the next save.
        anyhow::ensure!(
            record.len() <= columns.len(),
            "record at line {line} has {} fields but the header has {}",
            record.len(),
            columns.len()
        );

        let mut row = Observation::default();
        for (pos, header) in columns.iter().enumerate() {
            let value = record.get(pos).unwrap_or("").to_string();
            let optional = (!value.is_empty()).then(|| value.clone());
            match known[pos] {
                Some(Column::Date) => {
                    row.date = parse_day_first(&value);
                    row.date_raw = value;
                }
                Some(Column::Stock) => row.stock = value,
                Some(Column::Sector) => row.sector = optional,
                Some(Column::Analysis) => row.analysis = optional,
                Some(Column::RatingBefore) => row.rating_before = optional,
                Some(Column::RatingAfter) => row.rating_after = optional,
                Some(Column::Note) => row.note = optional,
                None => {
                    if !value.is_empty() {
                        row.extra.insert(header.clone(), value);
                    }
                }
            }
        }
        rows.push(row);
    }

    Ok(ObservationTable { columns, rows })
}

pub fn encode_table(table: &ObservationTable) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.columns)
        .context("failed to write header row")?;

    for row in &table.rows {
        writer
            .write_record(table.columns.iter().map(|h| row.cell(h)))
            .context("failed to write record")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush csv writer: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = "\u{feff}Date,Stock,Sector,Analysis,Rating_Before,Rating_After,Note,Target\n\
        05-01-2026,ACME,Energy,\"Breakout, volume up\",Buy,,,120\n\
        garbage,OLD,Bank,,,,,\n";

    #[test]
    fn decodes_known_and_extra_columns() {
        let table = decode_table(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.columns[0], "Date");
        assert_eq!(table.rows.len(), 2);

        let first = &table.rows[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(first.stock, "ACME");
        assert_eq!(first.analysis.as_deref(), Some("Breakout, volume up"));
        assert_eq!(first.rating_before.as_deref(), Some("Buy"));
        assert_eq!(first.rating_after, None);
        assert_eq!(first.extra.get("Target").map(String::as_str), Some("120"));

        let second = &table.rows[1];
        assert_eq!(second.date, None);
        assert_eq!(second.date_raw, "garbage");
    }

    #[test]
    fn short_records_read_as_blank_cells() {
        let table = decode_table(b"Date,Stock,Sector,Note\n05-01-2026,ACME\n").unwrap();
        assert_eq!(table.rows[0].sector, None);
        assert_eq!(table.rows[0].note, None);
    }

    #[test]
    fn encode_preserves_unparsed_dates_and_column_order() {
        let table = decode_table(SAMPLE.as_bytes()).unwrap();
        let bytes = encode_table(&table).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Stock,Sector,Analysis,Rating_Before,Rating_After,Note,Target")
        );
        assert_eq!(
            lines.next(),
            Some("05-01-2026,ACME,Energy,\"Breakout, volume up\",Buy,,,120")
        );
        assert_eq!(lines.next(), Some("garbage,OLD,Bank,,,,,"));
    }

    #[test]
    fn cell_text_is_kept_verbatim() {
        let text = "Date,Stock,Sector,Analysis,Note\n\
            01-01-2026,ACME,Energy,\"  - point one\n  - point two\n\", keep \n";
        let table = decode_table(text.as_bytes()).unwrap();
        assert_eq!(
            table.rows[0].analysis.as_deref(),
            Some("  - point one\n  - point two\n")
        );
        assert_eq!(table.rows[0].note.as_deref(), Some(" keep "));

        let bytes = encode_table(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), text);
    }

    #[test]
    fn padded_headers_still_match_columns() {
        let table = decode_table(b" Date , Stock ,Sector\n05-01-2026, acme ,Energy\n").unwrap();
        assert_eq!(table.columns, vec!["Date", "Stock", "Sector"]);
        assert_eq!(table.rows[0].stock, " acme ");
        assert_eq!(table.rows[0].stock_key(), "ACME");
        assert_eq!(table.rows[0].date, NaiveDate::from_ymd_opt(2026, 1, 5));
    }

    #[test]
    fn rejects_records_wider_than_the_header() {
        let err = decode_table(b"Date,Stock\n05-01-2026,ACME\n06-01-2026,ACME,Energy\n")
            .unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CsvFileStore::new(dir.path().join("absent.csv"));
        assert!(!store.exists().await);

        let err = store.load().await.unwrap_err();
        assert!(matches!(
            DashboardError::find(&err),
            Some(DashboardError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn save_then_load_keeps_edits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("daily_stocks.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let store = CsvFileStore::new(&path);
        let mut table = store.load().await.unwrap();
        table.ensure_column(Column::Note);
        table.rows[0].note = Some("line one\nline two".to_string());
        store.save(&table).await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert_eq!(
            reloaded.rows[0].note.as_deref(),
            Some("line one\nline two")
        );
        assert_eq!(reloaded.rows.len(), 2);
        assert!(!dir.path().join("daily_stocks.csv.tmp").exists());
    }

    #[tokio::test]
    async fn editing_the_latest_row_leaves_history_rows_untouched() {
        let history = "01-01-2026,ACME,Energy,\"  indented\n  analysis\n\",Buy,Sell, old note \n";
        let latest = "02-01-2026,ACME,Energy,fresh,,,\n";
        let original = format!(
            "Date,Stock,Sector,Analysis,Rating_Before,Rating_After,Note\n{history}{latest}"
        );

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("daily_stocks.csv");
        std::fs::write(&path, &original).unwrap();

        let store = CsvFileStore::new(&path);
        let gate = crate::storage::lock::WriteGate::new();
        let edit = crate::editor::Edit::Rating {
            section: crate::domain::observation::RatingSection::Before,
            rating: crate::domain::observation::Rating::Sell,
        };
        let idx = crate::editor::edit_and_persist(&store, &gate, "acme", &edit)
            .await
            .unwrap();
        assert_eq!(idx, 1);

        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            saved,
            format!(
                "Date,Stock,Sector,Analysis,Rating_Before,Rating_After,Note\n{history}02-01-2026,ACME,Energy,fresh,Sell,,\n"
            )
        );
    }
}
