//! CSV-backed bet source.
//!
//! Each record is `first_name,last_name,document,birthdate,number`, with
//! standard CSV quoting. The file is re-read on every fetch and the first
//! `offset` non-empty records are skipped, so a source holds no state
//! between batches.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use lotto_core::{BetSource, LottoError, RawBet};

const FIELDS: usize = 5;

#[derive(Debug, Clone)]
pub struct CsvBetSource {
    path: PathBuf,
}

impl CsvBetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BetSource for CsvBetSource {
    async fn fetch(&mut self, offset: usize, limit: usize) -> Result<Vec<RawBet>, LottoError> {
        let contents = tokio::fs::read(&self.path).await.map_err(|e| {
            LottoError::Source(format!("could not open {}: {e}", self.path.display()))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_slice());

        reader
            .records()
            .filter(|row| !matches!(row, Ok(record) if record.iter().all(str::is_empty)))
            .skip(offset)
            .take(limit)
            .map(|row| {
                let record = row.map_err(|e| csv_error(&self.path, e))?;
                let line = record.position().map_or(0, csv::Position::line);
                parse_record(&record).map_err(|msg| source_error(&self.path, line, msg))
            })
            .collect()
    }
}

fn parse_record(record: &csv::StringRecord) -> Result<RawBet, String> {
    let fields: Vec<&str> = record.iter().collect();
    let [first_name, last_name, document, birthdate, number] = fields[..] else {
        return Err(format!("expected {FIELDS} fields, found {}", fields.len()));
    };

    let document = document
        .parse::<u32>()
        .map_err(|e| format!("could not parse document number {document:?}: {e}"))?;
    let number = number
        .parse::<u32>()
        .map_err(|e| format!("could not parse number {number:?}: {e}"))?;

    Ok(RawBet::new(first_name, last_name, document, birthdate, number))
}

fn csv_error(path: &Path, e: csv::Error) -> LottoError {
    match e.position() {
        Some(pos) => source_error(path, pos.line(), e.to_string()),
        None => LottoError::Source(format!("{}: {e}", path.display())),
    }
}

fn source_error(path: &Path, line: u64, msg: String) -> LottoError {
    LottoError::Source(format!("{}:{line}: {msg}", path.display()))
}
