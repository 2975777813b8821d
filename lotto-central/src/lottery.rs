//! Shared lottery state: stored bets and the draw barrier.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::{watch, Mutex};

use lotto_core::{Bet, LottoError, WinnerSet};

/// Bets from every agency plus the set of agencies that sent END.
///
/// The draw happens once `expected_agencies` distinct agencies finished.
/// Shared between connection tasks behind an `Arc`.
///
/// With a storage file, every accepted batch is also appended to it as
/// CSV rows: `agency,first_name,last_name,document,birthdate,number`.
#[derive(Debug)]
pub struct Lottery {
    bets: Mutex<Vec<Bet>>,
    storage: Option<PathBuf>,
    winning_number: u32,
    expected_agencies: usize,
    finished: watch::Sender<BTreeSet<u8>>,
}

impl Lottery {
    pub fn new(expected_agencies: usize, winning_number: u32) -> Self {
        let (finished, _) = watch::channel(BTreeSet::new());
        Self {
            bets: Mutex::new(Vec::new()),
            storage: None,
            winning_number,
            expected_agencies,
            finished,
        }
    }

    /// Append accepted bets to `path`, creating it if needed.
    pub fn with_storage(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage = Some(path.into());
        self
    }

    pub fn has_won(&self, bet: &Bet) -> bool {
        bet.number() == self.winning_number
    }

    /// Keep `bets`, writing them to the storage file first.
    ///
    /// Nothing is kept when the write fails.
    pub async fn store(&self, bets: Vec<Bet>) -> Result<(), LottoError> {
        let mut stored = self.bets.lock().await;
        if let Some(path) = &self.storage {
            append_rows(path, &bets).await?;
        }
        stored.extend(bets);
        Ok(())
    }

    pub async fn stored(&self) -> usize {
        self.bets.lock().await.len()
    }

    /// Record that `agency` sent END. Returns `true` when this completes
    /// the draw.
    pub fn finish(&self, agency: u8) -> bool {
        let mut completed = false;
        self.finished.send_modify(|done| {
            let before = done.len() >= self.expected_agencies;
            done.insert(agency);
            completed = !before && done.len() >= self.expected_agencies;
        });
        completed
    }

    pub fn is_drawn(&self) -> bool {
        self.finished.borrow().len() >= self.expected_agencies
    }

    /// Wait until every expected agency has finished.
    pub async fn wait_for_draw(&self) {
        let mut rx = self.finished.subscribe();
        let expected = self.expected_agencies;
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|done| done.len() >= expected).await;
    }

    /// Documents of `agency`'s winning bets.
    pub async fn winners(&self, agency: u8) -> WinnerSet {
        self.bets
            .lock()
            .await
            .iter()
            .filter(|bet| bet.agency() == agency && self.has_won(bet))
            .map(Bet::document)
            .collect()
    }
}

async fn append_rows(path: &Path, bets: &[Bet]) -> Result<(), LottoError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for bet in bets {
        writer
            .write_record([
                bet.agency().to_string(),
                bet.first_name().to_string(),
                bet.last_name().to_string(),
                bet.document().to_string(),
                bet.birthdate().to_string(),
                bet.number().to_string(),
            ])
            .map_err(|e| storage_error(path, e))?;
    }
    let rows = writer
        .into_inner()
        .map_err(|e| storage_error(path, e.into_error()))?;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| storage_error(path, e))?;
    file.write_all(&rows).await.map_err(|e| storage_error(path, e))?;
    file.flush().await.map_err(|e| storage_error(path, e))
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> LottoError {
    LottoError::Storage(format!("{}: {e}", path.display()))
}
