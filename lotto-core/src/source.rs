//! Where an agency's bets come from.
//!
//! The session driver owns the cursor; a source only answers "give me up
//! to `limit` records starting at `offset`", in source order.

use async_trait::async_trait;

use crate::bet::RawBet;
use crate::error::LottoError;

#[async_trait]
pub trait BetSource: Send {
    /// Records `offset..offset + limit`, fewer at the end, empty when
    /// exhausted.
    async fn fetch(&mut self, offset: usize, limit: usize) -> Result<Vec<RawBet>, LottoError>;
}

/// In-memory source, mostly for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    bets: Vec<RawBet>,
}

impl VecSource {
    pub fn new(bets: Vec<RawBet>) -> Self {
        Self { bets }
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }
}

#[async_trait]
impl BetSource for VecSource {
    async fn fetch(&mut self, offset: usize, limit: usize) -> Result<Vec<RawBet>, LottoError> {
        let start = offset.min(self.bets.len());
        let end = offset.saturating_add(limit).min(self.bets.len());
        Ok(self.bets[start..end].to_vec())
    }
}
