//! Per-connection protocol handling on the central side.
//!
//! One handler serves one agency connection:
//!
//! 1. `BEGIN` names the agency.
//! 2. Every batch is stored and acked with `OK`. A batch that does not
//!    decode or cannot be stored gets `FAIL`, as does one before `BEGIN`.
//! 3. `END` marks the agency as finished.
//! 4. `GETWINNERS` waits for the draw and answers with the agency's
//!    winning documents, or `FAIL` if this connection never sent `END`.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use lotto_core::{
    Bet, ControlMessage, LottoError, Request, RequestCodec, Status, WinnersResponse,
};

use crate::lottery::Lottery;

/// Serve one agency connection until it closes or `cancel` fires.
pub struct AgencyHandler<T> {
    framed: Framed<T, RequestCodec>,
    lottery: Arc<Lottery>,
    agency: Option<u8>,
    ended: bool,
}

impl<T> AgencyHandler<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: T, lottery: Arc<Lottery>, max_frame_size: usize) -> Self {
        Self {
            framed: Framed::new(stream, RequestCodec::new(max_frame_size)),
            lottery,
            agency: None,
            ended: false,
        }
    }

    /// The agency named by `BEGIN`, once it arrived.
    pub fn agency(&self) -> Option<u8> {
        self.agency
    }

    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<(), LottoError> {
        loop {
            let request = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                request = self.framed.next() => request,
            };
            match request {
                Some(request) => self.handle(request?, cancel).await?,
                None => {
                    debug!(agency = ?self.agency, "agency closed the connection");
                    return Ok(());
                }
            }
        }
    }

    async fn handle(&mut self, request: Request, cancel: &CancellationToken) -> Result<(), LottoError> {
        match request {
            Request::Control(ControlMessage::Begin { agency }) => {
                if let Some(current) = self.agency.filter(|&a| a != agency) {
                    warn!(current, agency, "BEGIN for a different agency; ignored");
                    return Ok(());
                }
                self.agency = Some(agency);
                info!(action = "begin_session", result = "success", agency);
                Ok(())
            }
            Request::Batch(bets) => self.store_batch(bets).await,
            Request::Rejected(reason) => {
                warn!(action = "bets_received", result = "fail", agency = ?self.agency, %reason);
                self.reply(Status::Fail.to_frame()).await
            }
            Request::Control(ControlMessage::End) => {
                match self.agency {
                    Some(agency) => {
                        self.ended = true;
                        if self.lottery.finish(agency) {
                            info!(action = "draw", result = "success");
                        }
                    }
                    None => warn!("END before BEGIN; ignored"),
                }
                Ok(())
            }
            Request::Control(ControlMessage::GetWinners { agency }) => {
                self.answer_winners(agency, cancel).await
            }
        }
    }

    async fn store_batch(&mut self, bets: Vec<Bet>) -> Result<(), LottoError> {
        let count = bets.len();
        let accepted = match self.agency {
            Some(agency) if !self.ended => bets.iter().all(|bet| bet.agency() == agency),
            _ => false,
        };
        if !accepted {
            warn!(action = "bets_received", result = "fail", agency = ?self.agency, amount = count);
            return self.reply(Status::Fail.to_frame()).await;
        }

        if let Err(e) = self.lottery.store(bets).await {
            error!(action = "bets_received", result = "fail", amount = count, error = %e);
            return self.reply(Status::Fail.to_frame()).await;
        }
        info!(action = "bets_received", result = "success", amount = count);
        self.reply(Status::Ok.to_frame()).await
    }

    async fn answer_winners(&mut self, agency: u8, cancel: &CancellationToken) -> Result<(), LottoError> {
        if !self.ended || self.agency != Some(agency) {
            warn!(action = "winners_query", result = "fail", agency, "agency has not finished");
            return self.reply(WinnersResponse::Unavailable.to_frame()).await;
        }

        if !self.lottery.is_drawn() {
            debug!(agency, "waiting for the remaining agencies");
        }
        let drawn = tokio::select! {
            _ = cancel.cancelled() => false,
            _ = self.lottery.wait_for_draw() => true,
        };
        if !drawn {
            return self.reply(WinnersResponse::Unavailable.to_frame()).await;
        }

        let winners = self.lottery.winners(agency).await;
        info!(action = "winners_query", result = "success", agency, winners = winners.len());
        self.reply(WinnersResponse::Ready(winners).to_frame()).await
    }

    async fn reply(&mut self, frame: bytes::Bytes) -> Result<(), LottoError> {
        self.framed.send(frame).await
    }
}
