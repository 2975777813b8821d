//! Agency session driver.
//!
//! Drives one connection through the whole exchange:
//!
//! 1. `BEGIN` with the agency id.
//! 2. Batches pulled from a [`BetSource`], each followed by an `OK`/`FAIL`
//!    ack before the next one is sent.
//! 3. `END`, then `GETWINNERS` and the winners response.
//!
//! Exactly one request is ever in flight. Cancellation is checked between
//! batches only; a blocked read or write finishes first.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::bet::Bet;
use crate::codec::{self, MAX_FRAME_SIZE};
use crate::error::LottoError;
use crate::message::{ControlMessage, Status, WinnerSet, WinnersResponse};
use crate::network::{write_all, FrameReader, DEFAULT_READ_CAPACITY};
use crate::source::BetSource;
use crate::state::SessionPhase;

// ── SessionConfig ────────────────────────────────────────────────

/// Knobs for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Agency id sent with BEGIN / GETWINNERS and stamped on every bet.
    pub agency: u8,
    /// Most records pulled from the source per iteration.
    pub batch_size: usize,
    /// Pause between batches.
    pub loop_period: Duration,
    /// Cap on a batch frame, terminator included.
    pub max_frame_size: usize,
    /// Receive ceiling for acks and the winners response.
    pub read_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            agency: 1,
            batch_size: 100,
            loop_period: Duration::ZERO,
            max_frame_size: MAX_FRAME_SIZE,
            read_capacity: DEFAULT_READ_CAPACITY,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), LottoError> {
        if self.batch_size == 0 {
            return Err(LottoError::Config("batch_size must be at least 1".into()));
        }
        if self.max_frame_size <= codec::TERMINATOR.len() {
            return Err(LottoError::Config(format!(
                "max_frame_size {} leaves no room for records",
                self.max_frame_size
            )));
        }
        if self.read_capacity < 2 * codec::TERMINATOR.len() + 4 {
            return Err(LottoError::Config(format!(
                "read_capacity {} cannot hold an ack",
                self.read_capacity
            )));
        }
        Ok(())
    }
}

// ── SessionEvents ────────────────────────────────────────────────

/// Observer for what happens during a session.
///
/// Every method has a no-op default.
pub trait SessionEvents: Send {
    fn session_started(&self, _agency: u8) {}
    /// A batch of `count` bets was acknowledged with `OK`.
    fn batch_acked(&self, _count: usize) {}
    /// A batch of `count` bets was acknowledged with `FAIL`.
    fn batch_rejected(&self, _count: usize) {}
    fn winners_received(&self, _winners: &WinnerSet) {}
    /// The session stopped early after `sent` bets.
    fn cancelled(&self, _sent: usize) {}
}

/// Reports session events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl SessionEvents for TracingEvents {
    fn session_started(&self, agency: u8) {
        tracing::debug!(action = "begin_session", result = "success", agency);
    }

    fn batch_acked(&self, count: usize) {
        tracing::info!(action = "bets_sent", result = "success", amount = count);
    }

    fn batch_rejected(&self, count: usize) {
        tracing::info!(action = "bets_sent", result = "fail", amount = count);
    }

    fn winners_received(&self, winners: &WinnerSet) {
        tracing::info!(
            action = "winners_query",
            result = "success",
            winners = winners.len()
        );
    }

    fn cancelled(&self, sent: usize) {
        tracing::info!(action = "loop_stopped", result = "success", sent);
    }
}

// ── SessionOutcome ───────────────────────────────────────────────

/// Totals for a session that ran to the winners query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Bets written to the wire.
    pub sent: usize,
    /// Batch frames written.
    pub batches: usize,
    /// Batch frames acked with `FAIL`.
    pub rejected_batches: usize,
    pub winners: WinnerSet,
}

/// How [`SessionDriver::run`] ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed(SessionReport),
    /// Cancelled between batches; END and GETWINNERS were not sent and
    /// the transport has been shut down.
    Cancelled { sent: usize },
}

// ── SessionDriver ────────────────────────────────────────────────

/// Owns the transport and the "last sent" cursor for one session.
pub struct SessionDriver<T, S, E = TracingEvents> {
    stream: T,
    source: S,
    events: E,
    config: SessionConfig,
    reader: FrameReader,
    phase: SessionPhase,
    /// Bets sent so far; also the source offset of the next batch.
    cursor: usize,
    batches: usize,
    rejected_batches: usize,
}

impl<T, S, E> SessionDriver<T, S, E>
where
    T: AsyncRead + AsyncWrite + Unpin,
    S: BetSource,
    E: SessionEvents,
{
    pub fn new(stream: T, source: S, config: SessionConfig, events: E) -> Self {
        Self {
            stream,
            source,
            events,
            reader: FrameReader::new(config.read_capacity),
            config,
            phase: SessionPhase::default(),
            cursor: 0,
            batches: 0,
            rejected_batches: 0,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Bets sent so far.
    pub fn sent(&self) -> usize {
        self.cursor
    }

    /// Run the session up to and including the winners query.
    ///
    /// Any error is fatal: the phase is forced to `Closed` and the caller
    /// should drop the driver.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<SessionOutcome, LottoError> {
        self.config.validate()?;

        let span = tracing::info_span!("session", agency = self.config.agency);
        let result = self.drive(cancel).instrument(span).await;
        if result.is_err() {
            self.phase.abort();
        }
        result
    }

    /// Release the transport after the winners were received.
    pub async fn close(&mut self) -> Result<(), LottoError> {
        self.phase.close()?;
        self.stream
            .shutdown()
            .await
            .map_err(LottoError::TransportWrite)
    }

    async fn drive(&mut self, cancel: &CancellationToken) -> Result<SessionOutcome, LottoError> {
        self.begin().await?;

        loop {
            if cancel.is_cancelled() {
                return Ok(self.cancel().await);
            }
            if !self.send_next_batch().await? {
                break;
            }
            if !self.config.loop_period.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.config.loop_period) => {}
                }
            }
        }

        self.end().await?;
        let winners = self.query_winners().await?;

        Ok(SessionOutcome::Completed(SessionReport {
            sent: self.cursor,
            batches: self.batches,
            rejected_batches: self.rejected_batches,
            winners,
        }))
    }

    async fn begin(&mut self) -> Result<(), LottoError> {
        self.phase.begin()?;
        let agency = self.config.agency;
        write_all(&mut self.stream, &ControlMessage::Begin { agency }.to_frame()).await?;
        self.events.session_started(agency);
        Ok(())
    }

    /// Pull the next slice from the source and send it.
    ///
    /// Returns `false` once the source is exhausted.
    async fn send_next_batch(&mut self) -> Result<bool, LottoError> {
        let raw = self
            .source
            .fetch(self.cursor, self.config.batch_size)
            .await?;
        if raw.is_empty() {
            return Ok(false);
        }

        let agency = self.config.agency;
        let bets = raw
            .into_iter()
            .map(|r| r.into_bet(agency))
            .collect::<Result<Vec<Bet>, _>>()?;

        let mut pending = &bets[..];
        while !pending.is_empty() {
            let take = self.fitting_prefix(pending);
            let frame = codec::assemble(&pending[..take], self.config.max_frame_size)?;
            let status = self.exchange_batch(&frame).await?;

            self.cursor += take;
            self.batches += 1;
            match status {
                Status::Ok => self.events.batch_acked(take),
                Status::Fail => {
                    self.rejected_batches += 1;
                    self.events.batch_rejected(take);
                }
            }
            pending = &pending[take..];
        }
        Ok(true)
    }

    /// Largest halving of `bets` whose frame fits, down to one record.
    ///
    /// A single record that still does not fit is left for `assemble` to
    /// reject.
    fn fitting_prefix(&self, bets: &[Bet]) -> usize {
        let mut take = bets.len();
        while take > 1 && codec::frame_len(&bets[..take]) > self.config.max_frame_size {
            take /= 2;
        }
        if take < bets.len() {
            tracing::debug!(
                requested = bets.len(),
                take,
                "batch exceeds frame limit; splitting"
            );
        }
        take
    }

    async fn exchange_batch(&mut self, frame: &[u8]) -> Result<Status, LottoError> {
        write_all(&mut self.stream, frame).await?;
        let ack = self.reader.read_frame(&mut self.stream).await?;
        Status::try_from(&ack[..])
    }

    async fn end(&mut self) -> Result<(), LottoError> {
        self.phase.end()?;
        write_all(&mut self.stream, &ControlMessage::End.to_frame()).await
    }

    async fn query_winners(&mut self) -> Result<WinnerSet, LottoError> {
        self.phase.query_winners()?;
        let agency = self.config.agency;
        write_all(
            &mut self.stream,
            &ControlMessage::GetWinners { agency }.to_frame(),
        )
        .await?;

        let head = self.reader.read_frame(&mut self.stream).await?;
        let response = match Status::try_from(&head[..]) {
            // The marker arrived on its own; the document list is the
            // next frame.
            Ok(status) => {
                let body = self.reader.read_frame(&mut self.stream).await?;
                WinnersResponse::from_parts(status, &body)?
            }
            Err(_) => WinnersResponse::parse(&head)?,
        };

        match response {
            WinnersResponse::Ready(winners) => {
                self.events.winners_received(&winners);
                Ok(winners)
            }
            WinnersResponse::Unavailable => Err(LottoError::WinnersUnavailable),
        }
    }

    async fn cancel(&mut self) -> SessionOutcome {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!("shutdown after cancellation failed: {e}");
        }
        self.phase.abort();
        self.events.cancelled(self.cursor);
        SessionOutcome::Cancelled { sent: self.cursor }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use futures::StreamExt;
    use tokio::io::{duplex, split, AsyncReadExt, DuplexStream, ReadHalf, WriteHalf};
    use tokio_test::io::Builder;
    use tokio_util::codec::FramedRead;

    use super::*;
    use crate::bet::{Birthdate, RawBet};
    use crate::codec::{Request, RequestCodec};
    use crate::source::VecSource;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Started(u8),
        Acked(usize),
        Rejected(usize),
        Winners(usize),
        Cancelled(usize),
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Event>>>);

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }
    }

    impl SessionEvents for Recorder {
        fn session_started(&self, agency: u8) {
            self.0.lock().unwrap().push(Event::Started(agency));
        }
        fn batch_acked(&self, count: usize) {
            self.0.lock().unwrap().push(Event::Acked(count));
        }
        fn batch_rejected(&self, count: usize) {
            self.0.lock().unwrap().push(Event::Rejected(count));
        }
        fn winners_received(&self, winners: &WinnerSet) {
            self.0.lock().unwrap().push(Event::Winners(winners.len()));
        }
        fn cancelled(&self, sent: usize) {
            self.0.lock().unwrap().push(Event::Cancelled(sent));
        }
    }

    /// Server end of a duplex pipe, reading requests with the central codec.
    struct FakeCentral {
        requests: FramedRead<ReadHalf<DuplexStream>, RequestCodec>,
        tx: WriteHalf<DuplexStream>,
    }

    impl FakeCentral {
        fn new(stream: DuplexStream) -> Self {
            let (rx, tx) = split(stream);
            Self {
                requests: FramedRead::new(rx, RequestCodec::default()),
                tx,
            }
        }

        async fn next(&mut self) -> Request {
            self.requests.next().await.unwrap().unwrap()
        }

        async fn next_batch(&mut self) -> Option<Vec<Bet>> {
            match self.next().await {
                Request::Batch(bets) => Some(bets),
                Request::Control(ControlMessage::End) => None,
                other => panic!("unexpected request {other:?}"),
            }
        }

        async fn reply(&mut self, frame: &[u8]) {
            self.tx.write_all(frame).await.unwrap();
        }

        /// Ack every batch with OK, then answer GETWINNERS.
        async fn ack_all(mut self, winners: WinnerSet) -> Vec<Vec<Bet>> {
            assert!(matches!(
                self.next().await,
                Request::Control(ControlMessage::Begin { .. })
            ));
            let mut batches = Vec::new();
            while let Some(bets) = self.next_batch().await {
                batches.push(bets);
                self.reply(b"OK||").await;
            }
            assert!(matches!(
                self.next().await,
                Request::Control(ControlMessage::GetWinners { .. })
            ));
            self.reply(&WinnersResponse::Ready(winners).to_frame()).await;
            batches
        }
    }

    fn config(batch_size: usize) -> SessionConfig {
        SessionConfig {
            agency: 1,
            batch_size,
            ..SessionConfig::default()
        }
    }

    fn raw_bets(n: u32) -> Vec<RawBet> {
        (0..n)
            .map(|i| RawBet::new("Ana", "Lopez", 1000 + i, "1990-02-03", i))
            .collect()
    }

    #[tokio::test]
    async fn single_bet_scenario() {
        let ana = Bet::new(1, "Ana", "Lopez", 111, Birthdate::new(1990, 2, 3), 77).unwrap();
        let batch = codec::assemble(&[ana], MAX_FRAME_SIZE).unwrap();
        let winners: WinnerSet = [111].into_iter().collect();

        let mock = Builder::new()
            .write(b"BEGIN\x01||")
            .write(&batch)
            .read(b"OK||")
            .write(b"END||")
            .write(b"GETWINNERS\x01||")
            .read(&WinnersResponse::Ready(winners).to_frame())
            .build();

        let source = VecSource::new(vec![RawBet::new("Ana", "Lopez", 111, "1990-02-03", 77)]);
        let recorder = Recorder::default();
        let mut driver = SessionDriver::new(mock, source, config(1), recorder.clone());

        let outcome = driver.run(&CancellationToken::new()).await.unwrap();

        let SessionOutcome::Completed(report) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(report.sent, 1);
        assert_eq!(report.batches, 1);
        assert!(report.winners.contains(111));
        assert_eq!(report.winners.len(), 1);
        assert_eq!(
            recorder.events(),
            vec![Event::Started(1), Event::Acked(1), Event::Winners(1)]
        );
        assert_eq!(driver.phase(), &SessionPhase::QueryingWinners);

        driver.close().await.unwrap();
        assert!(driver.phase().is_closed());
    }

    #[tokio::test]
    async fn not_a_winner_gives_empty_set() {
        let (client, server) = duplex(64);
        let source = VecSource::new(vec![RawBet::new("Ana", "Lopez", 111, "1990-02-03", 77)]);
        let mut driver = SessionDriver::new(client, source, config(1), Recorder::default());

        let server_task = tokio::spawn(async move {
            let mut central = FakeCentral::new(server);
            central.next().await;
            central.next_batch().await.unwrap();
            central.reply(b"OK||").await;
            assert_eq!(central.next_batch().await, None);
            central.next().await;
            // marker and list in separate writes
            central.reply(b"OK||").await;
            tokio::task::yield_now().await;
            central.reply(b"||").await;
            central
        });

        let outcome = driver.run(&CancellationToken::new()).await.unwrap();
        let _central = server_task.await.unwrap();
        match outcome {
            SessionOutcome::Completed(report) => assert!(report.winners.is_empty()),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn batches_follow_source_order() {
        let batch_size = 3;
        let (client, server) = duplex(4096);
        let source = VecSource::new(raw_bets(3 * batch_size as u32 + 1));
        let recorder = Recorder::default();
        let mut driver = SessionDriver::new(client, source, config(batch_size), recorder.clone());

        let server_task =
            tokio::spawn(async move { FakeCentral::new(server).ack_all(WinnerSet::new()).await });

        let outcome = driver.run(&CancellationToken::new()).await.unwrap();
        let batches = server_task.await.unwrap();

        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
        let documents: Vec<u32> = batches.iter().flatten().map(Bet::document).collect();
        assert_eq!(documents, (1000..1010).collect::<Vec<u32>>());
        assert!(matches!(
            outcome,
            SessionOutcome::Completed(SessionReport {
                sent: 10,
                batches: 4,
                ..
            })
        ));
        assert_eq!(
            recorder.events()[1..5],
            [
                Event::Acked(3),
                Event::Acked(3),
                Event::Acked(3),
                Event::Acked(1)
            ]
        );
    }

    #[tokio::test]
    async fn failed_ack_does_not_stop_the_loop() {
        let (client, server) = duplex(4096);
        let recorder = Recorder::default();
        let mut driver =
            SessionDriver::new(client, VecSource::new(raw_bets(4)), config(2), recorder.clone());

        let server_task = tokio::spawn(async move {
            let mut central = FakeCentral::new(server);
            central.next().await;
            central.next_batch().await.unwrap();
            central.reply(b"FAIL||").await;
            central.next_batch().await.unwrap();
            central.reply(b"OK||").await;
            assert_eq!(central.next_batch().await, None);
            central.next().await;
            central.reply(b"OK||||").await;
            central
        });

        let outcome = driver.run(&CancellationToken::new()).await.unwrap();
        let _central = server_task.await.unwrap();

        let SessionOutcome::Completed(report) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(report.sent, 4);
        assert_eq!(report.rejected_batches, 1);
        assert_eq!(
            recorder.events()[1..3],
            [Event::Rejected(2), Event::Acked(2)]
        );
    }

    #[tokio::test]
    async fn unknown_ack_is_desync() {
        let (client, server) = duplex(4096);
        let mut driver =
            SessionDriver::new(client, VecSource::new(raw_bets(1)), config(1), TracingEvents);

        let server_task = tokio::spawn(async move {
            let mut central = FakeCentral::new(server);
            central.next().await;
            central.next_batch().await.unwrap();
            central.reply(b"MAYBE||").await;
            central
        });

        let err = driver.run(&CancellationToken::new()).await.unwrap_err();
        let _central = server_task.await.unwrap();
        assert!(matches!(err, LottoError::ProtocolDesync(_)));
        assert!(driver.phase().is_closed());
    }

    #[tokio::test]
    async fn server_hangup_is_transport_error() {
        let (client, server) = duplex(4096);
        let mut driver =
            SessionDriver::new(client, VecSource::new(raw_bets(1)), config(1), TracingEvents);

        let server_task = tokio::spawn(async move {
            let mut central = FakeCentral::new(server);
            central.next().await;
            central.next_batch().await.unwrap();
            drop(central);
        });

        let err = driver.run(&CancellationToken::new()).await.unwrap_err();
        server_task.await.unwrap();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn cancelled_before_first_batch() {
        let (client, mut server) = duplex(4096);
        let recorder = Recorder::default();
        let mut driver =
            SessionDriver::new(client, VecSource::new(raw_bets(5)), config(2), recorder.clone());

        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = driver.run(&cancel).await.unwrap();
        assert_eq!(outcome, SessionOutcome::Cancelled { sent: 0 });
        assert!(driver.phase().is_closed());
        assert_eq!(
            recorder.events(),
            vec![Event::Started(1), Event::Cancelled(0)]
        );

        // Only BEGIN made it out before the shutdown.
        drop(driver);
        let mut written = Vec::new();
        server.read_to_end(&mut written).await.unwrap();
        assert_eq!(written, b"BEGIN\x01||");
    }

    #[tokio::test]
    async fn cancelled_between_batches() {
        let (client, server) = duplex(4096);
        let cancel = CancellationToken::new();
        let mut driver =
            SessionDriver::new(client, VecSource::new(raw_bets(6)), config(2), TracingEvents);

        let server_task = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                let mut central = FakeCentral::new(server);
                central.next().await;
                central.next_batch().await.unwrap();
                // cancel while the agency waits for this ack
                cancel.cancel();
                central.reply(b"OK||").await;
                central.requests.next().await.is_none()
            }
        });

        let outcome = driver.run(&cancel).await.unwrap();
        assert_eq!(outcome, SessionOutcome::Cancelled { sent: 2 });
        drop(driver);
        assert!(
            server_task.await.unwrap(),
            "nothing is sent after cancellation"
        );
    }

    #[tokio::test]
    async fn oversized_batch_is_split_before_writing() {
        let (client, server) = duplex(64 * 1024);
        let long = "n".repeat(255);
        let source = VecSource::new(
            (0..20)
                .map(|i| RawBet::new(long.clone(), long.clone(), i, "1990-02-03", i))
                .collect(),
        );
        // 20 records of 525 bytes do not fit one 8 KiB frame.
        let mut driver = SessionDriver::new(client, source, config(20), TracingEvents);

        let server_task =
            tokio::spawn(async move { FakeCentral::new(server).ack_all(WinnerSet::new()).await });

        let outcome = driver.run(&CancellationToken::new()).await.unwrap();
        let batches = server_task.await.unwrap();

        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 10]);
        assert!(batches.iter().all(|b| codec::frame_len(b) <= MAX_FRAME_SIZE));
        assert!(matches!(
            outcome,
            SessionOutcome::Completed(SessionReport {
                sent: 20,
                batches: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn record_over_frame_limit_is_never_written() {
        let (client, mut server) = duplex(4096);
        let source = VecSource::new(vec![RawBet::new("Ana", "Lopez", 111, "1990-02-03", 77)]);
        // 23-byte record plus terminator
        let config = SessionConfig {
            max_frame_size: 20,
            ..config(1)
        };
        let mut driver = SessionDriver::new(client, source, config, TracingEvents);

        let err = driver.run(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, LottoError::FrameTooLarge { size: 25, max: 20 }));
        assert!(driver.phase().is_closed());
        assert_eq!(driver.sent(), 0);

        drop(driver);
        let mut written = Vec::new();
        server.read_to_end(&mut written).await.unwrap();
        assert_eq!(written, b"BEGIN\x01||");
    }

    #[tokio::test]
    async fn invalid_record_fails_before_any_batch() {
        let (client, mut server) = duplex(4096);
        let source = VecSource::new(vec![RawBet::new(
            "a".repeat(300),
            "Lopez",
            1,
            "1990-02-03",
            1,
        )]);
        let mut driver = SessionDriver::new(client, source, config(1), TracingEvents);

        let err = driver.run(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, LottoError::Encoding { len: 300, .. }));

        drop(driver);
        let mut written = Vec::new();
        server.read_to_end(&mut written).await.unwrap();
        assert_eq!(written, b"BEGIN\x01||");
    }

    #[tokio::test]
    async fn winners_unavailable() {
        let (client, server) = duplex(4096);
        let mut driver =
            SessionDriver::new(client, VecSource::default(), config(1), TracingEvents);

        let server_task = tokio::spawn(async move {
            let mut central = FakeCentral::new(server);
            central.next().await;
            assert_eq!(central.next_batch().await, None);
            central.next().await;
            central
                .reply(&WinnersResponse::Unavailable.to_frame())
                .await;
            central
        });

        let err = driver.run(&CancellationToken::new()).await.unwrap_err();
        let _central = server_task.await.unwrap();
        assert!(matches!(err, LottoError::WinnersUnavailable));
    }

    #[tokio::test]
    async fn zero_batch_size_rejected() {
        let (client, _server) = duplex(64);
        let mut driver =
            SessionDriver::new(client, VecSource::default(), config(0), TracingEvents);
        let err = driver.run(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, LottoError::Config(_)));
    }
}
