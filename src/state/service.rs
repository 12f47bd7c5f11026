
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::{self, Sender as Return};
use std::path::{Path, PathBuf};

use crate::client::GenerationClient;
use crate::error::{Error, GenerationError, QuizResult};
use crate::question::{QuizQuestion, QuizSettings};
use crate::report::{self, Score};

use super::session::{Position, QuizSession, Ticket};

pub enum QuizSessionJob {
    Snapshot(Return<QuizSession>),
    Position(Return<Position>),
    Begin(QuizSettings, Return<Begin>),
    Complete(Ticket, Result<Vec<QuizQuestion>, GenerationError>, Return<bool>),
    Reject(String),
    Answer(usize, String, Return<bool>),
    Advance(Return<Position>),
    Retreat(Return<Position>),
    Score(Return<Score>),
    Progress(Return<u32>),
    Reset(Return<()>),
}

pub enum Begin {
    Started(Ticket),
    Busy,
    NotInSettings,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The quiz is in progress with this many questions.
    Generated(usize),
    /// Another request is still in flight; nothing was sent.
    Busy,
    /// The session already holds a quiz; reset it first.
    NotInSettings,
    /// The session was reset while the request was in flight and the
    /// response was dropped.
    Stale,
}

/// Handle to a quiz session. Cloning it shares the same session.
#[derive(Debug, Clone)]
pub struct QuizSessionService {
    job_channel: Sender<QuizSessionJob>,
    client: GenerationClient,
}

impl QuizSessionService {
    pub(super) fn new(job_channel: Sender<QuizSessionJob>, client: GenerationClient) -> Self {
        QuizSessionService { job_channel, client }
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    pub async fn generate_quiz(&self, settings: QuizSettings) -> Result<GenerateOutcome, GenerationError> {
        if let Err(e) = settings.validate() {
            self.job_channel.send(QuizSessionJob::Reject(e.to_string())).await.expect("Send failed");
            return Err(e);
        }

        let ticket = match self.begin(settings.clone()).await {
            Begin::Started(ticket) => ticket,
            Begin::Busy => return Ok(GenerateOutcome::Busy),
            Begin::NotInSettings => return Ok(GenerateOutcome::NotInSettings),
        };

        let result = self.client.request_quiz(&settings).await;
        let count = result.as_ref().map(|questions| questions.len()).map_err(Clone::clone);
        if !self.complete(ticket, result).await {
            return Ok(GenerateOutcome::Stale);
        }
        count.map(GenerateOutcome::Generated)
    }

    async fn begin(&self, settings: QuizSettings) -> Begin {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Begin(settings, send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }

    async fn complete(&self, ticket: Ticket, result: Result<Vec<QuizQuestion>, GenerationError>) -> bool {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Complete(ticket, result, send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }

    pub async fn snapshot(&self) -> QuizSession {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Snapshot(send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }

    pub async fn position(&self) -> Position {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Position(send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }

    /// Records an answer for the question at `index`. Returns false when the
    /// answer was not recorded (no quiz in progress or index out of range).
    pub async fn record_answer(&self, index: usize, text: &str) -> bool {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Answer(index, text.to_string(), send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }

    pub async fn advance(&self) -> Position {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Advance(send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }

    pub async fn retreat(&self) -> Position {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Retreat(send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }

    pub async fn current_score(&self) -> Score {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Score(send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }

    pub async fn progress(&self) -> u32 {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Progress(send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }

    /// Writes the results report into `dir`. Fails when no quiz is loaded.
    pub async fn export_report(&self, dir: &Path) -> QuizResult<PathBuf> {
        let session = self.snapshot().await;
        if session.questions().is_empty() {
            return Err(Error::String("No quiz to export".to_string()));
        }
        report::export_to_dir(&session, dir)
    }

    pub async fn reset_session(&self) {
        let (send, recv) = oneshot::channel();
        self.job_channel.send(QuizSessionJob::Reset(send)).await.expect("Send failed");
        recv.await.expect("Receive failed")
    }
}
