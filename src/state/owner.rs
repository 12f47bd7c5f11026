use tokio::sync::mpsc::Receiver;
use tokio::sync::oneshot::Sender as Return;

use crate::error::GenerationError;
use crate::question::{QuizQuestion, QuizSettings};
use crate::report::{self, Score};

use super::service::{Begin, QuizSessionJob};
use super::session::{transition, Phase, Position, QuizSession, SessionEvent, Ticket};

pub(super) fn create_quiz_session(job_receiver: Receiver<QuizSessionJob>) {
    tokio::task::spawn(async move {
        let owner = QuizSessionOwner { session: QuizSession::new() };
        owner.handle_jobs(job_receiver).await
    });
}

fn reply<T>(sender: Return<T>, value: T) {
    if sender.send(value).is_err() {
        log::debug!("Session caller went away before the reply was sent");
    }
}

#[derive(Debug)]
struct QuizSessionOwner {
    session: QuizSession,
}

impl QuizSessionOwner {
    async fn handle_jobs(mut self, mut job_receiver: Receiver<QuizSessionJob>) {
        while let Some(job) = job_receiver.recv().await {
            match job {
                QuizSessionJob::Snapshot(sender)                    => reply(sender, self.session.clone()),
                QuizSessionJob::Position(sender)                    => reply(sender, self.session.position()),
                QuizSessionJob::Begin(settings, sender)             => reply(sender, self.begin(settings)),
                QuizSessionJob::Complete(ticket, result, sender)    => reply(sender, self.complete(ticket, result)),
                QuizSessionJob::Reject(message)                     => self.apply(SessionEvent::Rejected(message)),
                QuizSessionJob::Answer(index, text, sender)         => reply(sender, self.answer(index, text)),
                QuizSessionJob::Advance(sender)                     => reply(sender, self.step(SessionEvent::Advance)),
                QuizSessionJob::Retreat(sender)                     => reply(sender, self.step(SessionEvent::Retreat)),
                QuizSessionJob::Score(sender)                       => reply(sender, self.score()),
                QuizSessionJob::Progress(sender)                    => reply(sender, report::progress(&self.session)),
                QuizSessionJob::Reset(sender)                       => reply(sender, self.reset()),
            }
        }
        log::debug!("Quiz session closed");
    }

    fn apply(&mut self, event: SessionEvent) {
        let session = std::mem::take(&mut self.session);
        self.session = transition(session, event);
    }

    fn begin(&mut self, settings: QuizSettings) -> Begin {
        if self.session.is_pending() {
            return Begin::Busy;
        }
        if self.session.phase() != Phase::Settings {
            return Begin::NotInSettings;
        }
        self.apply(SessionEvent::GenerationStarted(settings));
        match self.session.pending_ticket() {
            Some(ticket) => Begin::Started(ticket),
            None => Begin::NotInSettings,
        }
    }

    fn complete(&mut self, ticket: Ticket, result: Result<Vec<QuizQuestion>, GenerationError>) -> bool {
        if self.session.pending_ticket() != Some(ticket) {
            log::info!("Discarding a quiz response that arrived after the session was reset");
            return false;
        }
        match result {
            Ok(questions) => {
                log::info!("Quiz on {:?} started with {} question(s)", self.session.topic(), questions.len());
                self.apply(SessionEvent::GenerationSucceeded(ticket, questions));
            },
            Err(e) => self.apply(SessionEvent::GenerationFailed(ticket, e.to_string())),
        }
        true
    }

    fn answer(&mut self, index: usize, text: String) -> bool {
        let accepted = self.session.phase() == Phase::InProgress && index < self.session.questions().len();
        self.apply(SessionEvent::Answer { index, text });
        accepted
    }

    fn step(&mut self, event: SessionEvent) -> Position {
        let before = self.session.phase();
        self.apply(event);
        let position = self.session.position();
        if before != Phase::Completed && position.phase == Phase::Completed {
            log::info!("Quiz completed: {}", self.score());
        }
        position
    }

    fn score(&self) -> Score {
        report::score(&self.session)
    }

    fn reset(&mut self) {
        if self.session.is_pending() {
            log::info!("Session reset while a quiz request is in flight");
        }
        self.apply(SessionEvent::Reset);
    }
}
