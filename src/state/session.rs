use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GenerationError;
use crate::question::{QuizQuestion, QuizSettings};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    #[default]
    Settings,
    InProgress,
    Completed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Phase::Settings => f.write_str("settings"),
            Phase::InProgress => f.write_str("in-progress"),
            Phase::Completed => f.write_str("completed"),
        }
    }
}

/// Identifies one generation request. A response is only applied while its
/// ticket is still the one the session is waiting for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub phase: Phase,
    pub index: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    GenerationStarted(QuizSettings),
    GenerationSucceeded(Ticket, Vec<QuizQuestion>),
    GenerationFailed(Ticket, String),
    Rejected(String),
    Answer { index: usize, text: String },
    Advance,
    Retreat,
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    settings: Option<QuizSettings>,
    questions: Vec<QuizQuestion>,
    answers: HashMap<Uuid, String>,
    index: usize,
    phase: Phase,
    last_error: Option<String>,
    generation: u64,
    pending: bool,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> Option<&QuizSettings> {
        self.settings.as_ref()
    }

    pub fn topic(&self) -> &str {
        self.settings.as_ref().map(|s| s.topic()).unwrap_or("")
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            Phase::InProgress => self.questions.get(self.index),
            _ => None,
        }
    }

    pub fn position(&self) -> Position {
        Position { phase: self.phase, index: self.index, total: self.questions.len() }
    }

    pub fn answer(&self, question: &QuizQuestion) -> Option<&str> {
        self.answers.get(&question.id()).map(|a| a.as_str())
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| self.answers.contains_key(&q.id())).count()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        if self.pending { Some(Ticket(self.generation)) } else { None }
    }

    fn accepts(&self, ticket: Ticket) -> bool {
        self.pending && ticket.0 == self.generation
    }
}

/// Applies one event to a session and returns the next session.
///
/// Events that make no sense in the current phase leave the session as it was.
pub fn transition(mut session: QuizSession, event: SessionEvent) -> QuizSession {
    match event {
        SessionEvent::GenerationStarted(settings) => {
            if session.phase == Phase::Settings && !session.pending {
                session.generation += 1;
                session.pending = true;
                session.settings = Some(settings);
                session.last_error = None;
            }
        },
        SessionEvent::GenerationSucceeded(ticket, questions) if session.accepts(ticket) => {
            session.pending = false;
            if questions.is_empty() {
                session.last_error = Some(GenerationError::ParseYieldedNoQuestions.to_string());
            } else {
                session.questions = questions;
                session.answers.clear();
                session.index = 0;
                session.phase = Phase::InProgress;
            }
        },
        SessionEvent::GenerationFailed(ticket, message) if session.accepts(ticket) => {
            session.pending = false;
            session.last_error = Some(message);
        },
        SessionEvent::GenerationSucceeded(..) | SessionEvent::GenerationFailed(..) => (),
        SessionEvent::Rejected(message) => {
            if session.phase == Phase::Settings {
                session.last_error = Some(message);
            }
        },
        SessionEvent::Answer { index, text } => {
            if session.phase == Phase::InProgress {
                if let Some(id) = session.questions.get(index).map(|q| q.id()) {
                    session.answers.insert(id, text);
                }
            }
        },
        SessionEvent::Advance => {
            if session.phase == Phase::InProgress {
                if session.index + 1 < session.questions.len() {
                    session.index += 1;
                } else {
                    session.phase = Phase::Completed;
                }
            }
        },
        SessionEvent::Retreat => {
            if session.phase == Phase::InProgress && session.index > 0 {
                session.index -= 1;
            }
        },
        SessionEvent::Reset => {
            session = QuizSession { generation: session.generation + 1, ..QuizSession::default() };
        },
    }
    session
}
