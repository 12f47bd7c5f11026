
mod owner;
mod service;
mod session;

pub use service::{GenerateOutcome, QuizSessionService};
pub use session::{transition, Phase, QuizSession, SessionEvent};

use tokio::sync::mpsc::channel;

use crate::client::GenerationClient;

pub fn create_quiz_session(client: GenerationClient) -> QuizSessionService {
    let (job_sender, job_receiver) = channel(1000);

    owner::create_quiz_session(job_receiver);

    QuizSessionService::new(job_sender, client)
}
