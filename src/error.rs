
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Http error: {0}")]
    Http(#[from] http::Error),
    #[error("Invalid uri: {0}")]
    Uri(#[from] http::uri::InvalidUri),
    #[error("Hyper error: {0}")]
    Hyper(#[from] hyper::Error),
    #[error("Pdf error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("{0}")]
    String(String),
}

pub type QuizResult<T> = Result<T, Error>;

/// Failures on the quiz generation path. All of them leave the session in
/// the settings phase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    GenerationFailed(String),
    #[error("Could not reach the quiz backend: {0}")]
    Transport(String),
    #[error("The generated quiz did not contain any usable questions")]
    ParseYieldedNoQuestions,
}

impl From<Error> for GenerationError {
    fn from(e: Error) -> Self {
        GenerationError::Transport(e.to_string())
    }
}

pub trait IntoQuizResult<T> {
    fn into_result(self) -> QuizResult<T>;
}

impl<T> IntoQuizResult<T> for http::Result<T> {
    fn into_result(self) -> QuizResult<T> {
        Ok(self?)
    }
}
