
mod layout;
mod pdf;

pub use layout::{layout, ReportDocument};

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use regex::Regex;
use serde::Serialize;

use crate::error::QuizResult;
use crate::state::QuizSession;

// Whitespace and characters a file name cannot hold
static SLUG_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\s/\\:*?"<>|\x00-\x1F]+"#).unwrap());

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// Rounded percentage, 0 for an empty quiz.
    pub fn percentage(&self) -> u32 {
        rounded_percent(self.correct, self.total)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{}/{} ({}%)", self.correct, self.total, self.percentage()))
    }
}

fn rounded_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * part + total) / (2 * total)) as u32
}

pub fn score(session: &QuizSession) -> Score {
    let correct = session.questions().iter()
        .filter(|q| session.answer(q).is_some_and(|answer| q.is_correct(answer)))
        .count();
    Score { correct, total: session.questions().len() }
}

/// Share of answered questions, as a rounded percentage.
pub fn progress(session: &QuizSession) -> u32 {
    rounded_percent(session.answered_count(), session.questions().len())
}

pub fn slug(topic: &str) -> String {
    SLUG_SEPARATORS.replace_all(topic.trim(), "-").to_lowercase()
}

pub fn file_name(topic: &str) -> String {
    format!("quiz-results-{}.pdf", slug(topic))
}

pub struct Report {
    pub file_name: String,
    pub document: ReportDocument,
    pub bytes: Vec<u8>,
}

pub fn export(session: &QuizSession) -> QuizResult<Report> {
    let document = layout(session, score(session));
    let bytes = pdf::render(&document.pages)?;
    Ok(Report { file_name: file_name(session.topic()), document, bytes })
}

pub fn export_to_dir(session: &QuizSession, dir: &Path) -> QuizResult<PathBuf> {
    let report = export(session)?;
    let path = dir.join(&report.file_name);
    std::fs::write(&path, &report.bytes)?;
    log::info!("Exported {} page(s) to {:?}", report.document.pages.len(), path);
    Ok(path)
}
