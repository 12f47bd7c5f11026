use std::sync::LazyLock;
use regex::Regex;
use crate::question::QuizQuestion;

// A question block starts on any line beginning with `<n>.`
static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());
static QUESTION_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s*(.+)$").unwrap());
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-D]\)").unwrap());

const EXPLANATION_PREFIX: &str = "explanation:";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropReason {
    NotNumbered,
    EmptyQuestion,
    NoCorrectAnswer,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            DropReason::NotNumbered => f.write_str("first line is not a numbered question"),
            DropReason::EmptyQuestion => f.write_str("question text is empty"),
            DropReason::NoCorrectAnswer => f.write_str("no option is marked with `*`"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedBlock {
    pub index: usize,
    pub reason: DropReason,
}

/// Outcome of parsing one generation response: the accepted questions in
/// order, and the blocks that were silently dropped.
#[derive(Clone, Debug, Default)]
pub struct ParsedQuiz {
    pub questions: Vec<QuizQuestion>,
    pub dropped: Vec<DroppedBlock>,
}

/// Parses a Markdown quiz into questions. Malformed blocks are skipped.
pub fn parse_quiz_response(markdown: &str) -> Vec<QuizQuestion> {
    parse_quiz_report(markdown).questions
}

pub fn parse_quiz_report(markdown: &str) -> ParsedQuiz {
    let mut parsed = ParsedQuiz::default();
    for (index, block) in split_blocks(markdown).into_iter().enumerate() {
        match parse_block(&block) {
            Ok(question) => parsed.questions.push(question),
            Err(reason) => {
                log::debug!("Dropped question block {}: {}", index, reason);
                parsed.dropped.push(DroppedBlock { index, reason });
            }
        }
    }
    if !parsed.dropped.is_empty() {
        log::info!("Dropped {} malformed question block(s)", parsed.dropped.len());
    }
    parsed
}

fn split_blocks(markdown: &str) -> Vec<Vec<&str>> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in markdown.lines() {
        if BLOCK_START.is_match(line) && !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
        if !line.trim().is_empty() {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_block(lines: &[&str]) -> Result<QuizQuestion, DropReason> {
    let (first, rest) = lines.split_first().ok_or(DropReason::NotNumbered)?;
    let question = QUESTION_LINE.captures(first)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or(DropReason::NotNumbered)?;

    let mut options = Vec::new();
    let mut correct_answer = String::new();
    let mut explanation: Option<String> = None;

    for line in rest.iter().map(|l| l.trim()) {
        if OPTION_LINE.is_match(line) {
            let option = skip_chars(line, 3).trim();
            let clean = option.replacen('*', "", 1).trim().to_string();
            if option.contains('*') {
                correct_answer = clean.clone();
            }
            options.push(clean);
        } else if line.get(..EXPLANATION_PREFIX.len()).is_some_and(|p| p.eq_ignore_ascii_case(EXPLANATION_PREFIX)) {
            explanation = Some(line[EXPLANATION_PREFIX.len()..].trim().to_string());
        } else if let Some(explanation) = explanation.as_mut() {
            explanation.push(' ');
            explanation.push_str(line);
        }
    }

    if question.is_empty() {
        return Err(DropReason::EmptyQuestion);
    }
    if correct_answer.is_empty() {
        return Err(DropReason::NoCorrectAnswer);
    }
    Ok(QuizQuestion::new(question, options, correct_answer, explanation.unwrap_or_default()))
}

fn skip_chars(line: &str, n: usize) -> &str {
    line.char_indices().nth(n).map(|(i, _)| &line[i..]).unwrap_or("")
}
