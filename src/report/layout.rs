use crate::state::QuizSession;

use super::Score;

// Positions are millimetres from the top-left corner of an A4 page.
pub const PAGE_WIDTH: u32 = 210;
pub const PAGE_HEIGHT: u32 = 297;
const LEFT: u32 = 20;
const TOP: u32 = 20;
const SCORE_Y: u32 = 35;
const FIRST_QUESTION_Y: u32 = 50;
const QUESTION_BREAK_Y: u32 = 250;
const LINE_BREAK_Y: u32 = 280;
const LINE_HEIGHT: u32 = 7;
const HEADING_GAP: u32 = 3;
const QUESTION_GAP: u32 = 10;
const WRAP_COLUMNS: usize = 80;

const TITLE_SIZE: u32 = 20;
const SCORE_SIZE: u32 = 16;
const BODY_SIZE: u32 = 12;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Normal,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub style: LineStyle,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<Line>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportDocument {
    pub pages: Vec<Page>,
}

impl ReportDocument {
    pub fn lines(&self) -> impl Iterator<Item=&Line> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

struct Cursor {
    pages: Vec<Page>,
    y: u32,
}

impl Cursor {
    fn new() -> Self {
        Cursor { pages: vec![Page::default()], y: TOP }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = TOP;
    }

    fn place(&mut self, y: u32, size: u32, style: LineStyle, text: String) {
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(Line { x: LEFT, y, size, style, text });
        }
    }

    fn write(&mut self, text: &str, style: LineStyle) {
        for line in wrap(text, WRAP_COLUMNS) {
            if self.y > LINE_BREAK_Y {
                self.new_page();
            }
            self.place(self.y, BODY_SIZE, style, line);
            self.y += LINE_HEIGHT;
        }
    }
}

/// Lays out the results report: title, score, then one block per question.
pub fn layout(session: &QuizSession, score: Score) -> ReportDocument {
    let mut cursor = Cursor::new();
    cursor.place(TOP, TITLE_SIZE, LineStyle::Normal, "Quiz Results".into());
    cursor.place(SCORE_Y, SCORE_SIZE, LineStyle::Normal, format!("Score: {}", score));
    cursor.y = FIRST_QUESTION_Y;

    for (i, question) in session.questions().iter().enumerate() {
        if cursor.y > QUESTION_BREAK_Y {
            cursor.new_page();
        }
        let answer = session.answer(question);
        let correct = answer.is_some_and(|a| question.is_correct(a));

        cursor.write(&format!("Question {}: {}", i + 1, question.question()), LineStyle::Normal);
        cursor.y += HEADING_GAP;
        cursor.write(&format!("Your Answer: {}", answer.unwrap_or("Not answered")), LineStyle::Normal);
        cursor.write(
            &format!("Correct Answer: {}", question.correct_answer()),
            if correct { LineStyle::Correct } else { LineStyle::Incorrect },
        );
        cursor.write(&format!("Explanation: {}", question.explanation()), LineStyle::Normal);
        cursor.y += QUESTION_GAP;
    }

    ReportDocument { pages: cursor.pages }
}

/// Greedy word wrap; words longer than a line are split.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for mut word in text.split_whitespace() {
        while word.chars().count() > columns {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word.char_indices().nth(columns).map(|(i, _)| i).unwrap_or(word.len());
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }
        let width = current.chars().count();
        if width > 0 && width + 1 + word.chars().count() > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Difficulty, QuestionCount, QuestionKind, QuizQuestion, QuizSettings};
    use crate::report::score;
    use crate::state::{transition, SessionEvent};

    fn session(explanations: Vec<String>) -> QuizSession {
        let settings = QuizSettings::new("Rust", Difficulty::Easy, QuestionKind::MultipleChoice, QuestionCount::default());
        let session = transition(QuizSession::new(), SessionEvent::GenerationStarted(settings));
        let ticket = session.pending_ticket().unwrap();
        let questions = explanations.into_iter().enumerate().map(|(i, e)| QuizQuestion::new(
            format!("Q{}", i + 1), vec!["a".into(), "b".into()], "a".into(), e,
        )).collect();
        transition(session, SessionEvent::GenerationSucceeded(ticket, questions))
    }

    fn texts(doc: &ReportDocument) -> Vec<&str> {
        doc.lines().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn single_question_report() {
        let session = transition(session(vec!["Short.".into()]), SessionEvent::Answer { index: 0, text: "b".into() });
        let doc = layout(&session, score(&session));
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(texts(&doc), vec![
            "Quiz Results",
            "Score: 0/1 (0%)",
            "Question 1: Q1",
            "Your Answer: b",
            "Correct Answer: a",
            "Explanation: Short.",
        ]);
        let correct_line = &doc.pages[0].lines[4];
        assert_eq!(correct_line.style, LineStyle::Incorrect);
        assert_eq!((correct_line.y, doc.pages[0].lines[2].y), (FIRST_QUESTION_Y + 2 * LINE_HEIGHT + HEADING_GAP, FIRST_QUESTION_Y));
    }

    #[test]
    fn unanswered_questions_are_marked() {
        let session = session(vec!["e".into()]);
        let doc = layout(&session, score(&session));
        assert!(texts(&doc).contains(&"Your Answer: Not answered"));
    }

    #[test]
    fn new_page_when_offset_passes_threshold() {
        let session = session((0..10).map(|i| format!("Explanation {}", i)).collect());
        let doc = layout(&session, score(&session));
        assert!(doc.pages.len() > 1);
        for page in &doc.pages {
            assert!(page.lines.iter().all(|l| l.y <= LINE_BREAK_Y + LINE_HEIGHT));
        }
        for page in &doc.pages[1..] {
            assert_eq!(page.lines[0].y, TOP);
            assert!(page.lines[0].text.starts_with("Question "));
        }
        let headings: Vec<_> = texts(&doc).into_iter().filter(|t| t.starts_with("Question ")).collect();
        assert_eq!(headings.len(), 10);
        assert_eq!(headings[9], "Question 10: Q10");
    }

    #[test]
    fn long_explanation_is_wrapped_without_losing_words() {
        let explanation = "word ".repeat(200);
        let session = session(vec![explanation.clone()]);
        let doc = layout(&session, score(&session));
        let explanation_lines: Vec<_> = doc.lines().skip(5).map(|l| l.text.clone()).collect();
        assert!(explanation_lines.len() > 1);
        assert!(explanation_lines.iter().all(|l| l.chars().count() <= WRAP_COLUMNS));
        assert_eq!(explanation_lines.join(" "), format!("Explanation: {}", explanation.trim()));
    }

    #[test]
    fn wrap_splits_overlong_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("ab cd ef", 5), vec!["ab cd", "ef"]);
        assert_eq!(wrap("", 10), vec![""]);
    }
}
