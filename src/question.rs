
use serde::{Serialize, Deserialize};
use uuid::Uuid;
use crate::error::GenerationError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Difficulty::Easy => f.write_str("easy"),
            Difficulty::Medium => f.write_str("medium"),
            Difficulty::Hard => f.write_str("hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(GenerationError::Validation(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// The kind of quiz requested from the backend.
///
/// Serialized with the backend's wire names (`mcq`, `true-false`, `fill-blanks`),
/// displayed with the names shown to the user.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[default]
    #[serde(rename = "mcq")]
    MultipleChoice,
    #[serde(rename = "true-false")]
    TrueFalse,
    #[serde(rename = "fill-blanks")]
    FillInBlank,
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            QuestionKind::MultipleChoice => f.write_str("multiple-choice"),
            QuestionKind::TrueFalse => f.write_str("true-false"),
            QuestionKind::FillInBlank => f.write_str("fill-in-blank"),
        }
    }
}

impl std::str::FromStr for QuestionKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mcq" | "multiple-choice" => Ok(QuestionKind::MultipleChoice),
            "true-false" | "tf" => Ok(QuestionKind::TrueFalse),
            "fill-blanks" | "fill-in-blank" => Ok(QuestionKind::FillInBlank),
            other => Err(GenerationError::Validation(format!("Unknown question type: {}", other))),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct QuestionCount(usize);

impl QuestionCount {
    pub const ALLOWED: [usize; 4] = [5, 10, 15, 20];

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        QuestionCount(10)
    }
}

impl TryFrom<usize> for QuestionCount {
    type Error = GenerationError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&count) {
            Ok(QuestionCount(count))
        } else {
            Err(GenerationError::Validation(
                format!("Question count must be one of {:?}, got {}", Self::ALLOWED, count)
            ))
        }
    }
}

impl From<QuestionCount> for usize {
    fn from(count: QuestionCount) -> Self {
        count.0
    }
}

/// Settings entered before a quiz is generated. Serializes to the
/// generation request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    topic: String,
    difficulty: Difficulty,
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(rename = "questionCount")]
    question_count: QuestionCount,
}

impl QuizSettings {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty, kind: QuestionKind, question_count: QuestionCount) -> Self {
        QuizSettings { topic: topic.into(), difficulty, kind, question_count }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn question_count(&self) -> QuestionCount {
        self.question_count
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.topic.trim().is_empty() {
            return Err(GenerationError::Validation("Please enter a topic".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    id: Uuid,
    question: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
}

impl QuizQuestion {
    pub fn new(question: String, options: Vec<String>, correct_answer: String, explanation: String) -> Self {
        QuizQuestion { id: Uuid::new_v4(), question, options, correct_answer, explanation }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn is_multiple_choice(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }

    /// Option text for a letter `A`..`D`, case-insensitive.
    pub fn option_by_letter(&self, letter: char) -> Option<&String> {
        let letter = letter.to_ascii_uppercase();
        if !('A'..='Z').contains(&letter) {
            return None;
        }
        self.options.get((letter as u8 - b'A') as usize)
    }
}

impl std::fmt::Display for QuizQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_str(&self.question)?;
        for (i, option) in self.options.iter().enumerate() {
            f.write_fmt(format_args!("\n  {}) {}", (b'A' + i as u8) as char, option))?;
        }
        Ok(())
    }
}
