use std::path::PathBuf;
use tabular::{Row, Table};

use crate::client::MaterialKind;
use crate::config::Config;
use crate::error::GenerationError;
use crate::question::{Difficulty, QuestionCount, QuestionKind, QuizSettings};
use crate::state::{GenerateOutcome, Phase, QuizSessionService};

/// Settings for a `generate` command, falling back to the configured defaults.
pub fn build_settings(
    config: &Config,
    topic: &str,
    difficulty: Option<Difficulty>,
    count: Option<usize>,
    kind: Option<QuestionKind>,
) -> Result<QuizSettings, GenerationError> {
    let defaults = config.defaults();
    let count = match count {
        Some(count) => QuestionCount::try_from(count)?,
        None => defaults.question_count(),
    };
    Ok(QuizSettings::new(
        topic,
        difficulty.unwrap_or(defaults.difficulty()),
        kind.unwrap_or(defaults.kind()),
        count,
    ))
}

pub fn generate(session: QuizSessionService, settings: QuizSettings) {
    println!("Generating a quiz on {:?}...", settings.topic());
    tokio::task::spawn(async move {
        match session.generate_quiz(settings).await {
            Ok(GenerateOutcome::Generated(count)) => quiz_print!("Quiz ready with {} question(s). Use `show` to see the first one.", count),
            Ok(GenerateOutcome::Busy) => quiz_print!("A quiz is already being generated."),
            Ok(GenerateOutcome::NotInSettings) => quiz_print!("A quiz is already loaded. Use `reset` to start over."),
            Ok(GenerateOutcome::Stale) => quiz_print!("The session was reset, the generated quiz was discarded."),
            Err(e) => quiz_print!("{}", e),
        }
    });
}

pub async fn status(session: QuizSessionService) {
    let snapshot = session.snapshot().await;
    print!("status: ");
    match snapshot.phase() {
        Phase::Settings => {
            if let (true, Some(settings)) = (snapshot.is_pending(), snapshot.settings()) {
                println!("Generating quiz\ntopic: {}\ndifficulty: {}\ntype: {}\nquestions: {}",
                    settings.topic(), settings.difficulty(), settings.kind(), settings.question_count().get());
            } else {
                println!("Waiting for settings");
            }
            if let Some(e) = snapshot.last_error() {
                println!("last error: {}", e);
            }
        },
        Phase::InProgress => {
            let position = snapshot.position();
            println!("Question {}/{} in progress\ntopic: {}\nprogress: {}%",
                position.index + 1, position.total, snapshot.topic(), session.progress().await);
        },
        Phase::Completed => {
            println!("Finished quiz\ntopic: {}\nscore: {}", snapshot.topic(), session.current_score().await);
        },
    }
}

pub async fn show(session: QuizSessionService) {
    let snapshot = session.snapshot().await;
    let question = match snapshot.current_question() {
        Some(question) => question,
        None => {
            println!("No question to show (status: {}).", snapshot.phase());
            return;
        }
    };
    let position = snapshot.position();
    println!("Question {}/{}: {}", position.index + 1, position.total, question);
    if !question.is_multiple_choice() {
        println!("Free answer, use `answer <text>`.");
    }
    if let Some(answer) = snapshot.answer(question) {
        println!("Your answer: {}", answer);
    }
}

pub async fn questions(session: QuizSessionService) {
    let snapshot = session.snapshot().await;
    let mut table = Table::new("\t{:>}: {:<}  {:<}");
    for (i, question) in snapshot.questions().iter().enumerate() {
        table.add_row(Row::new()
            .with_cell(i + 1)
            .with_cell(question.question())
            .with_cell(snapshot.answer(question).unwrap_or("-")));
    }
    println!("{}", table);
}

pub async fn answer(session: QuizSessionService, text: &str) {
    let position = session.position().await;
    if position.phase != Phase::InProgress {
        println!("No quiz in progress.");
        return;
    }
    if session.record_answer(position.index, text).await {
        println!("Answer recorded: {}", text);
    }
}

pub async fn choose(session: QuizSessionService, letter: char) {
    let snapshot = session.snapshot().await;
    let option = snapshot.current_question()
        .and_then(|q| q.option_by_letter(letter))
        .cloned();
    match option {
        Some(option) => answer(session, &option).await,
        None => println!("No option {} for the current question.", letter),
    }
}

pub async fn next(session: QuizSessionService) {
    let position = session.advance().await;
    match position.phase {
        Phase::InProgress => show(session).await,
        Phase::Completed => {
            println!("Quiz finished!");
            score(session).await;
        },
        Phase::Settings => println!("No quiz in progress."),
    }
}

pub async fn prev(session: QuizSessionService) {
    let position = session.retreat().await;
    if position.phase == Phase::InProgress {
        show(session).await;
    } else {
        println!("Cannot go back (status: {}).", position.phase);
    }
}

pub async fn score(session: QuizSessionService) {
    let score = session.current_score().await;
    let progress = session.progress().await;
    let table = Table::new("\t{:<} {:>}")
        .with_row(Row::new().with_cell("score:").with_cell(score))
        .with_row(Row::new().with_cell("progress:").with_cell(format!("{}%", progress)));
    println!("{}", table);
}

pub async fn export(session: QuizSessionService, dir: PathBuf) {
    match session.export_report(&dir).await {
        Ok(path) => println!("Report written: {:?}", path),
        Err(e) => println!("An error occurred while trying to export: {}", e),
    }
}

pub async fn reset(session: QuizSessionService) {
    session.reset_session().await;
    println!("Session reset.");
}

pub async fn materials(session: QuizSessionService, topic: &str, roadmap: bool) {
    let kind = if roadmap { MaterialKind::Roadmap } else { MaterialKind::Materials };
    match session.client().request_materials(topic, kind).await {
        Ok(markdown) => println!("{}", markdown),
        Err(e) => println!("{}", e),
    }
}

pub async fn content(session: QuizSessionService, prompt: &str) {
    match session.client().request_content(prompt).await {
        Ok(text) => println!("{}", text),
        Err(e) => println!("{}", e),
    }
}
