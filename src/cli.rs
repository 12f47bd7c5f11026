#[macro_use]
mod print;
mod command;

use std::path::PathBuf;
use clap::{Parser, Subcommand};
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::question::{Difficulty, QuestionKind};
use crate::state::QuizSessionService;

#[derive(Parser, Debug)]
#[command(
    name = "quizgen>",
    no_binary_name = true,
    disable_version_flag = true,
    subcommand_required = true,
    arg_required_else_help = true,
    infer_subcommands = true,
)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Closes the quiz generator.
    Exit,
    /// Requests a new quiz on a topic. Runs in the background.
    Generate {
        /// Topic of the quiz.
        #[arg(required = true)]
        topic: Vec<String>,
        /// easy, medium or hard.
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
        /// Number of questions: 5, 10, 15 or 20.
        #[arg(short = 'n', long = "count")]
        count: Option<usize>,
        /// mcq, true-false or fill-blanks.
        #[arg(short = 't', long = "type")]
        kind: Option<QuestionKind>,
    },
    /// Prints the current status of the quiz.
    Status,
    /// Prints the current question.
    Show,
    /// Prints the list of questions with the recorded answers.
    Questions,
    /// Answers the current question with free text.
    Answer {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Answers the current question with the option of the given letter.
    Choose {
        letter: char,
    },
    /// Goes to the next question or finishes the quiz after the last one.
    Next,
    /// Goes back to the previous question.
    Prev,
    /// Prints the current score and progress.
    Score,
    /// Writes the results report as a PDF. (default directory: the configured output directory)
    Export {
        dir: Option<PathBuf>,
    },
    /// Discards the quiz and returns to the settings.
    Reset,
    /// Requests learning materials on a topic.
    Materials {
        #[arg(required = true)]
        topic: Vec<String>,
        /// Ask for a learning roadmap instead.
        #[arg(long)]
        roadmap: bool,
    },
    /// Sends a free prompt to the content generator.
    Content {
        #[arg(required = true)]
        prompt: Vec<String>,
    },
}

fn parse(line: &str) -> Result<Command, String> {
    CommandLine::try_parse_from(line.split_whitespace())
        .map(|c| c.command)
        .map_err(|e| e.to_string())
}

pub async fn start(session: QuizSessionService, config: Config) {
    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        quiz_command_prefix!();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Could not read command: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse(&line) {
            Ok(Command::Exit)                   => break,
            Ok(Command::Generate{topic, difficulty, count, kind}) => {
                match command::build_settings(&config, &topic.join(" "), difficulty, count, kind) {
                    Ok(settings) => command::generate(session.clone(), settings),
                    Err(e) => println!("{}", e),
                }
            },
            Ok(Command::Status)                 => command::status(session.clone()).await,
            Ok(Command::Show)                   => command::show(session.clone()).await,
            Ok(Command::Questions)              => command::questions(session.clone()).await,
            Ok(Command::Answer{text})           => command::answer(session.clone(), &text.join(" ")).await,
            Ok(Command::Choose{letter})         => command::choose(session.clone(), letter).await,
            Ok(Command::Next)                   => command::next(session.clone()).await,
            Ok(Command::Prev)                   => command::prev(session.clone()).await,
            Ok(Command::Score)                  => command::score(session.clone()).await,
            Ok(Command::Export{dir})            => {
                let dir = dir.unwrap_or_else(|| config.output_dir().to_path_buf());
                command::export(session.clone(), dir).await
            },
            Ok(Command::Reset)                  => command::reset(session.clone()).await,
            Ok(Command::Materials{topic, roadmap}) => command::materials(session.clone(), &topic.join(" "), roadmap).await,
            Ok(Command::Content{prompt})        => command::content(session.clone(), &prompt.join(" ")).await,
            Err(e) => println!("{}", e),
        }
    }
    println!("Closing quiz generator...");
}
