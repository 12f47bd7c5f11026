#[macro_use]
mod cli;
mod client;
mod config;
mod error;
mod parser;
mod question;
mod report;
mod state;

use std::path::PathBuf;
use clap::Parser;

use crate::client::GenerationClient;


/// Generates quizzes on any topic with an AI backend and exports the results
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct AppArgs {
    /// The root of the quiz generator, an optional quizgen.config (json) file can be located here.
    #[arg(name = "ROOT", default_value = ".")]
    root: String,
    /// Base url of the generation backend, overrides the config file.
    #[arg(long = "backend")]
    backend: Option<String>,
    /// Directory the result reports are written to, overrides the config file.
    #[arg(long = "out")]
    out: Option<PathBuf>,
}

fn init() -> Result<(PathBuf, config::Config, GenerationClient), String> {
	let args = AppArgs::parse();

	let (root, config) = config::get_config(&args.root, args.backend, args.out)?;
	let client = GenerationClient::new(config.backend())
		.map_err(|e| format!("Invalid backend url {}: {}\n", config.backend(), e))?;
	Ok((root, config, client))
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    match init() {
        Ok((root, config, client)) => {
            println!("Starting quiz generator in: {:?}", root);
            println!("Backend: {}", client.base());
            log::info!("Reports are written to {:?}", config.output_dir());

			let session = state::create_quiz_session(client);
			cli::start(session, config).await;
        },
        Err(e) => {
            println!("{}", e);
            return;
        }
    };
}
