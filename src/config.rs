use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::QuizResult;
use crate::question::{Difficulty, QuestionCount, QuestionKind};

pub const CONFIG_FILE: &str = "quizgen.config";
pub const DEFAULT_BACKEND: &str = "http://127.0.0.1:5000";

/// Values the `generate` command falls back to when no flag is given.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    difficulty: Difficulty,
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(rename = "questionCount")]
    question_count: QuestionCount,
}

impl Defaults {
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn question_count(&self) -> QuestionCount {
        self.question_count
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    backend: String,
    output_dir: Option<PathBuf>,
    defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: DEFAULT_BACKEND.to_string(),
            output_dir: None,
            defaults: Defaults::default(),
        }
    }
}

impl Config {
    /// Reads `quizgen.config` from `root`. A missing file gives the defaults.
    pub fn from(root: &Path) -> QuizResult<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(Path::new("."))
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Applies command-line overrides and resolves the output directory
    /// against the quiz root.
    fn resolve(mut self, root: &Path, backend: Option<String>, output_dir: Option<PathBuf>) -> Self {
        if let Some(backend) = backend {
            self.backend = backend;
        }
        let dir = output_dir.or(self.output_dir.take());
        self.output_dir = Some(match dir {
            Some(dir) => root.join(dir),
            None => root.to_path_buf(),
        });
        self
    }
}

pub fn get_config(root: &str, backend: Option<String>, output_dir: Option<PathBuf>) -> Result<(PathBuf, Config), String> {
	let path = root.to_string();
	std::fs::canonicalize(&path)
		.map_err(|_| format!("Could not find quiz root: {}\n", path))
		.and_then(|root|{
			Config::from(&root)
				.map_err(|e| format!("Could not import {} file: {}\n", CONFIG_FILE, e))
				.map(|config| {
					let config = config.resolve(&root, backend, output_dir);
					(root, config)
				})
		})
}
