use std::process::Command;

use super::parse::{parse, QueryResult};
use super::path::resolve;

/// Outcome of one query round-trip through the engine. Exactly one variant
/// is ever produced; a failure carries a single human-readable diagnostic
/// with a stage label identifying the phase that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(QueryResult),
    Failure(String),
}

/// Invokes the external query engine and classifies the result. Holds no
/// state across calls; every invocation blocks until the child exits.
#[derive(Debug, Clone)]
pub struct Executor {
    program: String,
}

impl Executor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Resolves the raw database path and executes the query against it.
    pub fn run(&self, raw_path: &str, query: &str) -> Outcome {
        let resolved = match resolve(raw_path) {
            Ok(path) => path,
            Err(e) => return Outcome::Failure(stage_failure("resolving path", &[e.to_string()])),
        };
        self.execute(&resolved, query)
    }

    /// Spawns `<program> -csv -header <path> <query>`, captures both output
    /// channels, and waits for completion.
    pub fn execute(&self, resolved_path: &str, query: &str) -> Outcome {
        let output = Command::new(&self.program)
            .args(["-csv", "-header"])
            .arg(resolved_path)
            .arg(query)
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                return Outcome::Failure(stage_failure(
                    "executing command",
                    &[format!("exec: {e}")],
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let mut causes = vec![format!("exec: {}", output.status)];
            if !stderr.is_empty() {
                causes.push(format!("{}: {}", self.program, stderr));
            }
            return Outcome::Failure(stage_failure("executing command", &causes));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse(&stdout) {
            Ok(result) => Outcome::Success(result),
            Err(e) => Outcome::Failure(stage_failure("parsing data", &[e.to_string()])),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new("sqlite3")
    }
}

/// Joins the non-empty causes with `; ` under a stage label, producing one
/// displayable line.
fn stage_failure(stage: &str, causes: &[String]) -> String {
    let joined: Vec<&str> = causes
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    format!("{}: {}", stage, joined.join("; "))
}
