//! `gh` CLI search client.

use log::debug;
use std::process::Command;

use super::types::{SEARCH_FIELDS, SearchFilter, SearchResult};
use crate::error::{PrAttentionError, Result};

/// Maximum results requested per search.
pub const SEARCH_LIMIT: u32 = 100;

/// Host query capability used by the poller.
pub trait PrSearch {
    /// Search open PRs matching `filter`, optionally scoped to `orgs`.
    fn search(&self, filter: SearchFilter, orgs: &[String]) -> Result<Vec<SearchResult>>;
}

/// Runs an external program and returns its stdout.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String], env: &[(String, String)]) -> Result<Vec<u8>>;
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], env: &[(String, String)]) -> Result<Vec<u8>> {
        let output = Command::new(program)
            .args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| PrAttentionError::Search(format!("Failed to execute {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrAttentionError::Search(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

/// Searches PRs through `gh search prs`.
#[derive(Debug, Clone)]
pub struct GhClient<R: CommandRunner = SystemRunner> {
    runner: R,
    gh_host: Option<String>,
}

impl GhClient<SystemRunner> {
    /// Create a client that shells out to the real `gh` binary.
    pub fn new(gh_host: Option<String>) -> Self {
        Self::with_runner(SystemRunner, gh_host)
    }
}

impl<R: CommandRunner> GhClient<R> {
    pub fn with_runner(runner: R, gh_host: Option<String>) -> Self {
        Self { runner, gh_host }
    }

    fn env(&self) -> Vec<(String, String)> {
        match self.gh_host.as_deref() {
            Some(host) if !host.is_empty() => vec![("GH_HOST".to_string(), host.to_string())],
            _ => Vec::new(),
        }
    }
}

impl<R: CommandRunner> PrSearch for GhClient<R> {
    fn search(&self, filter: SearchFilter, orgs: &[String]) -> Result<Vec<SearchResult>> {
        let args = build_search_args(filter, orgs);
        debug!("Running gh {}", args.join(" "));

        let stdout = self.runner.run("gh", &args, &self.env())?;
        let results: Vec<SearchResult> = serde_json::from_slice(&stdout)
            .map_err(|e| PrAttentionError::Search(format!("Failed to parse gh search output: {}", e)))?;

        debug!("{:?} search returned {} PRs", filter, results.len());
        Ok(results)
    }
}

/// Arguments for `gh` to run one PR search.
pub fn build_search_args(filter: SearchFilter, orgs: &[String]) -> Vec<String> {
    let mut args = vec![
        "search".to_string(),
        "prs".to_string(),
        filter.flag().to_string(),
        "--state=open".to_string(),
        format!("--limit={}", SEARCH_LIMIT),
        "--json".to_string(),
        SEARCH_FIELDS.to_string(),
    ];
    if !orgs.is_empty() {
        args.push(format!("--owner={}", orgs.join(",")));
    }
    args
}
