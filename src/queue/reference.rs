//! PR reference parsing for `ack`

use std::fmt;
use std::str::FromStr;

use crate::error::PrAttentionError;

/// How a user pointed at a PR on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrReference {
    /// `org/repo` and PR number, from a URL or `org/repo#123`
    RepoNumber { repo: String, number: u64 },
    /// Raw host-assigned identity
    Id(String),
}

impl FromStr for PrReference {
    type Err = PrAttentionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PrAttentionError::InvalidReference("empty reference".to_string()));
        }

        if s.contains("github.com") || s.contains("/pull/") {
            return parse_url(s);
        }

        if let Some((repo, number)) = s.split_once('#') {
            let number = parse_number(number)
                .ok_or_else(|| PrAttentionError::InvalidReference(format!("invalid PR number: {}", s)))?;
            if !is_repo_name(repo) {
                return Err(PrAttentionError::InvalidReference(format!("expected org/repo#N: {}", s)));
            }
            return Ok(PrReference::RepoNumber {
                repo: repo.to_string(),
                number,
            });
        }

        Ok(PrReference::Id(s.to_string()))
    }
}

impl fmt::Display for PrReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrReference::RepoNumber { repo, number } => write!(f, "{}#{}", repo, number),
            PrReference::Id(id) => f.write_str(id),
        }
    }
}

// https://github.com/org/repo/pull/123[/files][?query][#fragment]
fn parse_url(s: &str) -> Result<PrReference, PrAttentionError> {
    let parts: Vec<&str> = s.split('/').collect();
    let pull = parts
        .iter()
        .enumerate()
        .skip(2)
        .find(|(_, part)| **part == "pull")
        .map(|(i, _)| i);

    let Some(i) = pull else {
        return Err(PrAttentionError::InvalidReference(format!("invalid URL format: {}", s)));
    };

    let number = parts
        .get(i + 1)
        .and_then(|n| parse_number(n))
        .ok_or_else(|| PrAttentionError::InvalidReference(format!("invalid PR number in URL: {}", s)))?;

    Ok(PrReference::RepoNumber {
        repo: format!("{}/{}", parts[i - 2], parts[i - 1]),
        number,
    })
}

/// Leading digits only, so `123?tab=files` and `123#discussion` still parse.
fn parse_number(s: &str) -> Option<u64> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

fn is_repo_name(s: &str) -> bool {
    matches!(s.split_once('/'), Some((org, repo)) if !org.is_empty() && !repo.is_empty() && !repo.contains('/'))
}
