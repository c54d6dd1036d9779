//! @ai:module:intent Probe definitions: the question asked and the grading rule
//! @ai:module:layer domain
//! @ai:module:public_api Probe, MatchMode, MatchModeError
//! @ai:module:stateless true

use regex::Regex;
use serde::{Deserialize, Serialize};

/// @ai:intent How a model reply is graded against the expected answer
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Exact,
    Contains,
    Pattern,
}

/// @ai:intent Error for an unrecognized match mode string
#[derive(Debug, thiserror::Error)]
#[error("unknown match mode '{0}', expected exact, contains, or pattern")]
pub struct MatchModeError(pub String);

impl MatchMode {
    /// @ai:intent Convert mode to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Contains => "contains",
            MatchMode::Pattern => "pattern",
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = MatchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(MatchMode::Exact),
            "contains" => Ok(MatchMode::Contains),
            "pattern" => Ok(MatchMode::Pattern),
            other => Err(MatchModeError(other.to_string())),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent A benchmark probe: prompt plus expected answer
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Probe {
    pub id: String,
    /// Prompt sent to the model verbatim
    pub prompt: String,
    pub expected: String,
    pub match_mode: MatchMode,
}

impl Probe {
    /// @ai:intent The built-in decimal comparison probe
    /// @ai:effects pure
    pub fn builtin() -> Self {
        Self {
            id: "decimal-comparison".to_string(),
            prompt: "what's larger? 9.11 or 9.8? answer only from 9.11 or 9.8. \
                     please think step by step"
                .to_string(),
            expected: "9.8".to_string(),
            match_mode: MatchMode::Exact,
        }
    }

    /// @ai:intent Grade a model reply against the expected answer
    /// @ai:effects pure
    pub fn grade(&self, response: &str) -> bool {
        match self.match_mode {
            MatchMode::Exact => response.trim() == self.expected,
            MatchMode::Contains => response.contains(&self.expected),
            MatchMode::Pattern => Regex::new(&self.expected)
                .map(|re| re.is_match(response))
                .unwrap_or(false),
        }
    }

    /// @ai:intent Check a pattern probe carries a compilable regex
    /// @ai:effects pure
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.match_mode == MatchMode::Pattern {
            Regex::new(&self.expected)
                .map_err(|e| anyhow::anyhow!("probe '{}' has invalid pattern: {}", self.id, e))?;
        }

        Ok(())
    }
}

/// @ai:intent Raw probe structure from TOML file
/// @ai:effects pure
#[derive(Debug, Deserialize)]
pub struct ProbeFile {
    pub probe: ProbeMetadata,
}

/// @ai:intent Probe metadata from TOML file
/// @ai:effects pure
#[derive(Debug, Deserialize)]
pub struct ProbeMetadata {
    pub id: String,
    pub prompt: String,
    pub expected: String,
    #[serde(default = "default_match_mode")]
    pub match_mode: MatchMode,
}

fn default_match_mode() -> MatchMode {
    MatchMode::Exact
}

impl From<ProbeFile> for Probe {
    fn from(file: ProbeFile) -> Self {
        Probe {
            id: file.probe.id,
            prompt: file.probe.prompt,
            expected: file.probe.expected,
            match_mode: file.probe.match_mode,
        }
    }
}
