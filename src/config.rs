//! @dose
//! purpose: Configuration file parsing for newsletter.toml. Selects the active commit rule
//!     variant, appends extra issue/commit rules, and sets the corporate domain and the
//!     units treated as time.
//!
//! when-editing:
//!     - !Config is loaded once at startup and passed through the call chain
//!     - !Extra rules are appended after the built-in rules (lowest precedence)
//!     - Extra rule labels are regex replacement templates, e.g. "PR/${id}"
//!     - A label that could expand to nothing is rejected, since the grammar would still
//!       accept the URL
//!
//! invariants:
//!     - Config::load returns default config if newsletter.toml doesn't exist
//!     - The Shortener built from a Config uses the same rules for shortening and grammars
//!
//! error-handling:
//!     - Unreadable or unparsable newsletter.toml warns on stderr and falls back to defaults
//!     - Invalid extra rule patterns or corporate domain are hard errors
//!
//! gotchas:
//!     - `scheme = true` on an extra rule prefixes the optional http(s) scheme fragment

use crate::rules::{commit_rules, issue_rules, Rule, RuleError, RuleOptions, RuleSet, OPTIONAL_SCHEME};
use crate::shortener::Shortener;
use crate::text::{CanonicalAt, DEFAULT_CORPORATE_DOMAIN};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "newsletter.toml";

/// Main configuration structure matching newsletter.toml
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Regex for the corporate email suffix trimmed to a bare `@`
    pub corporate_domain: String,

    /// Units whose change is reported as a speedup
    pub time_units: Vec<String>,

    /// Built-in commit rule variants
    pub commits: CommitRulesConfig,

    /// Extra rules appended to the built-in ones
    pub rules: ExtraRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corporate_domain: DEFAULT_CORPORATE_DOMAIN.to_string(),
            time_units: default_time_units(),
            commits: CommitRulesConfig::default(),
            rules: ExtraRules::default(),
        }
    }
}

fn default_time_units() -> Vec<String> {
    ["second", "seconds", "s", "ms", "us", "ns"]
        .iter()
        .map(|unit| unit.to_string())
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CommitRulesConfig {
    /// Recognize GitHub pull request URLs as commits
    pub pull_requests: bool,
}

impl Default for CommitRulesConfig {
    fn default() -> Self {
        Self {
            pull_requests: RuleOptions::default().pull_requests,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ExtraRules {
    pub issue: Vec<RuleConfig>,
    pub commit: Vec<RuleConfig>,
}

/// A user-defined rule
#[derive(Debug, Deserialize, Clone)]
pub struct RuleConfig {
    pub name: String,

    /// Unanchored regex; use named groups for the label template
    pub pattern: String,

    /// Replacement template producing the short label
    pub label: String,

    /// Prefix the optional http(s) scheme fragment
    #[serde(default)]
    pub scheme: bool,
}

impl RuleConfig {
    fn to_rule(&self) -> Result<Rule, RuleError> {
        let pattern = if self.scheme {
            format!("{OPTIONAL_SCHEME}{}", self.pattern)
        } else {
            self.pattern.clone()
        };
        Rule::with_template(self.name.clone(), pattern, self.label.clone())
    }
}

fn extend(mut set: RuleSet, extra: &[RuleConfig]) -> Result<RuleSet, RuleError> {
    for rule in extra {
        set.push(rule.to_rule()?);
    }
    Ok(set)
}

impl Config {
    /// Load configuration from newsletter.toml in the given root directory
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", CONFIG_FILE, e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", CONFIG_FILE, e);
                Self::default()
            }
        }
    }

    pub fn rule_options(&self) -> RuleOptions {
        RuleOptions {
            pull_requests: self.commits.pull_requests,
        }
    }

    /// Build the Shortener (rules and grammars) described by this config
    pub fn shortener(&self) -> Result<Shortener, RuleError> {
        let issues = extend(issue_rules()?, &self.rules.issue)?;
        let commits = extend(commit_rules(&self.rule_options())?, &self.rules.commit)?;
        Shortener::new(issues, commits)
    }

    pub fn canonical_at(&self) -> Result<CanonicalAt, regex::Error> {
        CanonicalAt::new(&self.corporate_domain)
    }

    pub fn is_time_unit(&self, unit: &str) -> bool {
        self.time_units.iter().any(|u| u == unit)
    }
}
