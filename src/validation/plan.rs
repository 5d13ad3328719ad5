// src/validation/plan.rs

use std::fmt;

use tracing::{debug, instrument};

use crate::platform::Platform;
use crate::protocol::{Command, CommandPlan};

/// Substrings that reject a command wherever they appear in it.
pub const DENYLIST: &[&str] = &["rm -rf", "format"];

/// Why a command was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// The command uses the other platform's path separator.
    OsMismatch { platform: Platform, separator: char },
    /// The command contains a denylisted substring.
    Denylisted { pattern: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OsMismatch {
                platform,
                separator,
            } => write!(f, "OS mismatch: '{separator}' is not a {platform} path separator"),
            Violation::Denylisted { pattern } => write!(f, "blocked pattern '{pattern}'"),
        }
    }
}

/// The first refused command of a plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub index: usize,
    pub command: Command,
    pub violation: Violation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationVerdict {
    Approved,
    Rejected(Rejection),
}

impl ValidationVerdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, ValidationVerdict::Approved)
    }
}

/// One check applied to every command of a plan.
pub trait SafetyRule {
    fn check(&self, command: &Command) -> Option<Violation>;
}

/// Refuses commands written with the other platform's path separator.
pub struct PathSeparatorRule {
    platform: Platform,
}

impl PathSeparatorRule {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl SafetyRule for PathSeparatorRule {
    fn check(&self, command: &Command) -> Option<Violation> {
        let separator = self.platform.foreign_separator();
        command.as_str().contains(separator).then(|| Violation::OsMismatch {
            platform: self.platform,
            separator,
        })
    }
}

/// Plain substring match: case, spacing and quoting are not normalised.
pub struct DenylistRule {
    patterns: Vec<String>,
}

impl DenylistRule {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for DenylistRule {
    fn default() -> Self {
        Self::new(DENYLIST.iter().copied())
    }
}

impl SafetyRule for DenylistRule {
    fn check(&self, command: &Command) -> Option<Violation> {
        self.patterns
            .iter()
            .find(|pattern| command.as_str().contains(pattern.as_str()))
            .map(|pattern| Violation::Denylisted {
                pattern: pattern.clone(),
            })
    }
}

/// Screens plans with an ordered list of rules.
#[derive(Default)]
pub struct SafetyValidator {
    rules: Vec<Box<dyn SafetyRule>>,
}

impl SafetyValidator {
    /// Path-separator check followed by the default denylist.
    pub fn for_platform(platform: Platform) -> Self {
        Self::default()
            .with_rule(PathSeparatorRule::new(platform))
            .with_rule(DenylistRule::default())
    }

    pub fn with_rule<R: SafetyRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Stops at the first command any rule refuses.
    #[instrument(skip_all, fields(commands = plan.len()))]
    pub fn validate(&self, plan: &CommandPlan) -> ValidationVerdict {
        for (index, command) in plan.iter().enumerate() {
            if let Some(violation) = self.rules.iter().find_map(|rule| rule.check(command)) {
                debug!(index, %command, %violation, "command rejected");
                return ValidationVerdict::Rejected(Rejection {
                    index,
                    command: command.clone(),
                    violation,
                });
            }
        }
        ValidationVerdict::Approved
    }
}
