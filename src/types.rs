use std::fmt;

use serde::Serialize;

/// Kind of a public suffix rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Literal suffix: "co.uk" covers exactly "co.uk"
    Plain,
    /// Wildcard: "*.ck" covers any single label in front of "ck"
    Wildcard,
    /// Exception: "!www.ck" carves "www.ck" out of "*.ck", leaving "ck"
    Exception,
}

/// PSL section a rule was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleOrigin {
    Icann,
    PrivateEntity,
}

/// Who manages the suffix a domain was classified under.
///
/// `None` is reported when only the implicit `*` rule applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ManagedBy {
    #[serde(rename = "ICANN")]
    Icann,
    #[serde(rename = "PRIVATE_ENTITY")]
    PrivateEntity,
    #[serde(rename = "NONE")]
    None,
}

impl ManagedBy {
    /// External name, as serialized in responses
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagedBy::Icann => "ICANN",
            ManagedBy::PrivateEntity => "PRIVATE_ENTITY",
            ManagedBy::None => "NONE",
        }
    }
}

impl From<RuleOrigin> for ManagedBy {
    fn from(origin: RuleOrigin) -> Self {
        match origin {
            RuleOrigin::Icann => ManagedBy::Icann,
            RuleOrigin::PrivateEntity => ManagedBy::PrivateEntity,
        }
    }
}

impl fmt::Display for ManagedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed PSL rule.
///
/// `labels` holds the literal pattern without the `*.` / `!` marker,
/// top-level label last.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub labels: Vec<String>,
    pub kind: RuleKind,
    pub origin: RuleOrigin,
}

impl Rule {
    pub fn new(labels: Vec<String>, kind: RuleKind, origin: RuleOrigin) -> Self {
        Self {
            labels,
            kind,
            origin,
        }
    }

    /// Rightmost label of the pattern
    pub fn top_label(&self) -> &str {
        self.labels.last().map(String::as_str).unwrap_or("")
    }

    /// Check if the rule applies to a domain split into labels (top-level last).
    /// Assumes the labels are already lowercased.
    pub fn matches(&self, labels: &[&str]) -> bool {
        let n = self.labels.len();
        if labels.len() < n {
            return false;
        }
        let tail_matches = labels[labels.len() - n..]
            .iter()
            .zip(&self.labels)
            .all(|(a, b)| *a == b.as_str());

        match self.kind {
            RuleKind::Plain | RuleKind::Exception => tail_matches,
            // The wildcard needs a label of its own in front of the pattern
            RuleKind::Wildcard => tail_matches && labels.len() > n,
        }
    }

    /// Number of trailing domain labels that form the public suffix when this
    /// rule prevails.
    pub fn suffix_len(&self) -> usize {
        let n = self.labels.len();
        match self.kind {
            RuleKind::Plain => n,
            RuleKind::Wildcard => n + 1,
            RuleKind::Exception => n.saturating_sub(1),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RuleKind::Plain => {}
            RuleKind::Wildcard => f.write_str("*.")?,
            RuleKind::Exception => f.write_str("!")?,
        }
        f.write_str(&self.labels.join("."))
    }
}

/// Result of classifying one domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Normalized domain (lowercase, no trailing dot)
    pub domain: String,
    /// Public suffix the domain falls under
    pub matched_suffix: String,
    pub origin: ManagedBy,
}
