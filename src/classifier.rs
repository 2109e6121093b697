use std::sync::Arc;

use crate::error::{PslError, Result};
use crate::table::RuleTable;
use crate::types::{Classification, ManagedBy, Rule, RuleKind};

/// Classifies domains against a shared rule table.
///
/// Cloning is cheap; every clone reads the same table.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: Arc<RuleTable>,
}

impl Classifier {
    /// Create a classifier over an already built table
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self { table }
    }

    /// The underlying table
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Classify a domain: find its public suffix and who manages it.
    pub fn classify(&self, domain: &str) -> Result<Classification> {
        classify(&self.table, domain)
    }
}

impl From<RuleTable> for Classifier {
    fn from(table: RuleTable) -> Self {
        Self::new(Arc::new(table))
    }
}

/// Lowercase, strip a single trailing dot and validate label structure.
pub fn normalize_domain(domain: &str) -> Result<String> {
    let lower = domain.to_ascii_lowercase();
    let name = lower.strip_suffix('.').unwrap_or(&lower);

    if name.is_empty() {
        return Err(PslError::InvalidDomain("empty domain".to_string()));
    }
    if name.split('.').any(str::is_empty) {
        return Err(PslError::InvalidDomain(format!(
            "empty label in '{}'",
            domain
        )));
    }

    Ok(name.to_string())
}

/// Classify a domain against `table`.
///
/// An exception rule prevails over everything else; otherwise the rule
/// covering the most labels wins. With no matching rule the implicit `*`
/// rule applies: the top-level label alone, managed by nobody.
pub fn classify(table: &RuleTable, domain: &str) -> Result<Classification> {
    let name = normalize_domain(domain)?;
    let labels: Vec<&str> = name.split('.').collect();
    let top_label = labels[labels.len() - 1];

    let prevailing = prevailing_rule(table.rules_for_top_label(top_label), &labels);

    let (suffix_len, origin) = match prevailing {
        Some(rule) => (rule.suffix_len(), ManagedBy::from(rule.origin)),
        None => (1, ManagedBy::None),
    };
    let matched_suffix = labels[labels.len() - suffix_len.min(labels.len())..].join(".");

    Ok(Classification {
        domain: name.clone(),
        matched_suffix,
        origin,
    })
}

fn prevailing_rule<'a>(candidates: &'a [Rule], labels: &[&str]) -> Option<&'a Rule> {
    let mut exception: Option<&Rule> = None;
    let mut longest: Option<&Rule> = None;

    for rule in candidates.iter().filter(|r| r.matches(labels)) {
        match rule.kind {
            RuleKind::Exception => {
                if exception.map_or(true, |e| rule.labels.len() > e.labels.len()) {
                    exception = Some(rule);
                }
            }
            RuleKind::Plain | RuleKind::Wildcard => {
                let better = match longest {
                    None => true,
                    Some(current) => {
                        rule.suffix_len() > current.suffix_len()
                            || (rule.suffix_len() == current.suffix_len()
                                && rule.kind == RuleKind::Plain
                                && current.kind == RuleKind::Wildcard)
                    }
                };
                if better {
                    longest = Some(rule);
                }
            }
        }
    }

    exception.or(longest)
}
