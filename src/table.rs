//! Suffix rule table.
//!
//! Rules are grouped by their top-level label so a lookup only compares
//! against the handful of rules that share the domain's TLD.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::parser::{parse_rules, parse_rules_from_file};
use crate::types::{Rule, RuleOrigin};

/// Public Suffix List snapshot bundled with the crate
pub const BUILTIN_LIST: &str = include_str!("../data/public_suffix_list.dat");

/// Table loading options.
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Keep rules from the PRIVATE section (disable for an ICANN-only view)
    pub include_private_domains: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            include_private_domains: true,
        }
    }
}

impl TableOptions {
    /// Create new table options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep or drop PRIVATE section rules.
    pub fn with_private_domains(mut self, include: bool) -> Self {
        self.include_private_domains = include;
        self
    }
}

/// Immutable PSL rule table, keyed by top-level label.
///
/// Built once before serving; all methods take `&self`, so an
/// `Arc<RuleTable>` can be read from any number of threads.
#[derive(Debug, Default)]
pub struct RuleTable {
    by_top_label: HashMap<String, Vec<Rule>>,
    rule_count: usize,
}

impl RuleTable {
    /// Build a table from PSL text.
    pub fn load(text: &str) -> Result<Self> {
        Self::load_with_options(text, &TableOptions::default())
    }

    /// Build a table from PSL text with explicit options.
    pub fn load_with_options(text: &str, options: &TableOptions) -> Result<Self> {
        let rules = parse_rules(text)?;
        Ok(Self::from_rules(rules, options))
    }

    /// Build a table from a PSL file on disk.
    pub fn from_file(path: impl AsRef<Path>, options: &TableOptions) -> Result<Self> {
        let path = path.as_ref();
        let rules = parse_rules_from_file(path)?;
        log::debug!("parsed {} rules from {}", rules.len(), path.display());
        Ok(Self::from_rules(rules, options))
    }

    /// Build a table from the bundled PSL snapshot.
    pub fn builtin() -> Result<Self> {
        Self::builtin_with_options(&TableOptions::default())
    }

    /// Build a table from the bundled PSL snapshot with explicit options.
    pub fn builtin_with_options(options: &TableOptions) -> Result<Self> {
        Self::load_with_options(BUILTIN_LIST, options)
    }

    /// Build a table from already parsed rules.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>, options: &TableOptions) -> Self {
        let mut table = Self::default();
        let mut skipped_private = 0usize;

        for rule in rules {
            if rule.origin == RuleOrigin::PrivateEntity && !options.include_private_domains {
                skipped_private += 1;
                continue;
            }
            table.insert(rule);
        }

        log::info!(
            "loaded {} public suffix rules ({} ICANN, {} private) under {} top-level labels",
            table.rule_count,
            table.count_by_origin(RuleOrigin::Icann),
            table.count_by_origin(RuleOrigin::PrivateEntity),
            table.by_top_label.len()
        );
        if skipped_private > 0 {
            log::info!("skipped {} private rules", skipped_private);
        }

        table
    }

    fn insert(&mut self, rule: Rule) {
        let bucket = self
            .by_top_label
            .entry(rule.top_label().to_string())
            .or_default();

        // Same pattern and kind twice: first occurrence wins
        if let Some(existing) = bucket
            .iter()
            .find(|r| r.kind == rule.kind && r.labels == rule.labels)
        {
            log::warn!(
                "duplicate public suffix rule '{}' ignored (kept {:?} entry)",
                rule,
                existing.origin
            );
            return;
        }

        bucket.push(rule);
        self.rule_count += 1;
    }

    /// Rules whose rightmost label is `label`. Empty for unknown labels.
    pub fn rules_for_top_label(&self, label: &str) -> &[Rule] {
        self.by_top_label
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Get the number of rules
    pub fn len(&self) -> usize {
        self.rule_count
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count == 0
    }

    /// Number of distinct top-level labels
    pub fn top_label_count(&self) -> usize {
        self.by_top_label.len()
    }

    /// Number of rules read from the given section
    pub fn count_by_origin(&self, origin: RuleOrigin) -> usize {
        self.by_top_label
            .values()
            .flatten()
            .filter(|r| r.origin == origin)
            .count()
    }
}
