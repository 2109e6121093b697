//! Public Suffix Engine - Public Suffix List classification for Rust
//!
//! This library answers one question about a domain name: which public
//! suffix does it fall under, and who manages that suffix?
//! - Plain, wildcard (`*.`) and exception (`!`) PSL rules
//! - Longest-match lookup narrowed by top-level label
//! - ICANN vs private origin taken from the list's section markers
//! - JSON request boundary for a `/publicsuffix` endpoint
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use public_suffix_engine::{Classifier, ManagedBy, RuleTable};
//!
//! let list = "
//! // ===BEGIN ICANN DOMAINS===
//! uk
//! co.uk
//! *.ck
//! !www.ck
//! // ===END ICANN DOMAINS===
//! // ===BEGIN PRIVATE DOMAINS===
//! github.io
//! // ===END PRIVATE DOMAINS===
//! ";
//!
//! // Build the table once, then share it
//! let table = Arc::new(RuleTable::load(list).unwrap());
//! let classifier = Classifier::new(table);
//!
//! let result = classifier.classify("www.example.co.uk").unwrap();
//! assert_eq!(result.matched_suffix, "co.uk");
//! assert_eq!(result.origin, ManagedBy::Icann);
//!
//! let result = classifier.classify("octocat.github.io").unwrap();
//! assert_eq!(result.origin, ManagedBy::PrivateEntity);
//!
//! // Unlisted TLDs fall back to the implicit "*" rule
//! let result = classifier.classify("example.zz").unwrap();
//! assert_eq!(result.matched_suffix, "zz");
//! assert_eq!(result.origin, ManagedBy::None);
//! ```
//!
//! # Rule Syntax
//!
//! | Rule | Example | Public suffix of `a.b.example` |
//! |------|---------|--------------------------------|
//! | Plain | `example` | `example` |
//! | Wildcard | `*.example` | `b.example` |
//! | Exception | `!b.example` | `example` |
//!
//! Rules must appear between `// ===BEGIN ICANN DOMAINS===` /
//! `// ===END ICANN DOMAINS===` or the matching PRIVATE markers.

pub mod classifier;
pub mod config;
pub mod error;
pub mod parser;
pub mod service;
pub mod table;
pub mod types;

// Re-export commonly used items
pub use classifier::{classify, normalize_domain, Classifier};
pub use config::{ServiceConfig, DEFAULT_PORT};
pub use error::{PslError, Result};
pub use parser::{parse_rules, parse_rules_from_file};
pub use service::{
    handle_domain, handle_query, ErrorResponse, PublicSuffixResponse, ResponseBody,
    ServiceResponse,
};
pub use table::{RuleTable, TableOptions, BUILTIN_LIST};
pub use types::{Classification, ManagedBy, Rule, RuleKind, RuleOrigin};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_full_workflow() {
        let config = ServiceConfig::default();
        let table = Arc::new(config.load_table().unwrap());
        let classifier = Classifier::new(table);

        // ICANN multi-label suffix
        let result = classifier.classify("www.bbc.co.uk").unwrap();
        assert_eq!(result.matched_suffix, "co.uk");
        assert_eq!(result.origin, ManagedBy::Icann);

        // Private suffix stacked on an ICANN one
        let result = classifier.classify("myblog.blogspot.com").unwrap();
        assert_eq!(result.matched_suffix, "blogspot.com");
        assert_eq!(result.origin, ManagedBy::PrivateEntity);

        // Exception carved out of a wildcard
        let result = classifier.classify("www.city.kawasaki.jp").unwrap();
        assert_eq!(result.matched_suffix, "kawasaki.jp");
        assert_eq!(result.origin, ManagedBy::Icann);

        // Request boundary
        let response = handle_query(&classifier, "domain=octocat.github.io");
        assert_eq!(response.status, 200);
        assert_eq!(
            response.to_json().unwrap(),
            r#"{"domain":"octocat.github.io","publicSuffix":"github.io","isManagedBy":"PRIVATE_ENTITY"}"#
        );

        let response = handle_query(&classifier, "");
        assert_eq!(response.status, 400);
    }
}
