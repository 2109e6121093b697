use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{PslError, Result};
use crate::types::{Rule, RuleKind, RuleOrigin};

/// Regex pattern for parsing PSL rules
/// Format: [!|*.]label(.label)*
static RULE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(!|\*\.)?([^\s!*]+)$").expect("RULE_PATTERN: hardcoded regex is invalid")
});

const BEGIN_ICANN: &str = "===BEGIN ICANN DOMAINS===";
const END_ICANN: &str = "===END ICANN DOMAINS===";
const BEGIN_PRIVATE: &str = "===BEGIN PRIVATE DOMAINS===";
const END_PRIVATE: &str = "===END PRIVATE DOMAINS===";

/// Section marker found in a comment line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Begin(RuleOrigin),
    End(RuleOrigin),
}

fn section_marker(comment: &str) -> Option<Marker> {
    if comment.contains(BEGIN_ICANN) {
        Some(Marker::Begin(RuleOrigin::Icann))
    } else if comment.contains(END_ICANN) {
        Some(Marker::End(RuleOrigin::Icann))
    } else if comment.contains(BEGIN_PRIVATE) {
        Some(Marker::Begin(RuleOrigin::PrivateEntity))
    } else if comment.contains(END_PRIVATE) {
        Some(Marker::End(RuleOrigin::PrivateEntity))
    } else {
        None
    }
}

/// Parse PSL rules from text.
///
/// Every rule must sit between a `BEGIN` and `END` section marker; the
/// section decides the rule's origin.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();
    let mut section: Option<RuleOrigin> = None;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix("//") {
            match section_marker(comment) {
                Some(Marker::Begin(origin)) => {
                    if let Some(open) = section {
                        return Err(PslError::MalformedRule {
                            line: line_num,
                            message: format!(
                                "{} section begins inside open {} section",
                                section_name(origin),
                                section_name(open)
                            ),
                        });
                    }
                    section = Some(origin);
                }
                Some(Marker::End(origin)) => {
                    if section != Some(origin) {
                        return Err(PslError::MalformedRule {
                            line: line_num,
                            message: format!(
                                "END of {} section without matching BEGIN",
                                section_name(origin)
                            ),
                        });
                    }
                    section = None;
                }
                None => {}
            }
            continue;
        }

        // Only the first whitespace-delimited token is the rule
        let token = line.split_whitespace().next().unwrap_or(line);

        let origin = section.ok_or_else(|| PslError::MalformedRule {
            line: line_num,
            message: format!("rule '{}' outside of any section", token),
        })?;

        rules.push(parse_single_rule(token, origin, line_num)?);
    }

    if let Some(open) = section {
        log::warn!(
            "public suffix list ends inside the {} section",
            section_name(open)
        );
    }

    Ok(rules)
}

/// Parse PSL rules from a file.
pub fn parse_rules_from_file(path: impl AsRef<Path>) -> Result<Vec<Rule>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    parse_rules(&text)
}

/// Parse a single rule token
fn parse_single_rule(token: &str, origin: RuleOrigin, line_num: usize) -> Result<Rule> {
    let captures = RULE_PATTERN
        .captures(token)
        .ok_or_else(|| PslError::MalformedRule {
            line: line_num,
            message: format!("Invalid rule format: {}", token),
        })?;

    let kind = match captures.get(1).map(|m| m.as_str()) {
        Some("!") => RuleKind::Exception,
        Some(_) => RuleKind::Wildcard,
        None => RuleKind::Plain,
    };
    let pattern = captures.get(2).map_or("", |m| m.as_str());

    let labels: Vec<String> = pattern
        .split('.')
        .map(|label| label.to_ascii_lowercase())
        .collect();
    if labels.iter().any(String::is_empty) {
        return Err(PslError::MalformedRule {
            line: line_num,
            message: format!("empty label in '{}'", token),
        });
    }
    if kind == RuleKind::Exception && labels.len() < 2 {
        return Err(PslError::MalformedRule {
            line: line_num,
            message: format!("exception '{}' leaves no public suffix", token),
        });
    }

    Ok(Rule::new(labels, kind, origin))
}

fn section_name(origin: RuleOrigin) -> &'static str {
    match origin {
        RuleOrigin::Icann => "ICANN",
        RuleOrigin::PrivateEntity => "PRIVATE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icann(body: &str) -> String {
        format!(
            "// ===BEGIN ICANN DOMAINS===\n{}\n// ===END ICANN DOMAINS===\n",
            body
        )
    }

    #[test]
    fn test_rule_pattern_regex_compiles() {
        assert!(RULE_PATTERN.is_match("co.uk"));
    }

    #[test]
    fn test_parse_rule_kinds() {
        let rules = parse_rules(&icann("co.uk\n*.ck\n!www.ck")).unwrap();
        assert_eq!(rules.len(), 3);

        assert_eq!(rules[0].kind, RuleKind::Plain);
        assert_eq!(rules[0].labels, vec!["co", "uk"]);

        assert_eq!(rules[1].kind, RuleKind::Wildcard);
        assert_eq!(rules[1].labels, vec!["ck"]);

        assert_eq!(rules[2].kind, RuleKind::Exception);
        assert_eq!(rules[2].labels, vec!["www", "ck"]);
    }

    #[test]
    fn test_parse_sections_stamp_origin() {
        let text = r#"
// Header comment
// ===BEGIN ICANN DOMAINS===
com
// ===END ICANN DOMAINS===

// ===BEGIN PRIVATE DOMAINS===
// Some Company : https://example.net
github.io
// ===END PRIVATE DOMAINS===
"#;
        let rules = parse_rules(text).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].origin, RuleOrigin::Icann);
        assert_eq!(rules[1].origin, RuleOrigin::PrivateEntity);
    }

    #[test]
    fn test_parse_lowercases_labels() {
        let rules = parse_rules(&icann("Co.UK")).unwrap();
        assert_eq!(rules[0].labels, vec!["co", "uk"]);
    }

    #[test]
    fn test_parse_ignores_text_after_whitespace() {
        let rules = parse_rules(&icann("co.uk   trailing notes")).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].labels, vec!["co", "uk"]);
    }

    #[test]
    fn test_parse_keeps_unicode_labels() {
        let rules = parse_rules(&icann("公司.cn")).unwrap();
        assert_eq!(rules[0].labels, vec!["公司", "cn"]);
    }

    #[test]
    fn test_parse_rejects_empty_label() {
        let text = icann("a..b");
        match parse_rules(&text) {
            Err(PslError::MalformedRule { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected MalformedRule, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_misplaced_markers() {
        assert!(parse_rules(&icann("foo.*.com")).is_err());
        assert!(parse_rules(&icann("*")).is_err());
        assert!(parse_rules(&icann("!")).is_err());
        assert!(parse_rules(&icann("!*.ck")).is_err());
        assert!(parse_rules(&icann("*.*.ck")).is_err());
        assert!(parse_rules(&icann(".com")).is_err());
        assert!(parse_rules(&icann("com.")).is_err());
    }

    #[test]
    fn test_parse_rejects_single_label_exception() {
        assert!(parse_rules(&icann("!ck")).is_err());
    }

    #[test]
    fn test_parse_rejects_rule_outside_section() {
        let result = parse_rules("com\n");
        match result {
            Err(PslError::MalformedRule { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("outside"), "got: {}", message);
            }
            other => panic!("expected MalformedRule, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_nested_sections() {
        let text = "// ===BEGIN ICANN DOMAINS===\n// ===BEGIN PRIVATE DOMAINS===\n";
        assert!(parse_rules(text).is_err());
    }

    #[test]
    fn test_parse_rejects_mismatched_end() {
        let text = "// ===BEGIN ICANN DOMAINS===\ncom\n// ===END PRIVATE DOMAINS===\n";
        assert!(parse_rules(text).is_err());
    }

    #[test]
    fn test_parse_accepts_unterminated_section() {
        let rules = parse_rules("// ===BEGIN ICANN DOMAINS===\ncom\n").unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_parse_file_not_found() {
        let result = parse_rules_from_file("/nonexistent/path/public_suffix_list.dat");
        assert!(matches!(result, Err(PslError::IoError(_))));
    }

    #[test]
    fn test_parse_file() {
        use std::io::Write;
        let dir = std::env::temp_dir()
            .join(format!("public_suffix_engine_parser_test_{}", std::process::id()));
        let _ = fs::create_dir_all(&dir);
        let file_path = dir.join("list.dat");
        let mut f = fs::File::create(&file_path).unwrap();
        write!(f, "{}", icann("uk\nco.uk")).unwrap();
        drop(f);

        let rules = parse_rules_from_file(&file_path).unwrap();
        assert_eq!(rules.len(), 2);

        let _ = fs::remove_file(&file_path);
        let _ = fs::remove_dir(&dir);
    }
}
