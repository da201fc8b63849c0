//! Argument pattern compilation and extraction.
//!
//! A command declares the shape of its arguments with a tiny DSL:
//!
//! ```text
//! "{fname} {lname} {age?}"
//! ```
//!
//! Every `{name}` or `{name?}` placeholder becomes an optional word capture.
//! The `?` only documents intent; required and optional placeholders compile
//! to the same group, and an unmatched placeholder yields `""`. Text that is
//! not a placeholder is kept as regex, which is how a pattern can carry a
//! custom fragment such as `(\d+)`. Single spaces become `\s?`.
//!
//! The compiled regex is anchored at the command token and run against the
//! message text starting at the triggering entity, so two occurrences of the
//! same command in one message never see each other's arguments.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::command::CommandArgs;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_]\w*)\??\}").expect("placeholder regex is valid"));

/// Capture group substituted for each placeholder.
const PLACEHOLDER_GROUP: &str = r"([\w]+)?";

/// How the optional `@botname` suffix after the command token is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixMatching {
    /// `@` followed by a username ending in `bot` (any case).
    #[default]
    Strict,
    /// The historic `@\w+[bot]` fragment: any username whose last character
    /// is `b`, `o` or `t`.
    Legacy,
}

impl SuffixMatching {
    fn fragment(&self) -> &'static str {
        match self {
            Self::Strict => r"(?:@\w*bot)?",
            Self::Legacy => r"(?:@\w+[bot])?",
        }
    }
}

/// A compiled argument pattern for one command.
#[derive(Debug, Clone)]
pub struct CommandPattern {
    source: String,
    regex: Regex,
    placeholders: Vec<String>,
}

impl CommandPattern {
    /// Compiles `pattern` for a command reachable under `names`.
    ///
    /// `names` holds the command name followed by its aliases; the command
    /// token matches any of them.
    pub fn compile(
        names: &[&str],
        pattern: &str,
        suffix: SuffixMatching,
    ) -> Result<Self, regex::Error> {
        let placeholders = PLACEHOLDER
            .captures_iter(pattern)
            .map(|caps| caps[1].to_string())
            .collect();

        let token = match names {
            [single] => regex::escape(single),
            _ => {
                // Longest first, so "demo" is not cut short by an alias "d".
                let mut sorted = names.to_vec();
                sorted.sort_by_key(|n| std::cmp::Reverse(n.len()));
                let escaped: Vec<String> = sorted.iter().map(|n| regex::escape(n)).collect();
                format!("(?:{})", escaped.join("|"))
            }
        };

        let body = PLACEHOLDER.replace_all(pattern, PLACEHOLDER_GROUP);
        let expression = format!("/{token}{} {body}", suffix.fragment()).replace(' ', r"\s?");
        let regex = Regex::new(&format!("(?i)^{expression}"))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            placeholders,
        })
    }

    /// Returns the pattern as written by the command author.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the compiled regex.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the placeholder names in declaration order.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Extracts arguments from `text`, starting at `byte_offset`.
    ///
    /// - Captures are kept in declaration order, unmatched ones become `""`.
    /// - The list is padded or truncated to the placeholder count.
    /// - When the pattern has no placeholders, `parameters` blank positional
    ///   arguments are produced instead.
    pub fn extract(&self, text: &str, byte_offset: usize, parameters: usize) -> CommandArgs {
        let haystack = text.get(byte_offset..).unwrap_or_default();

        let mut values: Vec<String> = self
            .regex
            .captures(haystack)
            .map(|caps| {
                caps.iter()
                    .skip(1)
                    .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();

        if self.placeholders.is_empty() {
            return CommandArgs::unnamed(vec![String::new(); parameters]);
        }

        values.resize(self.placeholders.len(), String::new());
        CommandArgs::named(self.placeholders.clone(), values)
    }
}

impl std::fmt::Display for CommandPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> CommandPattern {
        CommandPattern::compile(&["demo"], pattern, SuffixMatching::Strict).unwrap()
    }

    #[test]
    fn test_placeholders_in_order() {
        let pattern = compile("{fname} {lname} {age?} {weight?}");
        assert_eq!(pattern.placeholders(), ["fname", "lname", "age", "weight"]);
    }

    #[test]
    fn test_generated_regex() {
        let pattern = compile("{fname} {lname?}");
        assert_eq!(
            pattern.regex().as_str(),
            r"(?i)^/demo(?:@\w*bot)?\s?([\w]+)?\s?([\w]+)?"
        );
    }

    #[test]
    fn test_legacy_suffix_fragment() {
        let pattern = CommandPattern::compile(&["demo"], "", SuffixMatching::Legacy).unwrap();
        assert_eq!(pattern.regex().as_str(), r"(?i)^/demo(?:@\w+[bot])?\s?");
    }

    #[test]
    fn test_extract_all_placeholders() {
        let pattern = compile("{fname} {lname} {age} {weight}");
        let args = pattern.extract("/demo@testing_Bot John Doe 77 200", 0, 0);

        assert_eq!(args.get("fname"), Some("John"));
        assert_eq!(args.get("lname"), Some("Doe"));
        assert_eq!(args.get("age"), Some("77"));
        assert_eq!(args.get("weight"), Some("200"));
    }

    #[test]
    fn test_unmatched_optional_placeholders_are_blank() {
        let pattern = compile("{fname} {lname} {age?} {weight?}");
        let args = pattern.extract("/demo John Doe", 0, 0);

        assert_eq!(args.len(), 4);
        assert_eq!(args.get("fname"), Some("John"));
        assert_eq!(args.get("lname"), Some("Doe"));
        assert_eq!(args.get("age"), Some(""));
        assert_eq!(args.get("weight"), Some(""));
    }

    #[test]
    fn test_no_match_pads_to_placeholder_count() {
        let pattern = compile("{a} {b}");
        let args = pattern.extract("/other thing", 0, 0);
        assert_eq!(args.positional(), ["", ""]);
    }

    #[test]
    fn test_empty_pattern_pads_to_parameter_count() {
        let pattern = compile("");
        let args = pattern.extract("/demo", 0, 3);
        assert_eq!(args.positional(), ["", "", ""]);
        assert_eq!(args.get("anything"), None);
    }

    #[test]
    fn test_custom_fragment_captures_are_truncated() {
        // One placeholder, but the custom fragment adds a second group.
        let pattern = compile(r"{id} (\d+)");
        let args = pattern.extract("/demo abc 42", 0, 0);
        assert_eq!(args.positional(), ["abc"]);
    }

    #[test]
    fn test_quantifiers_are_not_placeholders() {
        let pattern = compile(r"{code} (\d{2})");
        assert_eq!(pattern.placeholders(), ["code"]);
        let args = pattern.extract("/demo xyz 12", 0, 0);
        assert_eq!(args.get("code"), Some("xyz"));
    }

    #[test]
    fn test_extract_from_entity_offset() {
        let pattern = compile("{fname} {lname}");
        let text = "/demo john doe and /demo jane doe";

        let first = pattern.extract(text, 0, 0);
        let second = pattern.extract(text, 19, 0);

        assert_eq!(first.get("fname"), Some("john"));
        assert_eq!(first.get("lname"), Some("doe"));
        assert_eq!(second.get("fname"), Some("jane"));
        assert_eq!(second.get("lname"), Some("doe"));
    }

    #[test]
    fn test_alias_token_matches() {
        let pattern =
            CommandPattern::compile(&["d", "demo"], "{who}", SuffixMatching::Strict).unwrap();
        assert_eq!(pattern.extract("/d world", 0, 0).get("who"), Some("world"));
        assert_eq!(pattern.extract("/demo world", 0, 0).get("who"), Some("world"));
    }

    #[test]
    fn test_command_token_is_case_insensitive() {
        let pattern = compile("{who}");
        let args = pattern.extract("/DEMO world", 0, 0);
        assert_eq!(args.get("who"), Some("world"));
    }

    #[test]
    fn test_unicode_word_arguments() {
        let pattern = compile("{name}");
        let args = pattern.extract("/demo Jürgen", 0, 0);
        assert_eq!(args.get("name"), Some("Jürgen"));
    }

    #[test]
    fn test_invalid_custom_fragment() {
        assert!(CommandPattern::compile(&["demo"], "(unclosed", SuffixMatching::Strict).is_err());
    }
}
