//! Tag and category name normalization.
//!
//! Display names such as `C#` or `.NET Core` are mapped to lookup-safe forms
//! (`csharp`, `dotnet-core`) through an ordered substitution table. Names that
//! cannot be represented in ASCII fall back to a short content hash so every
//! tag still gets a stable, URL-safe identifier.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Punctuation accepted in tag display names besides letters, digits and spaces.
const NAME_PUNCTUATION: &[char] = &['.', '#', '+', '-', '(', ')'];

/// Number of digest bytes kept for the hash fallback (16 hex chars).
const HASH_PREFIX_BYTES: usize = 8;

const MAX_ROUTE_NAME_LEN: usize = 64;

/// A single `(source, target)` substitution applied during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNormalizationRule {
    pub source: String,
    pub target: String,
}

impl TagNormalizationRule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Built-in table used when the settings file does not provide one.
pub fn default_rules() -> Vec<TagNormalizationRule> {
    vec![
        TagNormalizationRule::new(".", "dot"),
        TagNormalizationRule::new("#", "sharp"),
        TagNormalizationRule::new(" ", "-"),
    ]
}

/// Normalizes a display name using the substitution table.
///
/// # Algorithm
///
/// 1. Apply each rule in table order with plain (non-regex) replacement
/// 2. If anything non-ASCII or non-printable remains, return a 16-char hex
///    prefix of the SHA-256 digest of the *original* input
/// 3. Otherwise lower-case the result
///
/// # Examples
///
/// ```ignore
/// let rules = vec![
///     TagNormalizationRule::new("#", "sharp"),
///     TagNormalizationRule::new(" ", "-"),
/// ];
/// assert_eq!(normalize_name("C#", &rules), "csharp");
/// ```
pub fn normalize_name(input: &str, rules: &[TagNormalizationRule]) -> String {
    let substituted = rules
        .iter()
        .filter(|rule| !rule.source.is_empty())
        .fold(input.to_string(), |acc, rule| {
            acc.replace(&rule.source, &rule.target)
        });

    // Checked before lower-casing: some non-ASCII letters lower-case to ASCII.
    if substituted.chars().all(is_printable_ascii) {
        substituted.to_ascii_lowercase()
    } else {
        hash_name(input)
    }
}

/// Returns `true` when the candidate is acceptable as a tag display name.
///
/// Letters and digits of any script are accepted so that non-Latin names can
/// reach the hash fallback of [`normalize_name`].
pub fn validate_name(candidate: &str) -> bool {
    if candidate.trim().is_empty() {
        return false;
    }

    candidate
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || NAME_PUNCTUATION.contains(&c))
}

/// Validates a category route name (`[a-z0-9-]`, 1-64 chars, no edge hyphens).
pub fn validate_route_name(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > MAX_ROUTE_NAME_LEN {
        return false;
    }

    if candidate.starts_with('-') || candidate.ends_with('-') {
        return false;
    }

    candidate
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn is_printable_ascii(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_control()
}

fn hash_name(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..HASH_PREFIX_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csharp_rules() -> Vec<TagNormalizationRule> {
        vec![
            TagNormalizationRule::new("#", "sharp"),
            TagNormalizationRule::new(" ", "-"),
        ]
    }

    #[test]
    fn test_normalize_csharp() {
        assert_eq!(normalize_name("C#", &csharp_rules()), "csharp");
    }

    #[test]
    fn test_normalize_applies_rules_in_table_order() {
        let rules = vec![
            TagNormalizationRule::new(".", " dot"),
            TagNormalizationRule::new(" ", "-"),
        ];

        // The space introduced by the first rule is rewritten by the second.
        assert_eq!(normalize_name(".NET Core", &rules), "-dotnet-core");

        let reversed: Vec<_> = rules.into_iter().rev().collect();
        assert_eq!(normalize_name(".NET Core", &reversed), " dotnet-core");
    }

    #[test]
    fn test_normalize_default_rules() {
        let rules = default_rules();
        assert_eq!(normalize_name(".NET Core", &rules), "dotnet-core");
        assert_eq!(normalize_name("F#", &rules), "fsharp");
        assert_eq!(normalize_name("C++", &rules), "c++");
    }

    #[test]
    fn test_normalize_without_rules_only_lowercases() {
        assert_eq!(normalize_name("Rust", &[]), "rust");
    }

    #[test]
    fn test_normalize_skips_empty_source_rule() {
        let rules = vec![TagNormalizationRule::new("", "x")];
        assert_eq!(normalize_name("Go", &rules), "go");
    }

    #[test]
    fn test_normalize_non_latin_falls_back_to_hash() {
        let result = normalize_name("基础教程", &default_rules());

        assert_eq!(result.len(), HASH_PREFIX_BYTES * 2);
        assert!(result.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(result, result.to_lowercase());
    }

    #[test]
    fn test_normalize_hash_is_deterministic_and_distinct() {
        let rules = default_rules();
        let first = normalize_name("基础教程", &rules);
        let second = normalize_name("基础教程", &rules);
        let other = normalize_name("深入理解", &rules);

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn test_normalize_mixed_script_uses_hash() {
        let result = normalize_name("Rust 教程", &default_rules());
        assert_eq!(result.len(), 16);
        assert!(!result.contains("rust"));
    }

    #[test]
    fn test_normalize_letter_lowercasing_to_ascii_uses_hash() {
        // KELVIN SIGN lower-cases to a plain `k`.
        let result = normalize_name("\u{212A}", &[]);
        assert_eq!(result, hash_name("\u{212A}"));
        assert_ne!(result, "k");
    }

    #[test]
    fn test_normalize_control_character_uses_hash() {
        let result = normalize_name("tab\there", &[]);
        assert_eq!(result.len(), 16);
    }

    #[test]
    fn test_normalize_output_is_always_ascii_lowercase() {
        let rules = default_rules();
        for input in ["ASP.NET MVC", "C#", "Ünïcödé", "Web API (v2)", "日本語"] {
            let result = normalize_name(input, &rules);
            assert!(result.is_ascii(), "{input} -> {result}");
            assert_eq!(result, result.to_lowercase(), "{input} -> {result}");
        }
    }

    #[test]
    fn test_validate_name_accepts_whitelist() {
        assert!(validate_name("C++"));
        assert!(validate_name("C#"));
        assert!(validate_name(".NET Core"));
        assert!(validate_name("Web API (v2)"));
        assert!(validate_name("ASP.NET-MVC"));
        assert!(validate_name("基础教程"));
    }

    #[test]
    fn test_validate_name_rejects_generic_syntax() {
        assert!(!validate_name("Cup<T>"));
        assert!(!validate_name("List<int>"));
    }

    #[test]
    fn test_validate_name_rejects_paths() {
        assert!(!validate_name("usr/bin"));
        assert!(!validate_name("C:\\Windows"));
    }

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(!validate_name(""));
        assert!(!validate_name("   "));
    }

    #[test]
    fn test_validate_name_rejects_other_punctuation() {
        assert!(!validate_name("rock&roll"));
        assert!(!validate_name("what?"));
        assert!(!validate_name("a,b"));
    }

    #[test]
    fn test_validate_route_name() {
        assert!(validate_route_name("dotnet"));
        assert!(validate_route_name("web-dev-2024"));

        assert!(!validate_route_name(""));
        assert!(!validate_route_name("Uppercase"));
        assert!(!validate_route_name("-edge"));
        assert!(!validate_route_name("edge-"));
        assert!(!validate_route_name("with space"));
        assert!(!validate_route_name(&"a".repeat(65)));
    }
}
