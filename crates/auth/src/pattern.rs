//! Regular-expression synthesis for claim patterns.
//!
//! Patterns are consumed by a JVM-based UI, so literal text is quoted with the
//! `\Q...\E` convention rather than by escaping individual metacharacters.

use kafkagate_core::PatternKind;

/// Matches nothing a real resource is named. Stands in for "no access",
/// since consumers read an empty pattern list as "everything".
pub const DENY_ALL: &str = "^none$";

/// Matches every resource (or every cluster).
pub const ALLOW_ALL: &str = "^.*$";

const QUOTE_START: &str = "\\Q";
const QUOTE_END: &str = "\\E";
const LITERAL_SUFFIX: &str = "\\E$";
const SCHEMA_SUBJECT_SUFFIX: &str = "-(key|value)$";

pub fn deny_all() -> Vec<String> {
    vec![DENY_ALL.to_string()]
}

pub fn allow_all() -> Vec<String> {
    vec![ALLOW_ALL.to_string()]
}

/// Quote `text` so it matches literally.
///
/// An embedded `\E` would close the quoted block early; it is emitted as
/// `\E\\E\Q` (close, escaped backslash, literal `E`, reopen).
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    out.push_str(QUOTE_START);

    let mut rest = text;
    while let Some(idx) = rest.find(QUOTE_END) {
        out.push_str(&rest[..idx]);
        out.push_str("\\E\\\\E\\Q");
        rest = &rest[idx + QUOTE_END.len()..];
    }

    out.push_str(rest);
    out.push_str(QUOTE_END);
    out
}

/// Anchored pattern for a resource string: `^<quoted>$` or `^<quoted>.*$`.
pub fn literal_or_prefix_regex(resource: &str, kind: PatternKind) -> String {
    let quoted = quote(resource);
    match kind {
        PatternKind::Literal => format!("^{quoted}$"),
        PatternKind::Prefixed => format!("^{quoted}.*$"),
    }
}

/// Anchored pattern for a cluster name. Cluster names are used verbatim.
pub fn cluster_regex(cluster: &str) -> String {
    format!("^{cluster}$")
}

/// Whether `pattern` was synthesized from a LITERAL resource.
pub fn is_exact_pattern(pattern: &str) -> bool {
    pattern.starts_with("^\\Q") && pattern.ends_with(LITERAL_SUFFIX)
}

/// Schema-subject pattern for a topic pattern.
///
/// Subjects of a topic are named `<topic>-key` / `<topic>-value`, so exact
/// topic patterns get the suffix disjunction before the closing anchor.
/// Open (prefixed) patterns already cover both subjects.
pub fn schema_subject_pattern(topic_pattern: &str) -> String {
    if is_exact_pattern(topic_pattern) {
        let body = &topic_pattern[..topic_pattern.len() - 1];
        format!("{body}{SCHEMA_SUBJECT_SUFFIX}")
    } else {
        topic_pattern.to_string()
    }
}
