//! Content-preservation guard for rule applications
//!
//! A rule may move whitespace, insert line breaks, or add bullet markers, but
//! the ordered sequence of alphanumeric characters must come out unchanged.

use super::buffer::Lines;
use log::warn;

fn is_content(ch: char) -> bool {
    ch.is_alphanumeric()
}

/// Whether `after` carries exactly the alphanumeric content of `before`
pub(crate) fn preserves_content(before: &str, after: &[String]) -> bool {
    before
        .chars()
        .filter(|&ch| is_content(ch))
        .eq(after
            .iter()
            .flat_map(|line| line.chars())
            .filter(|&ch| is_content(ch)))
}

/// Run a line rewrite and keep its result only if content is preserved
///
/// On rejection the input line passes through and the rule id is recorded in
/// `skipped`.
pub(crate) fn guarded<F>(
    rule_id: &str,
    line: &str,
    skipped: &mut Vec<String>,
    rewrite: F,
) -> Lines
where
    F: FnOnce(&str) -> Lines,
{
    let rewritten = rewrite(line);
    if preserves_content(line, &rewritten) {
        rewritten
    } else {
        reject(rule_id, skipped);
        let mut unchanged = Lines::new();
        unchanged.push(line.to_string());
        unchanged
    }
}

/// Single-text variant of [`guarded`] for rewrites that keep one string
pub(crate) fn guarded_text<F>(
    rule_id: &str,
    text: &str,
    skipped: &mut Vec<String>,
    rewrite: F,
) -> String
where
    F: FnOnce(&str) -> String,
{
    let rewritten = rewrite(text);
    if preserves_content(text, std::slice::from_ref(&rewritten)) {
        rewritten
    } else {
        reject(rule_id, skipped);
        text.to_string()
    }
}

fn reject(rule_id: &str, skipped: &mut Vec<String>) {
    warn!("rule '{rule_id}' would alter note content; line left unchanged");
    if !skipped.iter().any(|id| id == rule_id) {
        skipped.push(rule_id.to_string());
    }
}
