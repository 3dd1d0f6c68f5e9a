pub mod dashboard;
pub mod deck;
pub mod lookup;
pub mod study;

use crate::srs;

pub(crate) fn mastery_bar(level: usize) -> String {
    let total = srs::last_level();
    let filled = level.min(total);
    format!("{}{}", "█".repeat(filled), "░".repeat(total - filled))
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
