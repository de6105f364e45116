//! Small shared helpers.

pub mod config;

use uuid::Uuid;

/// Build a stable identifier for an ingested file: a random UUID joined
/// to the sanitized file name with `__`, so the original name stays
/// readable in logs and listings.
pub fn generate_file_id(file_name: &str) -> String {
    let sanitized: String = file_name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    format!("{}__{}", Uuid::new_v4(), sanitized)
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
