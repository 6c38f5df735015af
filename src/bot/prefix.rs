//! Command prefix resolution.
//!
//! A guild's prefix comes from its `prefix` setting, falling back to `default_prefix` from
//! the configuration. Direct messages always use the default. The resolved prefix is
//! expanded into every form a user might type:
//!
//! - `'` and `‘` are treated as the same prefix, since some mobile keyboards swap them
//! - a title-cased copy, so `bot ` also matches `Bot `
//! - prefixes made of letters and digits also match with a trailing space
//!
//! Mentioning the bot always works; the command framework handles mentions itself.

/// Prefixes accepted for one message, longest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixes(Vec<String>);

impl Prefixes {
    /// Expands a guild or default prefix.
    pub fn new(prefix: &str) -> Self {
        let mut prefixes = expand_prefix(prefix);

        prefixes.retain(|p| !p.is_empty());
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        prefixes.dedup();

        Self(prefixes)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Splits a message into the prefix it starts with and the rest of its content.
    ///
    /// # Returns
    /// - `Some((prefix, rest))` - Longest matching prefix and the text after it
    /// - `None` - Message doesn't start with any accepted prefix
    pub fn strip_prefix<'c>(&self, content: &'c str) -> Option<(&'c str, &'c str)> {
        self.0.iter().find_map(|prefix| {
            content
                .strip_prefix(prefix.as_str())
                .map(|rest| (&content[..prefix.len()], rest))
        })
    }
}

/// Expands a prefix into its accepted spellings, without mentions.
pub fn expand_prefix(prefix: &str) -> Vec<String> {
    let mut prefixes: Vec<String> = if prefix == "'" || prefix == "‘" {
        vec!["'".to_string(), "‘".to_string()]
    } else {
        vec![prefix.to_string()]
    };

    let titled: Vec<String> = prefixes.iter().map(|p| title_case(p)).collect();
    prefixes.extend(titled);

    let spaced: Vec<String> = prefixes
        .iter()
        .filter(|p| !p.trim().is_empty() && !p.chars().any(|c| c.is_ascii_punctuation()))
        .map(|p| format!("{} ", p.trim()))
        .collect();
    prefixes.extend(spaced);

    prefixes
}

/// Upper-cases the first letter of each word and lower-cases the rest.
fn title_case(value: &str) -> String {
    let mut titled = String::with_capacity(value.len());
    let mut at_word_start = true;

    for c in value.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                titled.extend(c.to_uppercase());
            } else {
                titled.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            titled.push(c);
            at_word_start = true;
        }
    }

    titled
}
