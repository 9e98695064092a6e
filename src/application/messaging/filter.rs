//! Content filter - Redacts block-listed terms from outbound messages

use regex_lite::{Captures, Regex};

use crate::domain::entities::{MessageChain, Segment};

/// Occurrences tolerated before a whole reply is suppressed
pub const MAX_REDACTIONS: usize = 5;

/// Redacts block-listed terms in the text segments of outbound messages.
///
/// Block-list entries are patterns; an entry that does not compile is
/// matched as literal text instead.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    patterns: Vec<Regex>,
}

impl ContentFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = words.into_iter().filter_map(|w| compile(w.as_ref())).collect();
        Self { patterns }
    }

    pub fn is_enabled(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Replace each blocked occurrence with a single space.
    ///
    /// Occurrences are counted across the whole message; once the count
    /// exceeds [`MAX_REDACTIONS`] the message is suppressed entirely.
    pub fn filter(&self, message: MessageChain) -> MessageChain {
        if !self.is_enabled() {
            return message;
        }

        let mut count = 0;
        let mut filtered = Vec::with_capacity(message.len());

        for segment in message.into_segments() {
            let Segment::Text(mut text) = segment else {
                filtered.push(segment);
                continue;
            };

            for pattern in &self.patterns {
                let hits = pattern
                    .find_iter(&text)
                    .filter(|m| !m.as_str().is_empty())
                    .count();
                if hits > 0 {
                    count += hits;
                    text = pattern
                        .replace_all(&text, |caps: &Captures<'_>| {
                            if caps[0].is_empty() { "" } else { " " }
                        })
                        .into_owned();
                }

                if count > MAX_REDACTIONS {
                    tracing::debug!("[filter] suppressed reply with {}+ blocked terms", count);
                    return MessageChain::empty();
                }
            }
            filtered.push(Segment::Text(text));
        }

        MessageChain::from_segments(filtered)
    }
}

fn compile(word: &str) -> Option<Regex> {
    if word.is_empty() {
        return None;
    }
    match Regex::new(word) {
        Ok(pattern) if pattern.is_match("") => {
            tracing::warn!("[filter] '{}' matches empty text, matching literally", word);
        }
        Ok(pattern) => return Some(pattern),
        Err(e) => {
            tracing::warn!("[filter] '{}' is not a valid pattern ({}), matching literally", word, e);
        }
    }
    Regex::new(&regex_lite::escape(word)).ok()
}
