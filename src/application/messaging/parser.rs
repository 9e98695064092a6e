//! Command parser - Prefix handling and token extraction for raw message text

/// Parses raw message text against the configured command prefixes
#[derive(Debug, Clone)]
pub struct CommandParser {
    prefixes: Vec<String>,
}

impl CommandParser {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Whether the text starts with any configured prefix
    pub fn is_command_prefix(&self, text: &str) -> bool {
        !text.is_empty() && self.prefixes.iter().any(|p| text.starts_with(p.as_str()))
    }

    /// Strip every prefix occurrence, then take the first whitespace-delimited word.
    ///
    /// Runs whether or not the text is actually prefixed.
    pub fn command_name(&self, text: &str) -> String {
        let mut stripped = text.to_string();
        for prefix in &self.prefixes {
            stripped = stripped.replace(prefix.as_str(), "");
        }
        stripped.split_whitespace().next().unwrap_or("").to_string()
    }

    /// Every whitespace-delimited word after the first
    pub fn arguments(&self, text: &str) -> Vec<String> {
        text.split_whitespace().skip(1).map(str::to_string).collect()
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(["/"])
    }
}
