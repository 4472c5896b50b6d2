use std::collections::HashSet;

/// Rejects titles that carry no usable song information
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    blocked: HashSet<String>,
}

impl TitleFilter {
    pub fn new<I, S>(blocked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocked: blocked.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the title if it is non-blank and not blocked
    pub fn usable(&self, title: Option<String>) -> Option<String> {
        title.filter(|t| !t.trim().is_empty() && !self.blocked.contains(t))
    }
}
