use anyhow::Result;

/// Source of the currently playing title of a live stream
pub trait TitleSource {
    /// Fetch the current title.
    ///
    /// `Ok(None)` means no title is available right now (timeout, blank
    /// metadata); the next poll is the retry.
    fn read_title(&mut self) -> Result<Option<String>>;
}
