use crate::shared::Result;

/// OutputPresenter port for presenting the finished notice
pub trait OutputPresenter {
    /// Presents the notice content
    ///
    /// # Errors
    /// Returns an error if writing to the output destination fails
    fn present(&self, content: &str) -> Result<()>;
}
