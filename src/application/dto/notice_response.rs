/// NoticeResponse - Internal response DTO from the notice generation use case
#[derive(Debug, Clone)]
pub struct NoticeResponse {
    /// The rendered notice, CRLF line endings
    pub content: String,
    /// Relative paths of the build units in scope
    pub included_units: Vec<String>,
    /// Number of distinct components resolved
    pub resolved_components: usize,
    /// Number of components written to the notice
    pub reported_components: usize,
}
