/// Errors from the co-reference tracker.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("pronoun '{0}' is not in the closed co-reference vocabulary")]
    UnknownPronoun(String),
}
