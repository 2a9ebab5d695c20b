pub type SwapmotionResult<T> = Result<T, SwapmotionError>;

#[derive(thiserror::Error, Debug)]
pub enum SwapmotionError {
    #[error("validation error: {0}")]
    Validation(String),

    /// A timeline referenced an object before it was spawned, or an anchor
    /// could not be resolved. Fatal: the render aborts, there is no partial
    /// output.
    #[error("choreography error: {0}")]
    Choreography(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SwapmotionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn choreography(msg: impl Into<String>) -> Self {
        Self::Choreography(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
