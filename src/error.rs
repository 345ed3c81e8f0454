//! Error types shared by the battle core and the web frontend.

#[derive(thiserror::Error, Debug)]
pub enum BattleError {
    /// A phase was entered with arguments it cannot accept.
    #[error("invalid transition {from} -> {to}: {reason}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
        reason: String,
    },
    #[error("transition chain exceeded {0} steps in a single frame")]
    TransitionLoop(usize),
    #[error(transparent)]
    Script(#[from] crate::battle::dialog::ScriptError),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
