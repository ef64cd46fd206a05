use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown parameter `{0}`")]
    UnknownParam(String),
    #[error("parameter `{key}` cannot take non-finite value {value}")]
    NonFiniteValue { key: &'static str, value: f32 },
    #[error("invalid parameter document: {0}")]
    Config(#[from] serde_json::Error),
}
