use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("level source has no metadata header (first line must be `// {{...}}`)")]
    MissingHeader,
    #[error("invalid level metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(serde_json::Error),
    #[error("invalid editable range [{first}, {last}]")]
    InvalidRange { first: usize, last: usize },
    #[error("unknown object type '{0}'")]
    UnknownObject(String),
    #[error("level code failed to compile: {0}")]
    Compile(String),
    #[error("level code must define `fn start_level(map)`")]
    MissingEntryPoint,
    #[error("level code raised an error: {0}")]
    Runtime(String),
    #[error("level code rejected: {0}")]
    Validation(String),
    #[error("no level is loaded")]
    NoLevel,
}

pub type GameResult<T> = Result<T, GameError>;

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
