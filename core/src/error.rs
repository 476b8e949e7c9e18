use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssessError {
    #[error("Risk factor '{id}' not found")]
    UnknownFactor { id: String },

    #[error("Risk factor '{id}' is built in and cannot be deleted")]
    BuiltInFactor { id: String },

    #[error("Edit mode is required to {action}")]
    EditModeRequired { action: &'static str },

    #[error("Please fill in all required fields")]
    MissingRequiredFields,

    #[error("Risk factor '{factor}' must have at least one option")]
    NoOptions { factor: String },

    #[error("Option value '{value}' appears more than once in '{factor}'")]
    DuplicateOptionValue { factor: String, value: String },

    #[error("Option index {index} out of range (len {len})")]
    OptionIndexOutOfRange { index: usize, len: usize },

    #[error("Cannot remove the last remaining option")]
    LastOption,

    #[error("Invalid rewrite pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AssessResult<T> = Result<T, AssessError>;
