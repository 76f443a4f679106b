use thiserror::Error;

pub type ScabbardResult<T> = Result<T, ScabbardError>;

#[derive(Error, Debug)]
pub enum ScabbardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Input declarations are malformed (duplicate classes, annotation
    /// values of an unexpected shape). Aborts the invocation.
    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Invalid type '{input}': {reason}")]
    TypeSyntax { input: String, reason: String },

    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Raised by the module registry when a module transitively imports itself.
    #[error("Module cycle detected: {trace}")]
    ModuleCycle { trace: String },

    /// The pipeline finished with reported errors; nothing was generated.
    #[error("Processing failed with {count} error(s)")]
    Validation { count: usize },

    #[error("Generation error: {0}")]
    Generation(String),
}

impl ScabbardError {
    pub fn type_syntax(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ScabbardError::TypeSyntax {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
