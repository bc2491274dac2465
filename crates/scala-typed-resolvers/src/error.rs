use crate::format::FormatError;

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The SDL could not be parsed
    #[error(transparent)]
    Parse(#[from] graphql_parser::schema::ParseError),
    /// The formatter rejected the generated code
    #[error("Failed to format the generated code: {0}")]
    Format(#[from] FormatError),
    #[error("Failed to write the generated code")]
    Write(#[from] std::fmt::Error),
    #[error("Invalid generation config: {0}")]
    Config(#[from] toml::de::Error),
}
