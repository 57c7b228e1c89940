use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid attribute set: {0}")]
    Schema(String),
    #[error("row {row} has {found} fields, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("attribute '{attribute}' reads past the end of a row with {width} fields")]
    MissingField { attribute: String, width: usize },
    #[error("attribute '{attribute}' expects a number, found '{value}'")]
    Format { attribute: String, value: String },
    #[error("no branch of '{attribute}' matches value '{value}'")]
    Classification { attribute: String, value: String },
    #[error("the test set is empty, accuracy is undefined")]
    EmptyTestSet,
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("malformed data row: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
