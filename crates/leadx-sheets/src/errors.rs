use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sheet has no header row")]
    MissingHeader,

    #[error("header row invalid: {message}")]
    InvalidHeader { message: String },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("data row {line_index} invalid: {message}")]
    DataRow { line_index: usize, message: String },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}
