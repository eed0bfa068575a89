use crate::model::Field;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Please fill in all fields! The {0} is empty")]
    EmptyField(Field),

    #[error("Please enter a term to search!")]
    EmptySearchTerm,
}

impl StoreError {
    /// Errors caused by user input rather than the backing file.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::EmptyField(_) | StoreError::EmptySearchTerm)
    }
}
