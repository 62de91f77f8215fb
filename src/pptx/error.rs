/// Error types for PresentationML operations.
use thiserror::Error;

/// Result type for PresentationML operations.
pub type Result<T> = std::result::Result<T, PptxError>;

#[derive(Error, Debug)]
pub enum PptxError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::opc::error::OpcError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// The package is not a usable presentation
    #[error("Invalid presentation package: {0}")]
    InvalidPackage(String),

    /// Slide index outside the presentation (0-based, internal)
    #[error("No slide at index {0}")]
    SlideIndex(usize),

    /// Image bytes in a format the package cannot embed
    #[error("Unrecognized image format")]
    UnsupportedImage,
}

impl From<quick_xml::Error> for PptxError {
    fn from(err: quick_xml::Error) -> Self {
        PptxError::Xml(err.to_string())
    }
}
