pub mod booklet;
pub mod document;

pub use document::PdfDocument;
