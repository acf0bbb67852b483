pub mod mock_document_source;

pub use mock_document_source::MockDocumentSource;
