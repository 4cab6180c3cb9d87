pub mod document;
pub mod markup;
pub mod saved_document;
