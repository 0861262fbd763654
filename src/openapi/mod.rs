// OpenAPI input side: acquisition, dereferencing and the typed document model

pub mod document;
pub mod resolver;
pub mod schema;
pub mod source;

pub use document::{declared_version, Document, OperationObject, Parameter, ParameterLocation};
pub use resolver::dereference;
pub use schema::{Schema, SchemaKind};
pub use source::load_document;
