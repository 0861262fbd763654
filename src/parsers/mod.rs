pub mod bruno;
pub mod openapi;

pub use bruno::{parse_environment, parse_request, read_collection};
pub use openapi::{ImportHooks, NoHooks, OpenApiParser, Operation};
