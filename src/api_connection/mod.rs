pub mod connection;
pub mod endpoints;

pub use connection::{strip_code_fences, ApiConnectionError, TextGenerator};
pub use endpoints::Provider;
