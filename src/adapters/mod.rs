// Adapters layer: concrete implementations of the domain ports (http, progress output).

pub mod http;
pub mod reporter;
