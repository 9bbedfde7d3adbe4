//! A small HTTP/1.1 server working directly on raw TCP byte streams.
//!
//! Bytes read from a connection are parsed into a [`Request`], dispatched by
//! [`routes::route`] and the resulting [`Response`] is rendered back to wire
//! bytes by [`Response::render`].

pub mod config;
pub mod files;
pub mod headers;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use config::Config;
pub use headers::HeaderMap;
pub use request::{ParseError, Request};
pub use response::Response;
