//! # gx-core — Hypermedia Primitives
//!
//! The leaf of the workspace DAG. Everything the application-state engine
//! needs from the outside world is defined here as a small value type or a
//! trait seam:
//!
//! - [`Link`] and [`Links`]: typed hypermedia links and the rel-keyed link
//!   table every state carries.
//! - [`link_header`]: RFC 5988 `Link` response-header parsing.
//! - [`template`]: RFC 6570 URI template expansion for templated links.
//! - [`rel`] and [`media`]: the wire vocabulary (rel strings, media types).
//! - [`http`]: the request/response model and the [`Transport`] trait.
//! - [`mock`]: [`MockTransport`], a scripted in-memory transport for tests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `gx-*` crates.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod http;
pub mod link;
pub mod link_header;
pub mod media;
pub mod mock;
pub mod rel;
pub mod template;

pub use error::{HttpError, TransportError};
pub use http::{header, Method, Request, Response, StatusCode, Transport};
pub use link::{Link, Links};
pub use mock::{MockResponse, MockTransport};
pub use url::Url;
