//! # gx-client — Hypermedia Application-State Engine
//!
//! A client for GEDCOM X RS APIs that never builds a URL of its own beyond
//! the root collection. Every other resource is reached by following links
//! the server sent.
//!
//! ## Model
//!
//! - [`ApplicationState<K>`]: one immutable snapshot of a resource (request,
//!   response, parsed entity, link table, bearer token). Transitions return
//!   new states.
//! - [`StateKind`]: the per-resource behaviour (entity type, media type,
//!   scope object, which statuses carry an entity). Kinds are zero-sized
//!   markers in [`kind`].
//! - [`StateFactory`]: the [`StateName`]-keyed builder registry every
//!   cross-kind transition goes through, so API surfaces can override
//!   construction for one name.
//! - [`StateTransitionOption`]: request modifiers applied before sending.
//!
//! ## Usage
//!
//! ```ignore
//! let client = GedcomxClient::new(ClientConfig::from_env()?)?;
//! let collection = client
//!     .read_collection()?
//!     .authenticate_via_oauth2_password("user", "pass", "client-id", None)?;
//! let me = collection.read_person_for_current_user(&[])?;
//! ```
//!
//! ## Crate Policy
//!
//! - States are never mutated after construction.
//! - No `.unwrap()` outside tests.
//! - Non-2xx responses are states, not errors, until `if_successful`.

pub mod any;
pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod kind;
pub mod oauth2;
pub mod options;
pub mod state;
pub mod states;
pub mod transport;

pub use any::AnyState;
pub use client::GedcomxClient;
pub use config::{ClientConfig, ConfigError, Environment};
pub use error::{GedcomxError, Result};
pub use factory::{StateBuilder, StateFactory};
pub use kind::{StateKind, StateName};
pub use options::{HeaderParameter, Preconditions, QueryParameter, StateTransitionOption};
pub use state::{AccessToken, ApplicationState, EntityPolicy, Exchange, StateContext};
pub use states::*;
pub use transport::ReqwestTransport;

pub use gx_core::{media, rel, Link, Links, Method, MockResponse, MockTransport, Request, Response, StatusCode, Transport, Url};
