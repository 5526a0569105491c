//! Domain model for the todo service.
//!
//! # Overview
//! Holds the `Todo` entity, the request payloads accepted by the HTTP API,
//! and the validation that turns those payloads into typed values. Nothing
//! here touches the network or the database.
//!
//! # Design
//! - Validation returns `Result<_, ValidationError>` instead of scattering
//!   field checks across handlers.
//! - `Title` can only be built through `Title::parse`, so storage never sees
//!   a blank title.

pub mod error;
pub mod types;

pub use error::ValidationError;
pub use types::{decode, parse_todo_id, CreateTodo, Title, Todo, TodoChanges, UpdateTodo};
