//! # t2p Core
//!
//! `TodoService` and `NoteService`: CRUD over an in-memory list with a
//! synchronous persist after every mutation, conjunctive filtering, stats,
//! the approval/assignment workflow, note/todo linking, and note export.

mod error;
mod export;
mod note_service;
mod todo_service;

pub use error::ServiceError;
pub use export::ExportFormat;
pub use note_service::NoteService;
pub use todo_service::TodoService;
