//! Markdown file persistence for t2p.
//!
//! Todos live in a single markdown file with a fixed line grammar:
//!
//! ```markdown
//! # Master Todo List
//!
//! ## H1 Tasks
//!
//! - 🔴 [H1] **P2**: Ship the release notes
//!   - Description: Cover the storage changes
//!   - Tags: release, docs
//! ```
//!
//! Notes live in a markdown file whose visible sections are cosmetic; the
//! source of truth is a JSON blob embedded in an HTML comment
//! (`<!-- T2P_NOTES_DATA ... -->`) and regenerated on every save.
//!
//! Both stores rewrite the whole file after every mutation. There is no
//! locking and no temp-file dance: the tool is single-user and
//! last-writer-wins.

mod error;
mod note_markdown;
mod note_store;
mod todo_markdown;
mod todo_store;

pub use error::StoreError;
pub use note_markdown::NoteMarkdown;
pub use note_store::NoteStore;
pub use todo_markdown::TodoMarkdown;
pub use todo_store::TodoStore;
