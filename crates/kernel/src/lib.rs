//! Placard kernel library.
//!
//! Feed-backed list blocks with client-side style filtering and pagination,
//! rendered into an in-memory document. The `placard` binary serves block
//! previews over HTTP and renders blocks from the command line.

pub mod adapters;
pub mod block;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod feed;
pub mod filter;
pub mod i18n;
pub mod list;
pub mod pagination;
pub mod routes;
pub mod state;

pub use block::{BlockConfig, BlockKind, BlocksConfig, ListBlock};
pub use config::Config;
pub use error::{AppError, AppResult, BlockError, BlockResult};
pub use state::AppState;
