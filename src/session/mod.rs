//! Session Module
//!
//! Per-user study sessions caching the uploaded document, its extracted
//! text and every AI artifact derived from it, so repeated views never
//! repeat an AI call.

pub mod store;
pub mod types;

pub use store::{DocumentLoad, SessionStore};
pub use types::*;
