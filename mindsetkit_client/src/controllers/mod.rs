//! View state for each screen, without rendering.
//!
//! Controllers own an [`MskApi`](crate::api::MskApi) handle and expose the
//! fields a UI binds to. Async methods mutate that state when the request
//! settles and hand transport errors back to the caller.

pub mod admin;
pub mod auth;
pub mod practice_search;
pub mod practice_upload;
pub mod profile;
pub mod search;
pub mod survey_entry;
pub mod surveys;

pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";
