//! Clip domain model.

mod data_url;
mod kind;
mod model;

pub use data_url::{DataUrl, DataUrlError};
pub use kind::ClipKind;
pub use model::{char_prefix, Clip};
