//! ID type wrappers for type safety.

mod id_macro;

pub mod clip_id;

pub use clip_id::ClipId;
