//! Small helpers shared across modules.

pub mod mask;

pub use mask::mask_token;
