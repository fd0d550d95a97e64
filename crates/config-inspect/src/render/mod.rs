//! Output renderers for diagrams and documents.

pub mod dot;
pub mod json;
pub mod markdown;
