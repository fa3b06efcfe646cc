//! Data model shared by the pipeline stages.
//!
//! Raw [`LayoutItem`]s come in from the layout engine, are turned into
//! [`Element`]s that the pipeline mutates in place, and leave as the
//! `blocks` of a [`ProcessResult`].

mod element;
mod layout;
mod result;

pub use element::{BBox, BlockType, Element, Props};
pub use layout::{LayoutAnalysis, LayoutItem};
pub use result::ProcessResult;
