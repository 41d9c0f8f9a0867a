//! Document tree produced by the decoder.
//!
//! ## Key Concepts
//!
//! - **Document**: root aggregate owning at most one library per kind
//! - **Library**: arena of items of one kind (images, effects, materials, animations)
//! - **Reference**: string URL naming another item, resolved through the registry
//! - **Handle**: arena position of an identified item

mod animation;
mod asset;
mod document;
mod dump;
mod effect;
mod image;
mod library;
mod material;
mod reference;
mod source;

pub use animation::*;
pub use asset::*;
pub use document::Document;
pub use effect::*;
pub use image::*;
pub use library::{Item, Library};
pub use material::*;
pub use reference::{Handle, LibraryKind, Reference};
pub use source::*;
