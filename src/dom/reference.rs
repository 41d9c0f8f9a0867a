//! Handles into the document arenas and the references that name them.

use std::fmt;

use crate::core::fragment;

/// Library kinds known to the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LibraryKind {
    Images,
    Effects,
    Materials,
    Animations,
}

impl LibraryKind {
    /// All kinds, in the order they are reported.
    pub const ALL: [LibraryKind; 4] = [Self::Images, Self::Effects, Self::Materials, Self::Animations];

    /// Element name of the library container.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Images => "library_images",
            Self::Effects => "library_effects",
            Self::Materials => "library_materials",
            Self::Animations => "library_animations",
        }
    }

    /// Map a container element name to its kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Position of an identified node inside a [`super::Document`].
///
/// Indices address the arena of the owning library; nested nodes
/// (sources, samplers) also carry the index of their animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    Library(LibraryKind),
    Image(usize),
    Effect(usize),
    Material(usize),
    Animation(usize),
    Source { animation: usize, index: usize },
    /// The data array of `animation.sources[source]`.
    Array { animation: usize, source: usize },
    Sampler { animation: usize, index: usize },
}

/// Weak, string-keyed pointer to another node (`url="#id"`, `source="#id"`).
///
/// Never owns its target; resolve it through [`super::Document::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reference {
    /// URL as written in the document.
    pub url: String,
}

impl Reference {
    /// Create a reference from a URL or bare id.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Target id within this document, if the URL points into it.
    pub fn fragment(&self) -> Option<&str> {
        fragment(&self.url)
    }

    /// True if the URL points into another document.
    pub fn is_external(&self) -> bool {
        !self.url.is_empty() && self.fragment().is_none()
    }

    /// URL as written.
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl From<&str> for Reference {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}
