//! Decoding a token stream into a [`Document`].
//!
//! ## Overview
//!
//! One builder function per element kind reads its element's immediate
//! children through [`Walker::next_child`] and dispatches on the tag name.
//! Builders never look ahead or back: a child they do not descend into is
//! skipped by the walker before the next sibling is returned.
//!
//! Ids are registered as items are finished and every URL is queued. Once
//! the root element is closed, the queued references are checked against
//! the registered ids; dangling ones are warnings (errors in strict mode).
//!
//! ## Example
//!
//! ```ignore
//! use collada::decode::Decoder;
//! use collada::core::{DecodeOptions, TracingSink, XmlCursor};
//!
//! let doc = Decoder::new(XmlCursor::from_text(text))
//!     .with_options(DecodeOptions::strict())
//!     .with_sink(TracingSink)
//!     .decode()?;
//! ```

mod animations;
mod asset;
mod effects;
mod images;
mod materials;
mod source;

use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use memmap2::Mmap;
use serde_json::Value;
use tracing::{debug, debug_span, trace};

use crate::core::{
    decompress, is_compressed, CancelToken, DecodeOptions, DiagnosticKind, DiagnosticSink, Diagnostics,
    Element, JsonCursor, NoopSink, Registry, TokenSource, Walker, XmlCursor,
};
use crate::dom::{Document, Handle, Item, Library, LibraryKind};
use crate::util::{DecodeError, Error, Result};

/// Root element name.
pub const ROOT_ELEMENT: &str = "COLLADA";

/// Root children that are valid COLLADA but not decoded.
const UNSUPPORTED_SECTIONS: &[&str] = &[
    "library_animation_clips",
    "library_cameras",
    "library_controllers",
    "library_force_fields",
    "library_geometries",
    "library_lights",
    "library_nodes",
    "library_physics_materials",
    "library_physics_models",
    "library_physics_scenes",
    "library_visual_scenes",
    "scene",
    "extra",
];

/// Configurable decode of one document from any [`TokenSource`].
pub struct Decoder<'s, S> {
    source: S,
    options: DecodeOptions,
    diagnostics: Diagnostics<'s>,
    cancel: Option<CancelToken>,
}

impl<'s, S: TokenSource> Decoder<'s, S> {
    /// Create a decoder with default options and no diagnostic sink.
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: DecodeOptions::default(),
            diagnostics: Diagnostics::new(),
            cancel: None,
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Forward every warning to `sink` as it is recorded.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 's) -> Self {
        self.diagnostics = Diagnostics::with_sink(sink);
        self
    }

    /// Abort with [`Error::Cancelled`] once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run the decode. Either the whole document is returned or nothing.
    pub fn decode(self) -> std::result::Result<Document, DecodeError> {
        let span = debug_span!("decode", strict = self.options.strict);
        let _enter = span.enter();

        let mut walker = Walker::new(self.source)
            .with_max_depth(self.options.max_depth)
            .with_trim_text(self.options.trim_text);
        if let Some(token) = self.cancel {
            walker = walker.with_cancel(token);
        }
        let mut ctx = Context {
            walker,
            registry: Registry::new(),
            diags: self.diagnostics,
            options: self.options,
        };

        match build_document(&mut ctx) {
            Ok(doc) => {
                debug!(
                    ids = doc.registry().len(),
                    warnings = doc.diagnostics().len(),
                    unresolved = doc.unresolved().len(),
                    "document decoded"
                );
                Ok(doc)
            }
            Err(error) => {
                let path = ctx.walker.path();
                debug!(%error, %path, "decode failed");
                Err(DecodeError {
                    error,
                    path,
                    diagnostics: ctx.diags.into_records(),
                })
            }
        }
    }
}

/// Decode a document from XML text.
pub fn decode(text: &str) -> std::result::Result<Document, DecodeError> {
    Decoder::new(XmlCursor::from_text(text)).decode()
}

/// Decode a document from XML text with explicit options.
pub fn decode_with(text: &str, options: DecodeOptions) -> std::result::Result<Document, DecodeError> {
    Decoder::new(XmlCursor::from_text(text)).with_options(options).decode()
}

/// Decode a document from any buffered XML reader.
pub fn decode_reader<R: BufRead>(reader: R) -> std::result::Result<Document, DecodeError> {
    Decoder::new(XmlCursor::new(reader)).decode()
}

/// Decode the JSON form of a document.
pub fn decode_json(text: &str) -> std::result::Result<Document, DecodeError> {
    Decoder::new(JsonCursor::from_text(text)?).decode()
}

/// Decode the JSON form of a document from a parsed value.
pub fn decode_json_value(value: Value) -> std::result::Result<Document, DecodeError> {
    Decoder::new(JsonCursor::new(value)?).decode()
}

impl Document {
    /// Decode a `.dae` file (plain or gzip-compressed) with default options.
    pub fn open(path: impl AsRef<Path>) -> std::result::Result<Self, DecodeError> {
        Self::open_with(path, DecodeOptions::default())
    }

    /// Decode a `.dae` file with explicit options.
    ///
    /// The file is memory-mapped; gzip input is recognised by its magic
    /// bytes and inflated first.
    pub fn open_with(path: impl AsRef<Path>, options: DecodeOptions) -> std::result::Result<Self, DecodeError> {
        Self::open_with_sink(path, options, NoopSink)
    }

    /// Decode a `.dae` file, forwarding each warning to `sink` as it is
    /// recorded.
    pub fn open_with_sink(
        path: impl AsRef<Path>,
        options: DecodeOptions,
        sink: impl DiagnosticSink,
    ) -> std::result::Result<Self, DecodeError> {
        let path = path.as_ref();
        let mmap = map_file(path)?;
        let bytes: &[u8] = mmap.as_deref().unwrap_or(&[]);

        let inflated;
        let bytes = if is_compressed(bytes) {
            inflated = decompress(bytes)?;
            debug!(path = %path.display(), compressed = bytes.len(), inflated = inflated.len(), "gzip input");
            &inflated[..]
        } else {
            bytes
        };
        Decoder::new(XmlCursor::from_bytes(bytes))
            .with_options(options)
            .with_sink(sink)
            .decode()
    }
}

/// Map a file read-only. Empty files yield `None`.
fn map_file(path: &Path) -> Result<Option<Mmap>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    if file.metadata()?.len() == 0 {
        return Ok(None);
    }
    // SAFETY: the map is read-only and dropped before this decode returns.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
    Ok(Some(mmap))
}

/// State shared by all builders of one decode.
pub(crate) struct Context<'s, S> {
    pub(crate) walker: Walker<S>,
    pub(crate) registry: Registry,
    pub(crate) diags: Diagnostics<'s>,
    pub(crate) options: DecodeOptions,
}

impl<S: TokenSource> Context<'_, S> {
    /// Next immediate child of `parent`.
    pub(crate) fn next_child(&mut self, parent: &Element) -> Result<Option<Element>> {
        let child = self.walker.next_child(parent)?;
        if let Some(child) = &child {
            trace!(parent = parent.name(), element = child.name(), depth = child.depth, "element");
        }
        Ok(child)
    }

    /// Skip a child the builder does not know, recording how much was skipped.
    pub(crate) fn unknown(&mut self, parent: &Element, child: &Element) -> Result<()> {
        self.skip_with(DiagnosticKind::UnknownElement, parent, child)
    }

    /// Skip a valid COLLADA child that is not decoded.
    pub(crate) fn unsupported(&mut self, parent: &Element, child: &Element) -> Result<()> {
        self.skip_with(DiagnosticKind::Unsupported, parent, child)
    }

    fn skip_with(&mut self, kind: DiagnosticKind, parent: &Element, child: &Element) -> Result<()> {
        let skipped = self.walker.skip(child)?;
        self.diags.warn(
            kind,
            parent.name(),
            child.name(),
            format!("skipped, {skipped} nested element(s)"),
        );
        Ok(())
    }

    /// Register an item id, if it has one.
    pub(crate) fn register(&mut self, id: Option<&str>, handle: Handle, element: &str) {
        if let Some(id) = id {
            self.registry.register(id, handle, element, &mut self.diags);
        }
    }

    /// Queue a reference for the resolution pass.
    pub(crate) fn reference(&mut self, url: &str, element: &str, attribute: &str) {
        self.registry.reference(url, element, attribute);
    }
}

/// Top-level sections of the root element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Asset,
    Library(LibraryKind),
    Unsupported,
    Unknown,
}

impl Section {
    fn of(tag: &str) -> Self {
        if tag == "asset" {
            Self::Asset
        } else if let Some(kind) = LibraryKind::from_tag(tag) {
            Self::Library(kind)
        } else if UNSUPPORTED_SECTIONS.contains(&tag) {
            Self::Unsupported
        } else {
            Self::Unknown
        }
    }
}

fn build_document<S: TokenSource>(ctx: &mut Context<'_, S>) -> Result<Document> {
    let root = ctx.walker.root()?;
    if root.name() != ROOT_ELEMENT {
        return Err(Error::UnexpectedRoot(root.name().to_string()));
    }
    let mut doc = Document {
        version: root.attr_string("version"),
        ..Document::default()
    };
    debug!(version = doc.version.as_deref().unwrap_or(""), "root element");

    while let Some(child) = ctx.next_child(&root)? {
        match Section::of(child.name()) {
            Section::Asset => doc.asset = Some(asset::asset(ctx, &child)?),
            Section::Library(kind) => library(ctx, &mut doc, kind, &child)?,
            Section::Unsupported => ctx.unsupported(&root, &child)?,
            Section::Unknown => ctx.unknown(&root, &child)?,
        }
    }

    let unresolved = ctx.registry.resolve_pending(&mut ctx.diags);
    if ctx.options.strict {
        if let Some(site) = unresolved.first() {
            return Err(Error::UnresolvedReference {
                url: site.url.clone(),
                element: site.element.clone(),
            });
        }
    }

    doc.registry = std::mem::take(&mut ctx.registry);
    doc.unresolved = unresolved;
    doc.diagnostics = std::mem::take(&mut ctx.diags).into_records();
    Ok(doc)
}

/// Decode one `library_*` element into its slot of the document.
fn library<S: TokenSource>(ctx: &mut Context<'_, S>, doc: &mut Document, kind: LibraryKind, el: &Element) -> Result<()> {
    let id = if ctx.options.require_library_ids {
        Some(el.required("id")?.to_string())
    } else {
        el.attr_string("id")
    };
    let name = el.attr_string("name");
    ctx.register(id.as_deref(), Handle::Library(kind), el.name());

    match kind {
        LibraryKind::Images => {
            let lib = open_library(ctx, &mut doc.images, el, id, name);
            library_items(ctx, lib, el, images::image)
        }
        LibraryKind::Effects => {
            let lib = open_library(ctx, &mut doc.effects, el, id, name);
            library_items(ctx, lib, el, effects::effect)
        }
        LibraryKind::Materials => {
            let lib = open_library(ctx, &mut doc.materials, el, id, name);
            library_items(ctx, lib, el, materials::material)
        }
        LibraryKind::Animations => {
            let lib = open_library(ctx, &mut doc.animations, el, id, name);
            library_items(ctx, lib, el, animations::animation)
        }
    }
}

/// Library to decode into: a new one, or the earlier library of the same
/// kind (its id and name are kept).
fn open_library<'l, S: TokenSource, T: Item>(
    ctx: &mut Context<'_, S>,
    slot: &'l mut Option<Library<T>>,
    el: &Element,
    id: Option<String>,
    name: Option<String>,
) -> &'l mut Library<T> {
    if slot.is_some() {
        ctx.diags.warn(
            DiagnosticKind::DuplicateLibrary,
            ROOT_ELEMENT,
            el.name(),
            "library appears more than once; items merged into the first",
        );
    }
    slot.get_or_insert_with(|| Library::new(id, name))
}

/// Read the children of a library element. `build` decodes one item into
/// the arena and returns its index.
fn library_items<'s, S, T, F>(ctx: &mut Context<'s, S>, lib: &mut Library<T>, el: &Element, mut build: F) -> Result<()>
where
    S: TokenSource,
    T: Item,
    F: FnMut(&mut Context<'s, S>, &mut Library<T>, &Element) -> Result<usize>,
{
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            tag if tag == T::ELEMENT => {
                let index = build(ctx, lib, &child)?;
                lib.push_root(index);
            }
            "asset" => lib.asset = Some(asset::asset(ctx, &child)?),
            "extra" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }
    debug!(library = el.name(), items = lib.len(), "library decoded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Diagnostic;

    #[test]
    fn test_sections() {
        assert_eq!(Section::of("asset"), Section::Asset);
        assert_eq!(Section::of("library_effects"), Section::Library(LibraryKind::Effects));
        assert_eq!(Section::of("library_geometries"), Section::Unsupported);
        assert_eq!(Section::of("my_stuff"), Section::Unknown);
    }

    #[test]
    fn test_root_must_be_collada() {
        let err = decode("<gltf/>").unwrap_err();
        assert!(matches!(err.error, Error::UnexpectedRoot(ref name) if name == "gltf"));
    }

    #[test]
    fn test_empty_root() {
        let doc = decode(r#"<COLLADA version="1.4.1"></COLLADA>"#).unwrap();
        assert_eq!(doc.version(), Some("1.4.1"));
        assert!(doc.images().is_none());
        assert!(doc.diagnostics().is_empty());
    }

    #[test]
    fn test_sink_receives_warnings() {
        let mut seen: Vec<Diagnostic> = Vec::new();
        let doc = Decoder::new(XmlCursor::from_text("<COLLADA><library_geometries><geometry/></library_geometries></COLLADA>"))
            .with_sink(|d: &Diagnostic| seen.push(d.clone()))
            .decode()
            .unwrap();
        assert_eq!(doc.diagnostics().len(), 1);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, DiagnosticKind::Unsupported);
        assert_eq!(seen[0].tag, "library_geometries");
    }

    #[test]
    fn test_required_library_id() {
        let opts = DecodeOptions {
            require_library_ids: true,
            ..DecodeOptions::default()
        };
        let err = decode_with("<COLLADA><library_images/></COLLADA>", opts).unwrap_err();
        assert!(matches!(
            err.error,
            Error::MissingRequiredAttribute { ref element, ref attribute }
                if element == "library_images" && attribute == "id"
        ));
        assert_eq!(err.path, "COLLADA/library_images");
    }
}
