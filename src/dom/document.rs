//! The decoded document.

use super::{
    Animation, ArrayData, Asset, ColorOrTexture, Effect, Handle, Image, Input, Library, LibraryKind,
    Material, Sampler, Source,
};
use crate::core::{Diagnostic, ReferenceSite, Registry};

/// Root of a decoded COLLADA document.
///
/// Created by one decode call and read-only afterwards. Holds at most one
/// library per kind; cross-references between items are resolved through
/// [`Document::resolve`].
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub(crate) version: Option<String>,
    pub(crate) asset: Option<Asset>,
    pub(crate) images: Option<Library<Image>>,
    pub(crate) effects: Option<Library<Effect>>,
    pub(crate) materials: Option<Library<Material>>,
    pub(crate) animations: Option<Library<Animation>>,
    pub(crate) registry: Registry,
    pub(crate) unresolved: Vec<ReferenceSite>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Value of the root `version` attribute.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Document-level asset information.
    pub fn asset(&self) -> Option<&Asset> {
        self.asset.as_ref()
    }

    /// `<library_images>`, if present.
    pub fn images(&self) -> Option<&Library<Image>> {
        self.images.as_ref()
    }

    /// `<library_effects>`, if present.
    pub fn effects(&self) -> Option<&Library<Effect>> {
        self.effects.as_ref()
    }

    /// `<library_materials>`, if present.
    pub fn materials(&self) -> Option<&Library<Material>> {
        self.materials.as_ref()
    }

    /// `<library_animations>`, if present.
    pub fn animations(&self) -> Option<&Library<Animation>> {
        self.animations.as_ref()
    }

    /// Number of items (nested ones included) in a library, 0 if absent.
    pub fn library_len(&self, kind: LibraryKind) -> usize {
        match kind {
            LibraryKind::Images => self.images.as_ref().map_or(0, Library::len),
            LibraryKind::Effects => self.effects.as_ref().map_or(0, Library::len),
            LibraryKind::Materials => self.materials.as_ref().map_or(0, Library::len),
            LibraryKind::Animations => self.animations.as_ref().map_or(0, Library::len),
        }
    }

    /// Warnings recorded while decoding.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// References that did not resolve to any id of this document.
    pub fn unresolved(&self) -> &[ReferenceSite] {
        &self.unresolved
    }

    /// Id registry of this document.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve a URL (`#id`) or bare id.
    pub fn resolve(&self, url: &str) -> Option<Handle> {
        self.registry.resolve(url)
    }

    /// Image by arena index.
    pub fn image(&self, index: usize) -> Option<&Image> {
        self.images.as_ref()?.get(index)
    }

    /// Effect by arena index.
    pub fn effect(&self, index: usize) -> Option<&Effect> {
        self.effects.as_ref()?.get(index)
    }

    /// Material by arena index.
    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.as_ref()?.get(index)
    }

    /// Animation by arena index.
    pub fn animation(&self, index: usize) -> Option<&Animation> {
        self.animations.as_ref()?.get(index)
    }

    /// Source addressed by a `Source` handle.
    pub fn source(&self, handle: Handle) -> Option<&Source> {
        match handle {
            Handle::Source { animation, index } => self.animation(animation)?.sources.get(index),
            _ => None,
        }
    }

    /// Array addressed by an `Array` handle.
    pub fn array(&self, handle: Handle) -> Option<&ArrayData> {
        match handle {
            Handle::Array { animation, source } => {
                self.animation(animation)?.sources.get(source)?.array.as_ref()
            }
            _ => None,
        }
    }

    /// Sampler addressed by a `Sampler` handle.
    pub fn sampler(&self, handle: Handle) -> Option<&Sampler> {
        match handle {
            Handle::Sampler { animation, index } => self.animation(animation)?.samplers.get(index),
            _ => None,
        }
    }

    /// Image with the given id (or `#id` URL).
    pub fn image_by_id(&self, url: &str) -> Option<&Image> {
        match self.resolve(url)? {
            Handle::Image(i) => self.image(i),
            _ => None,
        }
    }

    /// Effect with the given id (or `#id` URL).
    pub fn effect_by_id(&self, url: &str) -> Option<&Effect> {
        match self.resolve(url)? {
            Handle::Effect(i) => self.effect(i),
            _ => None,
        }
    }

    /// Material with the given id (or `#id` URL).
    pub fn material_by_id(&self, url: &str) -> Option<&Material> {
        match self.resolve(url)? {
            Handle::Material(i) => self.material(i),
            _ => None,
        }
    }

    /// Animation with the given id (or `#id` URL).
    pub fn animation_by_id(&self, url: &str) -> Option<&Animation> {
        match self.resolve(url)? {
            Handle::Animation(i) => self.animation(i),
            _ => None,
        }
    }

    /// Effect instantiated by a material.
    pub fn material_effect(&self, material: &Material) -> Option<&Effect> {
        self.effect_by_id(material.effect_url()?.as_str())
    }

    /// Image sampled by a texture-valued effect input.
    pub fn effect_texture_image(&self, effect: &Effect, value: &ColorOrTexture) -> Option<&Image> {
        match value {
            ColorOrTexture::Texture { texture, .. } => self.image_by_id(effect.texture_image(texture)?),
            _ => None,
        }
    }

    /// Source bound to a sampler input, wherever it is declared.
    pub fn input_source(&self, input: &Input) -> Option<&Source> {
        self.source(self.resolve(input.source.as_str())?)
    }

    /// Sampler driving a channel, wherever it is declared.
    pub fn channel_sampler(&self, channel: &super::Channel) -> Option<&Sampler> {
        self.sampler(self.resolve(channel.source.as_str())?)
    }
}
