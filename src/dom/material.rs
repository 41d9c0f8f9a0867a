//! Materials (`<library_materials>/<material>`).

use super::{Item, Reference};

/// Decoded `<material>`: a named binding to an effect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Material {
    pub id: Option<String>,
    pub name: Option<String>,
    pub instance_effect: Option<InstanceEffect>,
}

impl Material {
    /// URL of the instantiated effect.
    pub fn effect_url(&self) -> Option<&Reference> {
        self.instance_effect.as_ref().map(|ie| &ie.url)
    }
}

impl Item for Material {
    const ELEMENT: &'static str = "material";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// `<instance_effect>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstanceEffect {
    pub sid: Option<String>,
    pub name: Option<String>,
    /// The effect being instantiated.
    pub url: Reference,
    pub technique_hints: Vec<TechniqueHint>,
}

/// `<technique_hint>`: preferred technique for a platform or profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TechniqueHint {
    pub platform: Option<String>,
    pub profile: Option<String>,
    /// Technique sid (`ref` attribute).
    pub reference: String,
}
