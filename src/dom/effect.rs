//! Effects (`<library_effects>/<effect>`), `profile_COMMON` only.
//!
//! An effect describes shading: a fixed-function technique (constant,
//! lambert, phong, blinn) whose inputs are colors, floats or textures.
//! Textures go through two levels of scoped parameters:
//!
//! ```text
//! <texture texture="diffuse-sampler"/>
//!     -> newparam sid="diffuse-sampler" <sampler2D><source>diffuse-surface</source>
//!     -> newparam sid="diffuse-surface" <surface><init_from>image-id</init_from>
//! ```

use glam::{Vec2, Vec3, Vec4};

use super::{Item, Reference};

/// Decoded `<effect>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effect {
    pub id: Option<String>,
    pub name: Option<String>,
    /// `<newparam>` declarations of `profile_COMMON`, in document order.
    pub params: Vec<NewParam>,
    /// The common-profile technique, if present.
    pub technique: Option<Technique>,
}

impl Effect {
    /// Parameter by sid.
    pub fn param(&self, sid: &str) -> Option<&NewParam> {
        self.params.iter().find(|p| p.sid == sid)
    }

    /// Id of the image sampled by `texture_sid`, following
    /// sampler -> surface -> image (1.4) or sampler -> instance_image (1.5).
    pub fn texture_image(&self, texture_sid: &str) -> Option<&str> {
        let ParamValue::Sampler2D(sampler) = &self.param(texture_sid)?.value else {
            return None;
        };
        if let Some(image) = &sampler.instance_image {
            return image.fragment();
        }
        let surface_sid = sampler.source.as_deref()?;
        match &self.param(surface_sid)?.value {
            ParamValue::Surface(surface) => surface.init_from.as_deref(),
            _ => None,
        }
    }
}

impl Item for Effect {
    const ELEMENT: &'static str = "effect";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// `<newparam sid="...">`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewParam {
    pub sid: String,
    pub value: ParamValue,
}

/// Value of a `<newparam>`.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Surface(Surface),
    Sampler2D(Sampler2D),
    Float(f32),
    Float2(Vec2),
    Float3(Vec3),
    Float4(Vec4),
}

/// `<surface>` (COLLADA 1.4).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surface {
    /// Surface type (`2D`, `CUBE`, ...).
    pub kind: String,
    /// Id of the image providing the surface.
    pub init_from: Option<String>,
    pub format: Option<String>,
}

/// `<sampler2D>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sampler2D {
    /// Sid of the surface parameter (1.4).
    pub source: Option<String>,
    /// Sampled image (1.5).
    pub instance_image: Option<Reference>,
    pub wrap_s: Option<String>,
    pub wrap_t: Option<String>,
    pub minfilter: Option<String>,
    pub magfilter: Option<String>,
}

/// Fixed-function shading model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shading {
    Constant,
    #[default]
    Lambert,
    Phong,
    Blinn,
}

impl Shading {
    /// Map a technique child element name to its model.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "constant" => Some(Self::Constant),
            "lambert" => Some(Self::Lambert),
            "phong" => Some(Self::Phong),
            "blinn" => Some(Self::Blinn),
            _ => None,
        }
    }

    /// Element name.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Lambert => "lambert",
            Self::Phong => "phong",
            Self::Blinn => "blinn",
        }
    }
}

/// `common_color_or_texture_type`.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorOrTexture {
    /// Literal RGBA color.
    Color(Vec4),
    /// Reference to a `newparam` by sid.
    Param(String),
    /// Sampled texture; `texture` names a sampler2D parameter.
    Texture {
        texture: String,
        texcoord: Option<String>,
    },
}

impl ColorOrTexture {
    /// Literal color, if this is one.
    pub fn color(&self) -> Option<Vec4> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }
}

/// `<technique sid="common">` of `profile_COMMON`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Technique {
    pub sid: Option<String>,
    pub shading: Shading,
    pub emission: Option<ColorOrTexture>,
    pub ambient: Option<ColorOrTexture>,
    pub diffuse: Option<ColorOrTexture>,
    pub specular: Option<ColorOrTexture>,
    pub shininess: Option<f32>,
    pub reflective: Option<ColorOrTexture>,
    pub reflectivity: Option<f32>,
    pub transparent: Option<ColorOrTexture>,
    pub transparency: Option<f32>,
    pub index_of_refraction: Option<f32>,
}
