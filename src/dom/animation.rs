//! Animations (`<library_animations>/<animation>`).
//!
//! An animation owns its data sources, the samplers that combine them into
//! curves, and the channels that bind a sampler's output to a target
//! property. Animations nest: child animations are stored in the library
//! arena and referenced by index.

use super::{Input, Item, Reference, Source};

/// Decoded `<animation>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animation {
    pub id: Option<String>,
    pub name: Option<String>,
    pub sources: Vec<Source>,
    pub samplers: Vec<Sampler>,
    pub channels: Vec<Channel>,
    /// Arena indices of nested animations, in document order.
    pub children: Vec<usize>,
}

impl Animation {
    /// Source by id.
    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Sampler by id.
    pub fn sampler(&self, id: &str) -> Option<&Sampler> {
        self.samplers.iter().find(|s| s.id.as_deref() == Some(id))
    }

    /// Sampler driving `channel`, if declared in this animation.
    pub fn sampler_for(&self, channel: &Channel) -> Option<&Sampler> {
        self.sampler(channel.source.fragment()?)
    }

    /// Source bound to `input`, if declared in this animation.
    pub fn input_source(&self, input: &Input) -> Option<&Source> {
        self.source(input.source.fragment()?)
    }
}

impl Item for Animation {
    const ELEMENT: &'static str = "animation";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// `<sampler>`: interpolation function built from inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sampler {
    pub id: Option<String>,
    pub inputs: Vec<Input>,
}

impl Sampler {
    /// Input by semantic.
    pub fn input(&self, semantic: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.semantic == semantic)
    }
}

/// `<channel>`: binds a sampler to an animated property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Channel {
    /// The sampler.
    pub source: Reference,
    /// Target address (`node/sid.member` or `node/sid(i)(j)`).
    pub target: String,
}

impl Channel {
    /// Split the target address into its parts.
    pub fn target_path(&self) -> TargetPath {
        TargetPath::parse(&self.target)
    }
}

/// Member selector at the end of a target address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetMember {
    /// `.X`, `.ANGLE`, ...
    Field(String),
    /// `(0)(3)`: array or matrix indices.
    Index(Vec<usize>),
}

/// Parsed channel target address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetPath {
    /// Id of the targeted node (first path segment).
    pub node: String,
    /// Scoped ids following the node.
    pub sids: Vec<String>,
    pub member: Option<TargetMember>,
}

impl TargetPath {
    /// Parse a target address. Malformed index selectors are kept as part
    /// of the last sid.
    pub fn parse(target: &str) -> Self {
        let mut segments = target.split('/');
        let node = segments.next().unwrap_or_default().to_string();
        let mut sids: Vec<String> = segments.map(str::to_string).collect();

        let mut member = None;
        if let Some(last) = sids.last_mut() {
            if let Some((sid, field)) = last.split_once('.') {
                member = Some(TargetMember::Field(field.to_string()));
                *last = sid.to_string();
            } else if let Some(open) = last.find('(') {
                if let Some(indices) = parse_indices(&last[open..]) {
                    member = Some(TargetMember::Index(indices));
                    last.truncate(open);
                }
            }
        }
        Self { node, sids, member }
    }
}

/// Parse `(0)(12)` into `[0, 12]`.
fn parse_indices(s: &str) -> Option<Vec<usize>> {
    let mut out = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let inner = rest.strip_prefix('(')?;
        let close = inner.find(')')?;
        out.push(inner[..close].trim().parse().ok()?);
        rest = &inner[close + 1..];
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_field() {
        let path = TargetPath::parse("Cube/rotateZ.ANGLE");
        assert_eq!(path.node, "Cube");
        assert_eq!(path.sids, vec!["rotateZ"]);
        assert_eq!(path.member, Some(TargetMember::Field("ANGLE".into())));
    }

    #[test]
    fn test_target_indices() {
        let path = TargetPath::parse("Armature_Bone/transform(0)(3)");
        assert_eq!(path.sids, vec!["transform"]);
        assert_eq!(path.member, Some(TargetMember::Index(vec![0, 3])));

        let bad = TargetPath::parse("n/m(x)");
        assert_eq!(bad.sids, vec!["m(x)"]);
        assert_eq!(bad.member, None);
    }

    #[test]
    fn test_target_node_only() {
        let path = TargetPath::parse("Light");
        assert_eq!(path.node, "Light");
        assert!(path.sids.is_empty());
        assert!(path.member.is_none());
    }

    #[test]
    fn test_sampler_lookup() {
        let anim = Animation {
            samplers: vec![Sampler {
                id: Some("s1".into()),
                inputs: vec![Input {
                    semantic: "INPUT".into(),
                    source: Reference::new("#times"),
                    ..Default::default()
                }],
            }],
            sources: vec![Source {
                id: "times".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let channel = Channel {
            source: Reference::new("#s1"),
            target: "Cube/location.X".into(),
        };
        let sampler = anim.sampler_for(&channel).unwrap();
        let input = sampler.input("INPUT").unwrap();
        assert_eq!(anim.input_source(input).map(|s| s.id.as_str()), Some("times"));
        assert!(sampler.input("OUTPUT").is_none());
    }
}
