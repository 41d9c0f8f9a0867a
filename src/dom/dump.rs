//! Indented text dump of a document tree.

use std::fmt::{self, Write};

use super::{
    Animation, ArrayValues, Asset, ColorOrTexture, Document, Effect, Image, ImageSource, Item, Library,
    Material, ParamValue, Source,
};

const STEP: usize = 2;

fn pad(out: &mut dyn Write, indent: usize) -> fmt::Result {
    write!(out, "{:indent$}", "", indent = indent)
}

fn opt(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("")
}

trait Dump {
    fn dump(&self, out: &mut dyn Write, indent: usize) -> fmt::Result;
}

impl Document {
    /// Write an indented, human readable tree of the document.
    pub fn dump(&self, out: &mut dyn Write) -> fmt::Result {
        writeln!(out, "COLLADA version:{}", self.version().unwrap_or(""))?;
        if let Some(asset) = &self.asset {
            asset.dump(out, STEP)?;
        }
        if let Some(lib) = &self.images {
            dump_library(lib, "LibraryImages", out, STEP)?;
        }
        if let Some(lib) = &self.effects {
            dump_library(lib, "LibraryEffects", out, STEP)?;
        }
        if let Some(lib) = &self.materials {
            dump_library(lib, "LibraryMaterials", out, STEP)?;
        }
        if let Some(lib) = &self.animations {
            pad(out, STEP)?;
            writeln!(out, "LibraryAnimations id:{} name:{}", opt(&lib.id), opt(&lib.name))?;
            for &root in lib.root_indices() {
                dump_animation(lib, root, out, STEP * 2)?;
            }
        }
        Ok(())
    }

    /// The dump as a string.
    pub fn dump_string(&self) -> String {
        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = self.dump(&mut s);
        s
    }
}

fn dump_library<T: Item + Dump>(lib: &Library<T>, label: &str, out: &mut dyn Write, indent: usize) -> fmt::Result {
    pad(out, indent)?;
    writeln!(out, "{} id:{} name:{}", label, opt(&lib.id), opt(&lib.name))?;
    for item in lib.roots() {
        item.dump(out, indent + STEP)?;
    }
    Ok(())
}

impl Dump for Asset {
    fn dump(&self, out: &mut dyn Write, indent: usize) -> fmt::Result {
        pad(out, indent)?;
        writeln!(
            out,
            "Asset unit:{}({}) up:{} created:{}",
            self.unit.name,
            self.unit.meter,
            self.up_axis.as_str(),
            opt(&self.created)
        )?;
        for c in &self.contributors {
            pad(out, indent + STEP)?;
            writeln!(out, "Contributor author:{} tool:{}", opt(&c.author), opt(&c.authoring_tool))?;
        }
        Ok(())
    }
}

impl Dump for Image {
    fn dump(&self, out: &mut dyn Write, indent: usize) -> fmt::Result {
        pad(out, indent)?;
        writeln!(out, "Image id:{} name:{}", opt(&self.id), opt(&self.name))?;
        match &self.source {
            Some(ImageSource::InitFrom(uri)) => {
                pad(out, indent + STEP)?;
                writeln!(out, "InitFrom:{uri}")
            }
            Some(ImageSource::Data(bytes)) => {
                pad(out, indent + STEP)?;
                writeln!(out, "Data:{} bytes", bytes.len())
            }
            None => Ok(()),
        }
    }
}

fn color_or_texture(value: &ColorOrTexture) -> String {
    match value {
        ColorOrTexture::Color(c) => format!("color({} {} {} {})", c.x, c.y, c.z, c.w),
        ColorOrTexture::Param(p) => format!("param({p})"),
        ColorOrTexture::Texture { texture, .. } => format!("texture({texture})"),
    }
}

impl Dump for Effect {
    fn dump(&self, out: &mut dyn Write, indent: usize) -> fmt::Result {
        pad(out, indent)?;
        writeln!(out, "Effect id:{} name:{}", opt(&self.id), opt(&self.name))?;
        let ind = indent + STEP;
        for p in &self.params {
            pad(out, ind)?;
            match &p.value {
                ParamValue::Surface(s) => {
                    writeln!(out, "NewParam sid:{} surface type:{} init_from:{}", p.sid, s.kind, opt(&s.init_from))?
                }
                ParamValue::Sampler2D(s) => writeln!(out, "NewParam sid:{} sampler2D source:{}", p.sid, opt(&s.source))?,
                other => writeln!(out, "NewParam sid:{} {:?}", p.sid, other)?,
            }
        }
        if let Some(t) = &self.technique {
            pad(out, ind)?;
            writeln!(out, "Technique sid:{} {}", opt(&t.sid), t.shading.tag())?;
            let slots = [
                ("emission", &t.emission),
                ("ambient", &t.ambient),
                ("diffuse", &t.diffuse),
                ("specular", &t.specular),
                ("reflective", &t.reflective),
                ("transparent", &t.transparent),
            ];
            for (label, value) in slots {
                if let Some(v) = value {
                    pad(out, ind + STEP)?;
                    writeln!(out, "{label}:{}", color_or_texture(v))?;
                }
            }
            if let Some(s) = t.shininess {
                pad(out, ind + STEP)?;
                writeln!(out, "shininess:{s}")?;
            }
        }
        Ok(())
    }
}

impl Dump for Material {
    fn dump(&self, out: &mut dyn Write, indent: usize) -> fmt::Result {
        pad(out, indent)?;
        writeln!(out, "Material id:{} name:{}", opt(&self.id), opt(&self.name))?;
        if let Some(ie) = &self.instance_effect {
            pad(out, indent + STEP)?;
            writeln!(out, "InstanceEffect sid:{} name:{} url:{}", opt(&ie.sid), opt(&ie.name), ie.url)?;
        }
        Ok(())
    }
}

impl Dump for Source {
    fn dump(&self, out: &mut dyn Write, indent: usize) -> fmt::Result {
        pad(out, indent)?;
        writeln!(out, "Source id:{} name:{}", self.id, opt(&self.name))?;
        if let Some(array) = &self.array {
            pad(out, indent + STEP)?;
            let preview = match &array.values {
                ArrayValues::Float(v) => format!("{:?}", &v[..v.len().min(6)]),
                ArrayValues::Int(v) => format!("{:?}", &v[..v.len().min(6)]),
                ArrayValues::Bool(v) => format!("{:?}", &v[..v.len().min(6)]),
                ArrayValues::Name(v) | ArrayValues::IdRef(v) => format!("{:?}", &v[..v.len().min(6)]),
            };
            writeln!(out, "{} id:{} count:{} {}", array.values.tag(), opt(&array.id), array.count, preview)?;
        }
        if let Some(acc) = &self.accessor {
            pad(out, indent + STEP)?;
            writeln!(out, "Accessor source:{} count:{} stride:{}", acc.source, acc.count, acc.stride)?;
        }
        Ok(())
    }
}

/// Dump an animation and its nested animations, depth first, without
/// recursing.
fn dump_animation(lib: &Library<Animation>, root: usize, out: &mut dyn Write, indent: usize) -> fmt::Result {
    let mut pending = vec![(root, indent)];
    while let Some((index, indent)) = pending.pop() {
        let Some(anim) = lib.get(index) else {
            continue;
        };
        pad(out, indent)?;
        writeln!(out, "Animation id:{} name:{}", opt(&anim.id), opt(&anim.name))?;
        let ind = indent + STEP;
        for source in &anim.sources {
            source.dump(out, ind)?;
        }
        for sampler in &anim.samplers {
            pad(out, ind)?;
            writeln!(out, "Sampler id:{}", opt(&sampler.id))?;
            for input in &sampler.inputs {
                pad(out, ind + STEP)?;
                writeln!(out, "Input semantic:{} source:{}", input.semantic, input.source)?;
            }
        }
        for channel in &anim.channels {
            pad(out, ind)?;
            writeln!(out, "Channel source:{} target:{}", channel.source, channel.target)?;
        }
        pending.extend(anim.children.iter().rev().map(|&child| (child, ind)));
    }
    Ok(())
}
