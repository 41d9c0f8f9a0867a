//! `<material>` builder.

use super::{asset, Context};
use crate::core::{Element, TokenSource};
use crate::dom::{Handle, InstanceEffect, Library, Material, Reference, TechniqueHint};
use crate::util::Result;

pub(crate) fn material<S: TokenSource>(
    ctx: &mut Context<'_, S>,
    lib: &mut Library<Material>,
    el: &Element,
) -> Result<usize> {
    let material = Material {
        id: el.attr_string("id"),
        name: el.attr_string("name"),
        instance_effect: None,
    };
    let id = material.id.clone();
    let index = lib.push(material);
    ctx.register(id.as_deref(), Handle::Material(index), el.name());

    let mut instance = None;
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "instance_effect" => instance = Some(instance_effect(ctx, &child)?),
            "asset" => {
                asset::asset(ctx, &child)?;
            }
            "extra" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }

    if let Some(material) = lib.get_mut(index) {
        material.instance_effect = instance;
    }
    Ok(index)
}

fn instance_effect<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<InstanceEffect> {
    let url = el.required("url")?;
    ctx.reference(url, el.name(), "url");
    let mut ie = InstanceEffect {
        sid: el.attr_string("sid"),
        name: el.attr_string("name"),
        url: Reference::new(url),
        technique_hints: Vec::new(),
    };

    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "technique_hint" => ie.technique_hints.push(TechniqueHint {
                platform: child.attr_string("platform"),
                profile: child.attr_string("profile"),
                reference: child.required("ref")?.to_string(),
            }),
            "setparam" | "extra" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(ie)
}
