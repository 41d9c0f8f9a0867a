//! `<animation>` builder.
//!
//! Animations nest to any depth. Each one is pushed into the library arena
//! and registered when its start tag is read, so a parent always precedes
//! its nested animations and its index is known when sources and samplers
//! register. Nesting is followed with an explicit stack rather than
//! recursion; the walker's depth limit is the only bound.

use super::{asset, source, Context};
use crate::core::{Element, TokenSource};
use crate::dom::{Animation, Channel, Handle, Input, Library, Reference, Sampler};
use crate::util::Result;

pub(crate) fn animation<S: TokenSource>(
    ctx: &mut Context<'_, S>,
    lib: &mut Library<Animation>,
    el: &Element,
) -> Result<usize> {
    let root = open(ctx, lib, el);
    // Nested animations still open, innermost last.
    let mut open_stack: Vec<(usize, Element)> = Vec::new();

    loop {
        let (index, parent) = match open_stack.last() {
            Some((index, parent)) => (*index, parent),
            None => (root, el),
        };
        let Some(child) = ctx.next_child(parent)? else {
            if open_stack.pop().is_none() {
                break;
            }
            continue;
        };

        match child.name() {
            "animation" => {
                let nested = open(ctx, lib, &child);
                if let Some(anim) = lib.get_mut(index) {
                    anim.children.push(nested);
                }
                open_stack.push((nested, child));
            }
            "source" => {
                let slot = lib.get(index).map_or(0, |a| a.sources.len());
                let src = source::source(ctx, &child, index, slot)?;
                if let Some(anim) = lib.get_mut(index) {
                    anim.sources.push(src);
                }
            }
            "sampler" => {
                let slot = lib.get(index).map_or(0, |a| a.samplers.len());
                let built = sampler(ctx, &child, index, slot)?;
                if let Some(anim) = lib.get_mut(index) {
                    anim.samplers.push(built);
                }
            }
            "channel" => {
                let built = channel(ctx, &child)?;
                if let Some(anim) = lib.get_mut(index) {
                    anim.channels.push(built);
                }
            }
            "asset" => {
                asset::asset(ctx, &child)?;
            }
            "extra" => {
                let parent = open_stack.last().map_or(el, |(_, parent)| parent);
                ctx.unsupported(parent, &child)?
            }
            _ => {
                let parent = open_stack.last().map_or(el, |(_, parent)| parent);
                ctx.unknown(parent, &child)?
            }
        }
    }
    Ok(root)
}

/// Push an empty animation for `el` and register its id.
fn open<S: TokenSource>(ctx: &mut Context<'_, S>, lib: &mut Library<Animation>, el: &Element) -> usize {
    let id = el.attr_string("id");
    let index = lib.push(Animation {
        id: id.clone(),
        name: el.attr_string("name"),
        ..Animation::default()
    });
    ctx.register(id.as_deref(), Handle::Animation(index), el.name());
    index
}

fn sampler<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element, animation: usize, index: usize) -> Result<Sampler> {
    let mut sampler = Sampler {
        id: el.attr_string("id"),
        inputs: Vec::new(),
    };
    ctx.register(sampler.id.as_deref(), Handle::Sampler { animation, index }, el.name());
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "input" => sampler.inputs.push(input(ctx, &child)?),
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(sampler)
}

/// Decode an `<input>` and queue its source reference.
pub(crate) fn input<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Input> {
    let semantic = el.required("semantic")?.to_string();
    let url = el.required("source")?;
    ctx.reference(url, el.name(), "source");
    Ok(Input {
        semantic,
        source: Reference::new(url),
        offset: el.parse_attr("offset")?.unwrap_or(0),
        set: el.parse_attr("set")?,
    })
}

fn channel<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Channel> {
    let url = el.required("source")?;
    let target = el.required("target")?.to_string();
    ctx.reference(url, el.name(), "source");
    Ok(Channel {
        source: Reference::new(url),
        target,
    })
}
