//! `<image>` builder.
//!
//! Accepts both layouts:
//! - 1.4: `<init_from>file.png</init_from>` or `<data>` hex bytes
//! - 1.5: `<init_from><ref>file.png</ref></init_from>` or `<init_from><hex>`

use super::{asset, Context};
use crate::core::{Element, TokenSource};
use crate::dom::{Handle, Image, ImageSource, Library};
use crate::util::{parse_hex, Result};

pub(crate) fn image<S: TokenSource>(ctx: &mut Context<'_, S>, lib: &mut Library<Image>, el: &Element) -> Result<usize> {
    let image = Image {
        id: el.attr_string("id"),
        name: el.attr_string("name"),
        format: el.attr_string("format"),
        width: el.parse_attr("width")?.unwrap_or(0),
        height: el.parse_attr("height")?.unwrap_or(0),
        depth: el.parse_attr("depth")?.unwrap_or(0),
        source: None,
    };
    let id = image.id.clone();
    let index = lib.push(image);
    ctx.register(id.as_deref(), Handle::Image(index), el.name());

    let mut source = None;
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "init_from" => source = init_from(ctx, &child)?,
            "data" => source = Some(ImageSource::Data(parse_hex("data", &child.text)?)),
            "asset" => {
                asset::asset(ctx, &child)?;
            }
            "create_2d" | "create_3d" | "create_cube" | "renderable" | "extra" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }

    if let Some(image) = lib.get_mut(index) {
        image.source = source;
    }
    Ok(index)
}

fn init_from<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Option<ImageSource>> {
    let mut source = el.text_opt().map(ImageSource::InitFrom);
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "ref" => source = child.text_opt().map(ImageSource::InitFrom),
            "hex" => source = Some(ImageSource::Data(parse_hex("hex", &child.text)?)),
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(source)
}
