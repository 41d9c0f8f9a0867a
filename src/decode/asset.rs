//! `<asset>` builder.

use super::Context;
use crate::core::{Element, TokenSource};
use crate::dom::{Asset, Contributor, Unit, UpAxis};
use crate::util::{Error, Result};

pub(crate) fn asset<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Asset> {
    let mut asset = Asset::default();
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "contributor" => asset.contributors.push(contributor(ctx, &child)?),
            "created" => asset.created = child.text_opt(),
            "modified" => asset.modified = child.text_opt(),
            "keywords" => asset.keywords = child.text_opt(),
            "revision" => asset.revision = child.text_opt(),
            "subject" => asset.subject = child.text_opt(),
            "title" => asset.title = child.text_opt(),
            "unit" => {
                let defaults = Unit::default();
                asset.unit = Unit {
                    name: child.attr_string("name").unwrap_or(defaults.name),
                    meter: child.parse_attr("meter")?.unwrap_or(defaults.meter),
                };
            }
            "up_axis" => {
                asset.up_axis = UpAxis::parse(&child.text).ok_or_else(|| Error::invalid("up_axis", child.text.as_str()))?;
            }
            "coverage" | "extra" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(asset)
}

fn contributor<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Contributor> {
    let mut c = Contributor::default();
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "author" => c.author = child.text_opt(),
            "authoring_tool" => c.authoring_tool = child.text_opt(),
            "comments" => c.comments = child.text_opt(),
            "copyright" => c.copyright = child.text_opt(),
            "source_data" => c.source_data = child.text_opt(),
            // 1.5 additions
            "author_email" | "author_website" => {}
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(c)
}
