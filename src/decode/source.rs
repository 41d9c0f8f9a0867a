//! `<source>` builder: typed data arrays and their accessor.

use super::{asset, Context};
use crate::core::{DiagnosticKind, Element, TokenSource};
use crate::dom::{Accessor, ArrayData, ArrayValues, Handle, Param, Reference, Source};
use crate::util::{parse_bools, parse_list, Result};

/// Decode a `<source>` that will be stored at `sources[index]` of the
/// animation at arena index `animation`.
pub(crate) fn source<S: TokenSource>(
    ctx: &mut Context<'_, S>,
    el: &Element,
    animation: usize,
    index: usize,
) -> Result<Source> {
    let mut source = Source {
        id: el.required("id")?.to_string(),
        name: el.attr_string("name"),
        array: None,
        accessor: None,
    };
    ctx.register(Some(source.id.as_str()), Handle::Source { animation, index }, el.name());

    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "float_array" | "int_array" | "bool_array" | "Name_array" | "IDREF_array" => {
                let data = array(ctx, &child)?;
                let handle = Handle::Array {
                    animation,
                    source: index,
                };
                ctx.register(data.id.as_deref(), handle, child.name());
                source.array = Some(data);
            }
            "technique_common" => source.accessor = technique_common(ctx, &child)?,
            "asset" => {
                asset::asset(ctx, &child)?;
            }
            "technique" | "SIDREF_array" | "token_array" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }

    Ok(source)
}

fn array<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<ArrayData> {
    let count: usize = el.parse_required("count")?;
    let tag = el.name();
    let values = match tag {
        "float_array" => ArrayValues::Float(parse_list(tag, &el.text)?),
        "int_array" => ArrayValues::Int(parse_list(tag, &el.text)?),
        "bool_array" => ArrayValues::Bool(parse_bools(tag, &el.text)?),
        "Name_array" => ArrayValues::Name(parse_list(tag, &el.text)?),
        _ => ArrayValues::IdRef(parse_list(tag, &el.text)?),
    };
    let data = ArrayData {
        id: el.attr_string("id"),
        name: el.attr_string("name"),
        count,
        values,
    };
    if data.values.len() != count {
        ctx.diags.warn(
            DiagnosticKind::CountMismatch,
            tag,
            data.id.as_deref().unwrap_or(""),
            format!("count is {count} but {} values are present", data.values.len()),
        );
    }
    Ok(data)
}

fn technique_common<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Option<Accessor>> {
    let mut accessor = None;
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "accessor" => accessor = Some(read_accessor(ctx, &child)?),
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(accessor)
}

fn read_accessor<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Accessor> {
    let url = el.required("source")?;
    ctx.reference(url, el.name(), "source");
    let mut accessor = Accessor {
        source: Reference::new(url),
        count: el.parse_required("count")?,
        offset: el.parse_attr("offset")?.unwrap_or(0),
        stride: el.parse_attr("stride")?.unwrap_or(1),
        params: Vec::new(),
    };

    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "param" => accessor.params.push(Param {
                name: child.attr_string("name"),
                sid: child.attr_string("sid"),
                kind: child.attr_string("type").unwrap_or_default(),
                semantic: child.attr_string("semantic"),
            }),
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(accessor)
}
