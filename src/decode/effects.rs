//! `<effect>` builder, `profile_COMMON` only.

use glam::{Vec2, Vec3, Vec4};

use super::{asset, Context};
use crate::core::{Element, TokenSource};
use crate::dom::{
    ColorOrTexture, Effect, Handle, Library, NewParam, ParamValue, Reference, Sampler2D, Shading, Surface, Technique,
};
use crate::util::{color_from_slice, parse_list, parse_value, Error, Result};

pub(crate) fn effect<S: TokenSource>(ctx: &mut Context<'_, S>, lib: &mut Library<Effect>, el: &Element) -> Result<usize> {
    let mut effect = Effect {
        id: el.attr_string("id"),
        name: el.attr_string("name"),
        ..Effect::default()
    };
    // Registered before the children so document order decides duplicate ids
    let index = lib.push(Effect {
        id: effect.id.clone(),
        name: effect.name.clone(),
        ..Effect::default()
    });
    ctx.register(effect.id.as_deref(), Handle::Effect(index), el.name());

    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "profile_COMMON" => profile_common(ctx, &child, &mut effect)?,
            // Effect-scope parameters are visible to the common profile
            "newparam" => {
                if let Some(param) = newparam(ctx, &child)? {
                    effect.params.push(param);
                }
            }
            "asset" => {
                asset::asset(ctx, &child)?;
            }
            "profile_GLSL" | "profile_GLES" | "profile_GLES2" | "profile_CG" | "profile_BRIDGE" | "profile_CL"
            | "annotate" | "image" | "extra" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }

    if let Some(slot) = lib.get_mut(index) {
        *slot = effect;
    }
    Ok(index)
}

fn profile_common<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element, effect: &mut Effect) -> Result<()> {
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "newparam" => {
                if let Some(param) = newparam(ctx, &child)? {
                    effect.params.push(param);
                }
            }
            "technique" => effect.technique = Some(technique(ctx, &child)?),
            "asset" => {
                asset::asset(ctx, &child)?;
            }
            "image" | "extra" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(())
}

/// Decode a `<newparam>`. Parameter types that are not decoded yield `None`.
fn newparam<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Option<NewParam>> {
    let sid = el.required("sid")?.to_string();
    let mut value = None;

    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "surface" => value = Some(ParamValue::Surface(surface(ctx, &child)?)),
            "sampler2D" => value = Some(ParamValue::Sampler2D(sampler2d(ctx, &child)?)),
            "float" => value = Some(ParamValue::Float(parse_value("float", &child.text)?)),
            "float2" => value = Some(ParamValue::Float2(Vec2::from_array(fixed("float2", &child.text)?))),
            "float3" => value = Some(ParamValue::Float3(Vec3::from_array(fixed("float3", &child.text)?))),
            "float4" => value = Some(ParamValue::Float4(Vec4::from_array(fixed("float4", &child.text)?))),
            "semantic" | "modifier" | "annotate" => {}
            _ => ctx.unsupported(el, &child)?,
        }
    }
    Ok(value.map(|value| NewParam { sid, value }))
}

/// Parse exactly `N` floats.
fn fixed<const N: usize>(element: &str, text: &str) -> Result<[f32; N]> {
    let values: Vec<f32> = parse_list(element, text)?;
    values.try_into().map_err(|_| Error::invalid(element, text))
}

fn surface<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Surface> {
    let mut surface = Surface {
        kind: el.attr_string("type").unwrap_or_default(),
        ..Surface::default()
    };
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "init_from" => {
                if let Some(image) = child.text_opt() {
                    ctx.reference(&image, "surface", "init_from");
                    surface.init_from = Some(image);
                }
            }
            "format" => surface.format = child.text_opt(),
            "format_hint" | "size" | "viewport_ratio" | "mip_levels" | "mipmap_generate" | "extra" => {
                ctx.unsupported(el, &child)?
            }
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(surface)
}

fn sampler2d<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Sampler2D> {
    let mut sampler = Sampler2D::default();
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "source" => sampler.source = child.text_opt(),
            "instance_image" => {
                let url = child.required("url")?;
                ctx.reference(url, child.name(), "url");
                sampler.instance_image = Some(Reference::new(url));
            }
            "wrap_s" => sampler.wrap_s = child.text_opt(),
            "wrap_t" => sampler.wrap_t = child.text_opt(),
            "minfilter" => sampler.minfilter = child.text_opt(),
            "magfilter" => sampler.magfilter = child.text_opt(),
            "mipfilter" | "border_color" | "mipmap_maxlevel" | "mipmap_bias" | "max_anisotropy" => {}
            "extra" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }
    if sampler.source.is_none() && sampler.instance_image.is_none() {
        return Err(Error::missing(el.name(), "source"));
    }
    Ok(sampler)
}

fn technique<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Technique> {
    let mut technique = Technique {
        sid: el.attr_string("sid"),
        ..Technique::default()
    };
    while let Some(child) = ctx.next_child(el)? {
        if let Some(shading) = Shading::from_tag(child.name()) {
            technique.shading = shading;
            shading_model(ctx, &child, &mut technique)?;
            continue;
        }
        match child.name() {
            "asset" => {
                asset::asset(ctx, &child)?;
            }
            "extra" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(technique)
}

fn shading_model<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element, t: &mut Technique) -> Result<()> {
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "emission" => t.emission = color_or_texture(ctx, &child)?,
            "ambient" => t.ambient = color_or_texture(ctx, &child)?,
            "diffuse" => t.diffuse = color_or_texture(ctx, &child)?,
            "specular" => t.specular = color_or_texture(ctx, &child)?,
            "reflective" => t.reflective = color_or_texture(ctx, &child)?,
            "transparent" => t.transparent = color_or_texture(ctx, &child)?,
            "shininess" => t.shininess = float_or_param(ctx, &child)?,
            "reflectivity" => t.reflectivity = float_or_param(ctx, &child)?,
            "transparency" => t.transparency = float_or_param(ctx, &child)?,
            "index_of_refraction" => t.index_of_refraction = float_or_param(ctx, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(())
}

fn color_or_texture<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Option<ColorOrTexture>> {
    let mut value = None;
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "color" => {
                let components: Vec<f32> = parse_list("color", &child.text)?;
                value = Some(ColorOrTexture::Color(color_from_slice("color", &components)?));
            }
            "param" => value = Some(ColorOrTexture::Param(child.required("ref")?.to_string())),
            "texture" => {
                value = Some(ColorOrTexture::Texture {
                    texture: child.required("texture")?.to_string(),
                    texcoord: child.attr_string("texcoord"),
                })
            }
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(value)
}

fn float_or_param<S: TokenSource>(ctx: &mut Context<'_, S>, el: &Element) -> Result<Option<f32>> {
    let mut value = None;
    while let Some(child) = ctx.next_child(el)? {
        match child.name() {
            "float" => value = Some(parse_value("float", &child.text)?),
            "param" => ctx.unsupported(el, &child)?,
            _ => ctx.unknown(el, &child)?,
        }
    }
    Ok(value)
}
