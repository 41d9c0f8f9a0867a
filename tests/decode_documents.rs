//! Integration tests for decoding COLLADA documents from text.

use collada::core::{CancelToken, DecodeOptions, DiagnosticKind, Walker, XmlCursor, DEFAULT_MAX_DEPTH};
use collada::decode::{decode, decode_json, decode_with, Decoder};
use collada::dom::{Handle, LibraryKind, Shading};
use collada::Error;

const FIXTURE: &str = include_str!("data/textured_cube.dae");

#[test]
fn test_library_with_two_items() {
    let doc = decode(
        r##"<COLLADA>
              <library_materials id="L1">
                <material id="A"><instance_effect url="#A"/></material>
                <material id="B"><instance_effect url="#A"/></material>
              </library_materials>
            </COLLADA>"##,
    )
    .unwrap();

    let lib = doc.materials().unwrap();
    assert_eq!(lib.id.as_deref(), Some("L1"));
    let ids: Vec<_> = lib.iter().map(|m| m.id.as_deref().unwrap()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert!(doc.diagnostics().is_empty(), "{:?}", doc.diagnostics());
}

#[test]
fn test_unknown_element_and_self_reference() {
    let doc = decode(
        r##"<COLLADA>
              <library_materials>
                <material id="A">
                  <unknown_tag><deep/></unknown_tag>
                  <instance_effect url="#A"/>
                </material>
              </library_materials>
            </COLLADA>"##,
    )
    .unwrap();

    assert_eq!(doc.diagnostics().len(), 1);
    let warning = &doc.diagnostics()[0];
    assert_eq!(warning.kind, DiagnosticKind::UnknownElement);
    assert_eq!(warning.element, "material");
    assert_eq!(warning.tag, "unknown_tag");

    let material = doc.material(0).unwrap();
    let url = material.effect_url().unwrap();
    assert_eq!(doc.resolve(url.as_str()), Some(Handle::Material(0)));
    assert!(doc.unresolved().is_empty());
}

#[test]
fn test_truncated_input() {
    let err = decode(r#"<COLLADA><library_images><image id="a"><init_from>a.png</init_from>"#).unwrap_err();
    assert!(matches!(err.error, Error::UnexpectedEndOfInput { .. }), "{err}");
}

#[test]
fn test_item_count_matches_children() {
    let mut xml = String::from("<COLLADA><library_images>");
    for i in 0..25 {
        xml.push_str(&format!(r#"<image id="img{i}"><init_from>{i}.png</init_from></image>"#));
    }
    xml.push_str("</library_images></COLLADA>");

    let doc = decode(&xml).unwrap();
    assert_eq!(doc.library_len(LibraryKind::Images), 25);
    assert_eq!(doc.image_by_id("img24").unwrap().uri(), Some("24.png"));
}

/// `<skip>` nested `depth` levels deep.
fn nested(depth: usize) -> String {
    let mut s = String::new();
    for _ in 0..depth {
        s.push_str("<skip>");
    }
    for _ in 0..depth {
        s.push_str("</skip>");
    }
    s
}

#[test]
fn test_skipping_any_nesting_depth() {
    for depth in [0, 1, 5] {
        // 2 known children, 3 unknown subtrees interleaved
        let xml = format!(
            "<outer><box><k/><u1>{n}</u1><k/><u2>{n}</u2><u3>{n}</u3></box><after/></outer>",
            n = nested(depth)
        );
        let mut walker = Walker::new(XmlCursor::from_text(&xml));
        let outer = walker.root().unwrap();
        let container = walker.next_child(&outer).unwrap().unwrap();

        let mut calls = 0;
        while walker.next_child(&container).unwrap().is_some() {
            calls += 1;
        }
        assert_eq!(calls, 5, "depth {depth}");
        // Positioned right after </box>
        assert_eq!(walker.depth(), 1);
        assert_eq!(walker.next_child(&outer).unwrap().unwrap().name(), "after");
    }
}

#[test]
fn test_unknown_subtrees_in_document() {
    for depth in [0, 1, 5] {
        let xml = format!(
            r#"<COLLADA><library_images>
                 <image id="a"/><junk>{n}</junk><image id="b"/><more>{n}</more>
               </library_images></COLLADA>"#,
            n = nested(depth)
        );
        let doc = decode(&xml).unwrap();
        assert_eq!(doc.library_len(LibraryKind::Images), 2);
        let unknown = doc
            .diagnostics()
            .iter()
            .filter(|d| d.kind == DiagnosticKind::UnknownElement)
            .count();
        assert_eq!(unknown, 2);
    }
}

#[test]
fn test_resolution_is_order_independent() {
    let before = r##"<COLLADA>
        <library_effects><effect id="fx"/></library_effects>
        <library_materials><material id="m"><instance_effect url="#fx"/></material></library_materials>
      </COLLADA>"##;
    let after = r##"<COLLADA>
        <library_materials><material id="m"><instance_effect url="#fx"/></material></library_materials>
        <library_effects><effect id="fx"/></library_effects>
      </COLLADA>"##;
    // Same library: a material pointing at a later material
    let same_library = r##"<COLLADA>
        <library_materials>
          <material id="m"><instance_effect url="#fx"/></material>
          <material id="fx"/>
        </library_materials>
      </COLLADA>"##;

    for xml in [before, after] {
        let doc = decode(xml).unwrap();
        assert!(doc.unresolved().is_empty());
        let material = doc.material_by_id("m").unwrap();
        assert_eq!(doc.material_effect(material).unwrap().id.as_deref(), Some("fx"));
    }
    let doc = decode(same_library).unwrap();
    assert!(doc.unresolved().is_empty());
    assert_eq!(doc.resolve("#fx"), Some(Handle::Material(1)));
}

#[test]
fn test_duplicate_id_first_wins() {
    let doc = decode(
        r#"<COLLADA>
             <library_images><image id="dup"><init_from>first.png</init_from></image></library_images>
             <library_effects><effect id="dup"/></library_effects>
           </COLLADA>"#,
    )
    .unwrap();

    let dups: Vec<_> = doc
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::DuplicateId)
        .collect();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].tag, "dup");
    assert_eq!(doc.resolve("dup"), Some(Handle::Image(0)));
    assert_eq!(doc.image_by_id("#dup").unwrap().uri(), Some("first.png"));
    // The effect still exists, it is just not addressable by id
    assert_eq!(doc.library_len(LibraryKind::Effects), 1);
}

#[test]
fn test_nested_id_collides_with_parent() {
    let doc = decode(
        r#"<COLLADA><library_animations>
             <animation id="X">
               <source id="X"><float_array id="X" count="1">1</float_array></source>
               <animation id="Y"><sampler id="Y"/></animation>
             </animation>
           </library_animations></COLLADA>"#,
    )
    .unwrap();

    assert_eq!(doc.resolve("X"), Some(Handle::Animation(0)));
    assert_eq!(doc.resolve("Y"), Some(Handle::Animation(1)));
    let dups: Vec<_> = doc
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::DuplicateId)
        .map(|d| d.element.as_str())
        .collect();
    assert_eq!(dups, vec!["source", "float_array", "sampler"]);
}

#[test]
fn test_source_registered_before_its_array() {
    let doc = decode(
        r#"<COLLADA><library_animations><animation>
             <source id="S"><float_array id="S" count="1">1</float_array></source>
           </animation></library_animations></COLLADA>"#,
    )
    .unwrap();
    assert_eq!(doc.resolve("S"), Some(Handle::Source { animation: 0, index: 0 }));
    assert_eq!(doc.diagnostics().len(), 1);
    assert_eq!(doc.diagnostics()[0].element, "float_array");
}

#[test]
fn test_accessor_with_huge_offset() {
    let doc = decode(
        r##"<COLLADA><library_animations><animation>
             <source id="s">
               <float_array id="s-array" count="3">1 2 3</float_array>
               <technique_common>
                 <accessor source="#s-array" count="1" offset="18446744073709551614" stride="3"/>
               </technique_common>
             </source>
           </animation></library_animations></COLLADA>"##,
    )
    .unwrap();
    let source = &doc.animation(0).unwrap().sources[0];
    assert!(source.vec3s().is_empty());
}

#[test]
fn test_missing_library_id() {
    let options = DecodeOptions {
        require_library_ids: true,
        ..DecodeOptions::default()
    };
    let err = decode_with(
        r#"<COLLADA><library_materials><material id="A"/></library_materials></COLLADA>"#,
        options,
    )
    .unwrap_err();
    assert!(matches!(
        err.error,
        Error::MissingRequiredAttribute { ref element, .. } if element == "library_materials"
    ));
}

#[test]
fn test_errors_carry_earlier_warnings() {
    let err = decode(
        r#"<COLLADA>
             <mystery/>
             <library_animations><animation><source/></animation></library_animations>
           </COLLADA>"#,
    )
    .unwrap_err();
    assert!(matches!(
        err.error,
        Error::MissingRequiredAttribute { ref element, ref attribute } if element == "source" && attribute == "id"
    ));
    assert_eq!(err.path, "COLLADA/library_animations/animation/source");
    assert_eq!(err.diagnostics.len(), 1);
    assert_eq!(err.diagnostics[0].tag, "mystery");
    assert!(err.to_string().contains("(at COLLADA/library_animations/animation/source)"));
}

#[test]
fn test_strict_mode_unresolved() {
    let xml = r##"<COLLADA>
        <library_materials><material id="m"><instance_effect url="#missing"/></material></library_materials>
      </COLLADA>"##;

    let lenient = decode(xml).unwrap();
    assert_eq!(lenient.unresolved().len(), 1);
    assert_eq!(lenient.unresolved()[0].element, "instance_effect");

    let err = decode_with(xml, DecodeOptions::strict()).unwrap_err();
    assert!(matches!(err.error, Error::UnresolvedReference { ref url, .. } if url == "#missing"));
    assert_eq!(err.diagnostics.len(), 1);
}

#[test]
fn test_external_url_never_resolves() {
    let doc = decode(
        r##"<COLLADA>
              <library_effects><effect id="fx"/></library_effects>
              <library_materials><material><instance_effect url="other.dae#fx"/></material></library_materials>
            </COLLADA>"##,
    )
    .unwrap();
    assert_eq!(doc.unresolved().len(), 1);
    assert!(doc.material(0).unwrap().effect_url().unwrap().is_external());
}

#[test]
fn test_duplicate_library_merges() {
    let doc = decode(
        r#"<COLLADA>
             <library_images id="first"><image id="a"/></library_images>
             <library_images id="second"><image id="b"/></library_images>
           </COLLADA>"#,
    )
    .unwrap();
    let lib = doc.images().unwrap();
    assert_eq!(lib.id.as_deref(), Some("first"));
    assert_eq!(lib.len(), 2);
    assert_eq!(lib.root_indices(), &[0, 1]);
    assert_eq!(doc.diagnostics().len(), 1);
    assert_eq!(doc.diagnostics()[0].kind, DiagnosticKind::DuplicateLibrary);
}

#[test]
fn test_count_mismatch_warning() {
    let doc = decode(
        r#"<COLLADA><library_animations><animation>
             <source id="s"><float_array id="s-array" count="4">1 2 3</float_array></source>
           </animation></library_animations></COLLADA>"#,
    )
    .unwrap();
    assert_eq!(doc.diagnostics().len(), 1);
    assert_eq!(doc.diagnostics()[0].kind, DiagnosticKind::CountMismatch);
    assert_eq!(doc.diagnostics()[0].tag, "s-array");
}

#[test]
fn test_depth_limit() {
    let mut xml = String::from(r#"<COLLADA><library_animations>"#);
    for _ in 0..20 {
        xml.push_str("<animation>");
    }
    for _ in 0..20 {
        xml.push_str("</animation>");
    }
    xml.push_str("</library_animations></COLLADA>");

    let ok = decode(&xml).unwrap();
    assert_eq!(ok.library_len(LibraryKind::Animations), 20);

    let options = DecodeOptions {
        max_depth: 10,
        ..DecodeOptions::default()
    };
    let err = decode_with(&xml, options).unwrap_err();
    assert!(matches!(err.error, Error::DepthLimitExceeded { limit: 10 }));
}

#[test]
fn test_nesting_near_default_limit_on_small_stack() {
    // COLLADA and library_animations take two levels
    let levels = DEFAULT_MAX_DEPTH - 2;
    let mut xml = String::from(r#"<COLLADA><library_animations>"#);
    for i in 0..levels {
        xml.push_str(&format!(r#"<animation id="a{i}">"#));
    }
    for _ in 0..levels {
        xml.push_str("</animation>");
    }
    xml.push_str("</library_animations></COLLADA>");

    let worker = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let doc = decode(&xml).unwrap();
            (doc.library_len(LibraryKind::Animations), doc.dump_string().lines().count())
        })
        .unwrap();
    let (animations, lines) = worker.join().unwrap();
    assert_eq!(animations, levels);
    // Header, library line, one line per animation
    assert_eq!(lines, levels + 2);

    let mut too_deep = String::from(r#"<COLLADA><library_animations>"#);
    too_deep.push_str(&"<animation>".repeat(levels + 1));
    too_deep.push_str(&"</animation>".repeat(levels + 1));
    too_deep.push_str("</library_animations></COLLADA>");
    let err = decode(&too_deep).unwrap_err();
    assert!(matches!(err.error, Error::DepthLimitExceeded { limit: DEFAULT_MAX_DEPTH }));
}

#[test]
fn test_cancelled_before_start() {
    let token = CancelToken::new();
    token.cancel();
    let err = Decoder::new(XmlCursor::from_text(FIXTURE)).with_cancel(token).decode().unwrap_err();
    assert!(matches!(err.error, Error::Cancelled));
}

#[test]
fn test_mismatched_end_tag_is_malformed() {
    let err = decode("<COLLADA><library_images></library_effects></COLLADA>").unwrap_err();
    assert!(err.error.is_structural());
}

#[test]
fn test_fixture_document() {
    let doc = decode(FIXTURE).unwrap();
    assert_eq!(doc.version(), Some("1.4.1"));

    let asset = doc.asset().unwrap();
    assert_eq!(asset.unit.meter, 0.01);
    assert_eq!(asset.contributors[0].authoring_tool.as_deref(), Some("Blender 2.79.0"));

    // Cameras, visual scenes and scene are reported, not decoded
    assert_eq!(doc.diagnostics().len(), 3);
    assert!(doc.diagnostics().iter().all(|d| d.kind == DiagnosticKind::Unsupported));
    assert!(doc.unresolved().is_empty());

    let crate_material = doc.material_by_id("Crate-material").unwrap();
    let effect = doc.material_effect(crate_material).unwrap();
    let technique = effect.technique.as_ref().unwrap();
    assert_eq!(technique.shading, Shading::Phong);
    let image = doc.effect_texture_image(effect, technique.diffuse.as_ref().unwrap()).unwrap();
    assert_eq!(image.uri(), Some("textures/crate.png"));

    let metal = doc.effect_by_id("Metal-effect").unwrap();
    assert_eq!(metal.technique.as_ref().unwrap().shading, Shading::Blinn);
    assert_eq!(metal.technique.as_ref().unwrap().reflectivity, Some(0.9));

    let anim = doc.animation_by_id("Crate_location_X").unwrap();
    let sampler = anim.sampler_for(&anim.channels[0]).unwrap();
    let output = anim.input_source(sampler.input("OUTPUT").unwrap()).unwrap();
    assert_eq!(output.floats(), Some(&[0.0, 3.5][..]));
    let interpolation = anim.input_source(sampler.input("INTERPOLATION").unwrap()).unwrap();
    assert_eq!(interpolation.names().unwrap(), &["BEZIER", "BEZIER"]);
}

#[test]
fn test_dump_lists_items() {
    let doc = decode(FIXTURE).unwrap();
    let dump = doc.dump_string();
    assert!(dump.starts_with("COLLADA version:1.4.1\n"));
    assert!(dump.contains("  LibraryMaterials id: name:\n"));
    assert!(dump.contains("    Material id:Crate-material name:Crate\n"));
    assert!(dump.contains("      InstanceEffect sid: name: url:#Crate-effect\n"));
    assert!(dump.contains("Channel source:#Crate_location_X-sampler target:Crate/location.X"));
}

#[test]
fn test_json_matches_xml() {
    let xml = decode(
        r##"<COLLADA version="1.4.1">
              <library_effects>
                <effect id="fx">
                  <profile_COMMON>
                    <technique sid="common">
                      <lambert><diffuse><color>1 0 0 1</color></diffuse></lambert>
                    </technique>
                  </profile_COMMON>
                </effect>
              </library_effects>
              <library_materials id="L1">
                <material id="A"><instance_effect url="#fx"/></material>
                <material id="B"><instance_effect url="#fx"/></material>
              </library_materials>
            </COLLADA>"##,
    )
    .unwrap();

    let json = decode_json(
        r##"{ "COLLADA": {
              "@version": "1.4.1",
              "library_effects": { "effect": { "@id": "fx", "profile_COMMON": {
                "technique": { "@sid": "common", "lambert": { "diffuse": { "color": "1 0 0 1" } } } } } },
              "library_materials": { "@id": "L1", "material": [
                { "@id": "A", "instance_effect": { "@url": "#fx" } },
                { "@id": "B", "instance_effect": { "@url": "#fx" } } ] }
            } }"##,
    )
    .unwrap();

    assert_eq!(json.version(), xml.version());
    assert_eq!(json.materials().unwrap().items(), xml.materials().unwrap().items());
    assert_eq!(json.effects().unwrap().items(), xml.effects().unwrap().items());
    assert_eq!(json.dump_string(), xml.dump_string());
    assert!(json.diagnostics().is_empty());
}
