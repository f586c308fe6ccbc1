//! Validate the particle shader with naga.

use emberglow::shader::{FS_ENTRY, PARTICLE_SHADER, VS_ENTRY};
use naga::valid::{Capabilities, ValidationFlags, Validator};

fn parse() -> naga::Module {
    match naga::front::wgsl::parse_str(PARTICLE_SHADER) {
        Ok(module) => module,
        Err(err) => panic!("{}", err.emit_to_string(PARTICLE_SHADER)),
    }
}

#[test]
fn test_particle_shader_validates() {
    let module = parse();
    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    if let Err(err) = validator.validate(&module) {
        panic!("Render shader error: {}", err);
    }
}

#[test]
fn test_entry_points_present() {
    let module = parse();
    let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&VS_ENTRY));
    assert!(names.contains(&FS_ENTRY));
}

#[test]
fn test_uniform_block_matches_rust_layout() {
    let module = parse();
    let (_, ty) = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("Uniforms"))
        .expect("Uniforms struct");
    match &ty.inner {
        naga::TypeInner::Struct { span, .. } => {
            assert_eq!(*span as usize, std::mem::size_of::<emberglow::ParticleUniforms>());
        }
        other => panic!("unexpected type {:?}", other),
    }
}

#[test]
fn test_age_wraps_below_one() {
    let module = parse();
    let (_, function) = module
        .functions
        .iter()
        .find(|(_, f)| f.name.as_deref() == Some("particle_age"))
        .expect("particle_age function");
    let has_fract = function.expressions.iter().any(|(_, e)| {
        matches!(e, naga::Expression::Math { fun: naga::MathFunction::Fract, .. })
    });
    let has_select = function
        .expressions
        .iter()
        .any(|(_, e)| matches!(e, naga::Expression::Select { .. }));
    // fract alone can return 1.0; the select folds it back to 0.0
    assert!(has_fract && has_select);
}
