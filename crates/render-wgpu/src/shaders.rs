/// WGSL shader for colored, tinted meshes.
///
/// `ObjectConstants` mirrors the per-object record field for field; the
/// vertex stage reads it from group 0, binding 0.
pub const SCENE_SHADER: &str = r#"
struct ObjectConstants {
    color_tint: vec4<f32>,
    world: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> object: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let wvp = object.projection * object.view * object.world;

    var out: VertexOutput;
    out.clip_position = wvp * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color * object.color_tint;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
