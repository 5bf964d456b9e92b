//! WGSL for both materials. Each fragment stage mirrors the matching
//! function in [`crate::shading`] by hand; a change to either side must be
//! made to both. The tests below pin the shared constants.

pub const LIT_VERTEX_ENTRY: &str = "vs_lit";
pub const LIT_FRAGMENT_ENTRY: &str = "fs_lit";
pub const GLOW_VERTEX_ENTRY: &str = "vs_glow";
pub const GLOW_FRAGMENT_ENTRY: &str = "fs_glow";

pub const SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    view_position: vec4<f32>,
    light_position: vec4<f32>,
    // x: time in seconds
    frame: vec4<f32>,
}

struct ObjectUniform {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    // rgb: base or glow colour, w: shininess
    color: vec4<f32>,
    // lit:  x ambient intensity, y specular tint (0 white, 1 base colour)
    // glow: x ambient light, y metalness, z roughness
    params: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var<uniform> object: ObjectUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct LitVarying {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct GlowVarying {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) view_dir: vec3<f32>,
    @location(2) intensity: f32,
}

fn safe_normalize(v: vec3<f32>) -> vec3<f32> {
    let len_sq = dot(v, v);
    if (len_sq <= 0.0) {
        return vec3<f32>(0.0);
    }
    return v * inverseSqrt(len_sq);
}

fn world_normal(normal: vec3<f32>) -> vec3<f32> {
    let normal_matrix = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    );
    return safe_normalize(normal_matrix * normal);
}

@vertex
fn vs_lit(input: VertexInput) -> LitVarying {
    var out: LitVarying;
    let world = object.model * vec4<f32>(input.position, 1.0);
    out.clip_position = globals.view_proj * world;
    out.world_position = world.xyz;
    out.normal = world_normal(input.normal);
    return out;
}

@fragment
fn fs_lit(input: LitVarying) -> @location(0) vec4<f32> {
    let base_color = object.color.rgb;
    let shininess = object.color.w;
    let ambient_intensity = object.params.x;
    let tint = mix(vec3<f32>(1.0), base_color, vec3<f32>(object.params.y));

    let normal = safe_normalize(input.normal);
    let light_dir = safe_normalize(globals.light_position.xyz - input.world_position);
    let view_dir = safe_normalize(globals.view_position.xyz - input.world_position);
    let half_dir = safe_normalize(light_dir + view_dir);

    let ambient = base_color * ambient_intensity;
    let lambert = max(dot(normal, light_dir), 0.0);
    let diffuse = lambert * base_color;
    var specular = vec3<f32>(0.0);
    if (lambert > 0.0) {
        specular = pow(max(dot(normal, half_dir), 0.0), shininess) * tint;
    }

    return vec4<f32>(ambient + diffuse + specular, 1.0);
}

@vertex
fn vs_glow(input: VertexInput) -> GlowVarying {
    var out: GlowVarying;
    let world = object.model * vec4<f32>(input.position, 1.0);
    out.clip_position = globals.view_proj * world;
    let normal = world_normal(input.normal);
    out.normal = normal;
    out.view_dir = safe_normalize(globals.view_position.xyz - world.xyz);
    // The camera position doubles as the view vector here.
    out.intensity = pow(1.0 - dot(normal, safe_normalize(globals.view_position.xyz)), 3.0);
    return out;
}

@fragment
fn fs_glow(input: GlowVarying) -> @location(0) vec4<f32> {
    let glow_color = object.color.rgb;
    let ambient_light = object.params.x;
    let metalness = object.params.y;
    let roughness = object.params.z;

    let normal = safe_normalize(input.normal);
    let view_dir = safe_normalize(input.view_dir);
    let pulse = 1.0 + 0.5 * sin(globals.frame.x * 2.0);
    let fresnel = pow(1.0 - max(dot(normal, view_dir), 0.0), 3.0);
    let reflection = reflect(-view_dir, normal);
    let spec_intensity = pow(max(dot(reflection, view_dir), 0.0), 16.0);
    let metal_color = mix(glow_color, vec3<f32>(1.0), vec3<f32>(metalness));

    let specular = metal_color * spec_intensity * (1.0 - roughness) * 2.0;
    let glow = metal_color * input.intensity * pulse * 3.0;
    let color = glow + specular + fresnel * metal_color * 0.8 + ambient_light * metal_color;
    return vec4<f32>(color, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse() -> naga::Module {
        naga::front::wgsl::parse_str(SHADER).expect("shader should parse")
    }

    #[test]
    fn shader_validates() {
        let module = parse();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("shader should validate");
    }

    fn assert_shader_contains(fragment: &str) {
        assert!(SHADER.contains(fragment), "shader lost `{fragment}`");
    }

    #[test]
    fn glow_constants_match_cpu_model() {
        use crate::shading::GLOW_SPECULAR_POWER;

        assert_shader_contains(&format!(
            "pow(max(dot(reflection, view_dir), 0.0), {GLOW_SPECULAR_POWER}.0)"
        ));
        assert_shader_contains("1.0 + 0.5 * sin(globals.frame.x * 2.0)");
        assert_shader_contains("pow(1.0 - max(dot(normal, view_dir), 0.0), 3.0)");
        assert_shader_contains("metal_color * spec_intensity * (1.0 - roughness) * 2.0");
        assert_shader_contains("metal_color * input.intensity * pulse * 3.0");
        assert_shader_contains("fresnel * metal_color * 0.8");
    }

    #[test]
    fn lit_stage_drops_highlight_on_unlit_side() {
        assert_shader_contains("if (lambert > 0.0)");
        assert_shader_contains("pow(max(dot(normal, half_dir), 0.0), shininess) * tint");
    }

    #[test]
    fn exposes_both_pipelines_entry_points() {
        let module = parse();
        let names: Vec<&str> = module
            .entry_points
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        for expected in [
            LIT_VERTEX_ENTRY,
            LIT_FRAGMENT_ENTRY,
            GLOW_VERTEX_ENTRY,
            GLOW_FRAGMENT_ENTRY,
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }
}
