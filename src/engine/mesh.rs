// Mesh types and height-field tessellation.
//
//   HeightField → build_terrain_mesh() → TerrainMesh → GPU
//
// Terrain quads do not share vertices: every quad gets four fresh vertices
// carrying its own flat face normal (faceted shading).

use glam::{Vec2, Vec3};

use super::error::WorldError;
use super::heightfield::HeightField;

// ============================================================================
// GPU VERTEX
// ============================================================================

/// GPU-ready vertex.
///   @location(0) position: vec3<f32>
///   @location(1) normal:   vec3<f32>
///   @location(2) uv:       vec2<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal:   [f32; 3],
    pub uv:       [f32; 2],
}

impl GpuVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal:   normal.to_array(),
            uv:       uv.to_array(),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

// ============================================================================
// MESH
// ============================================================================

/// Indexed triangle list. Built once and never mutated; rebuilding terrain
/// replaces the whole mesh.
#[derive(Clone, Debug, Default)]
pub struct TerrainMesh {
    pub vertices: Vec<GpuVertex>,
    pub indices:  Vec<u32>,
}

impl TerrainMesh {
    /// Cast vertex slice to raw bytes for wgpu buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Cast index slice to raw bytes for wgpu buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize  { self.indices.len() }
    pub fn vertex_count(&self) -> usize { self.vertices.len() }
    pub fn quad_count(&self) -> usize   { self.vertices.len() / 4 }

    /// Append one quad given its corners in p0..p3 order.
    /// Triangles are (0, 1, 2) and (0, 2, 3).
    fn push_quad(&mut self, corners: [GpuVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

// ============================================================================
// TERRAIN TESSELLATION
// ============================================================================

/// Scale factors applied while turning samples into world-space geometry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TessellationParams {
    /// Samples per quad side.
    pub step: u32,
    /// World units per sample along X and Z.
    pub world_scale: f32,
    /// World units per unit of normalized height.
    pub height_scale: f32,
    /// World Y of a zero sample.
    pub base_height: f32,
    /// How many times the texture repeats across the whole field.
    pub tile_factor: f32,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            step: 2,
            world_scale: 0.2,
            height_scale: 4.0,
            base_height: 0.0,
            tile_factor: 15.0,
        }
    }
}

/// Tessellate a height field into one quad per `step x step` block.
///
/// Algorithm:
///   1. Walk the samples in strides of `step` on both axes; each stride is a quad.
///   2. Place the four corners in world space, centered on the origin in XZ.
///   3. One flat normal per quad from `(p2 - p0) x (p1 - p0)`.
///   4. UVs are the sample's fractional position times `tile_factor`, so the
///      texture repeats instead of stretching.
///
/// Output: `4 * quads` vertices, `6 * quads` indices.
pub fn build_terrain_mesh(
    field: &HeightField,
    params: &TessellationParams,
) -> Result<TerrainMesh, WorldError> {
    let (cols, rows) = (field.width(), field.height());
    let step = params.step;
    if step < 1 || step >= cols.min(rows) {
        return Err(WorldError::InvalidStep { step, width: cols, height: rows });
    }

    let x_offset = -(cols as f32) * params.world_scale * 0.5;
    let z_offset = -(rows as f32) * params.world_scale * 0.5;

    let corner = |x: u32, z: u32| -> (Vec3, Vec2) {
        let position = Vec3::new(
            x as f32 * params.world_scale + x_offset,
            params.base_height + field.sample(x, z) * params.height_scale,
            z as f32 * params.world_scale + z_offset,
        );
        let uv = Vec2::new(
            x as f32 / cols as f32 * params.tile_factor,
            z as f32 / rows as f32 * params.tile_factor,
        );
        (position, uv)
    };

    let quads_x = (cols - 1).div_ceil(step) as usize;
    let quads_z = (rows - 1).div_ceil(step) as usize;
    let mut mesh = TerrainMesh {
        vertices: Vec::with_capacity(quads_x * quads_z * 4),
        indices:  Vec::with_capacity(quads_x * quads_z * 6),
    };

    for z in (0..rows - step).step_by(step as usize) {
        for x in (0..cols - step).step_by(step as usize) {
            let (p0, t0) = corner(x, z);
            let (p1, t1) = corner(x + step, z);
            let (p2, t2) = corner(x + step, z + step);
            let (p3, t3) = corner(x, z + step);

            let normal = (p2 - p0).cross(p1 - p0).normalize_or_zero();

            mesh.push_quad([
                GpuVertex::new(p0, normal, t0),
                GpuVertex::new(p1, normal, t1),
                GpuVertex::new(p2, normal, t2),
                GpuVertex::new(p3, normal, t3),
            ]);
        }
    }

    log::info!(
        "terrain mesh: {} quads, {} vertices, {} indices (step {step})",
        mesh.quad_count(),
        mesh.vertex_count(),
        mesh.index_count()
    );
    Ok(mesh)
}

// ============================================================================
// CUBE
// ============================================================================

/// Unit cube centered on the origin, four vertices per face so each face has
/// its own normal. Used for maze walls and scene objects.
pub fn unit_cube() -> TerrainMesh {
    // (normal, u axis, v axis) per face; corners are normal ± u ± v, halved.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z,     Vec3::X,     Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X,     Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z,     Vec3::Y),
        (Vec3::Y,     Vec3::X,     Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X,     Vec3::Z),
    ];

    let mut mesh = TerrainMesh::default();
    for (n, u, v) in FACES {
        let at = |su: f32, sv: f32, uv: Vec2| GpuVertex::new((n + u * su + v * sv) * 0.5, n, uv);
        // CCW seen from outside: (-u,-v) (+u,-v) (+u,+v) (-u,+v), pushed so
        // that push_quad's (0,1,2)(0,2,3) keeps that order.
        mesh.push_quad([
            at(-1.0, -1.0, Vec2::new(0.0, 1.0)),
            at( 1.0, -1.0, Vec2::new(1.0, 1.0)),
            at( 1.0,  1.0, Vec2::new(1.0, 0.0)),
            at(-1.0,  1.0, Vec2::new(0.0, 0.0)),
        ]);
    }
    mesh
}

// ============================================================================
// TESTS
// ============================================================================
