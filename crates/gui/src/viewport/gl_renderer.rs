use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use glow::HasContext;

use shape_viewer_lib::scene::{Lighting, Material, RenderFrame, SceneRenderer};
use shape_viewer_lib::viewport::mesh::{LineMeshData, MeshData, LINE_STRIDE, MESH_STRIDE};

// ── GPU handles ──────────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

/// Scene mesh handle returned to the host
#[derive(Debug)]
pub struct GlMesh {
    id: u64,
    material: Material,
}

/// Line buffer handle returned to the host
#[derive(Debug)]
pub struct GlLines {
    id: u64,
}

/// GPU objects shared between the upload side (UI thread, during update)
/// and the paint callback
#[derive(Default)]
struct GpuStore {
    mesh_program: Option<glow::Program>,
    line_program: Option<glow::Program>,
    meshes: HashMap<u64, GpuMesh>,
    lines: HashMap<u64, GpuLines>,
}

/// Everything the paint callback needs for one frame
#[derive(Clone)]
pub struct FrameDraw {
    view_projection: glam::Mat4,
    lighting: Lighting,
    background: [u8; 3],
    meshes: Vec<(u64, Material)>,
    lines: Vec<u64>,
}

// ── Scene renderer ───────────────────────────────────────────

/// OpenGL [`SceneRenderer`]. Uploads happen immediately through the shared
/// glow context; drawing is deferred to an egui paint callback.
pub struct GlSceneRenderer {
    gl: Arc<glow::Context>,
    store: Arc<Mutex<GpuStore>>,
    next_id: u64,
    size: egui::Vec2,
    pending: Option<FrameDraw>,
    detached: bool,
}

impl GlSceneRenderer {
    pub fn new(gl: Arc<glow::Context>) -> Self {
        let store = GpuStore {
            mesh_program: compile_program(&gl, MESH_VERT, MESH_FRAG),
            line_program: compile_program(&gl, LINE_VERT, LINE_FRAG),
            ..GpuStore::default()
        };
        Self {
            gl,
            store: Arc::new(Mutex::new(store)),
            next_id: 0,
            size: egui::Vec2::ZERO,
            pending: None,
            detached: false,
        }
    }

    /// Queue the last rendered frame as a paint callback covering `rect`
    pub fn paint_into(&mut self, painter: &egui::Painter, rect: egui::Rect) {
        let Some(frame) = self.pending.take() else {
            return;
        };
        if self.detached || self.size.x <= 0.0 || self.size.y <= 0.0 {
            return;
        }
        let store = self.store.clone();
        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px,
                    clip.from_bottom_px,
                    clip.width_px,
                    clip.height_px,
                ];
                if let Ok(store) = store.lock() {
                    store.paint(painter.gl(), viewport, &frame);
                }
            })),
        };
        painter.add(callback);
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl SceneRenderer for GlSceneRenderer {
    type Mesh = GlMesh;
    type Lines = GlLines;

    fn upload_mesh(&mut self, data: &MeshData, material: Material) -> GlMesh {
        let id = self.next();
        match upload_mesh(&self.gl, data) {
            Ok(gpu) => {
                if let Ok(mut store) = self.store.lock() {
                    store.meshes.insert(id, gpu);
                }
            }
            Err(e) => tracing::error!("Mesh upload failed: {e}"),
        }
        GlMesh { id, material }
    }

    fn upload_lines(&mut self, data: &LineMeshData) -> GlLines {
        let id = self.next();
        match upload_lines(&self.gl, data) {
            Ok(gpu) => {
                if let Ok(mut store) = self.store.lock() {
                    store.lines.insert(id, gpu);
                }
            }
            Err(e) => tracing::error!("Line upload failed: {e}"),
        }
        GlLines { id }
    }

    fn release_mesh(&mut self, mesh: GlMesh) {
        let Ok(mut store) = self.store.lock() else {
            return;
        };
        if let Some(gpu) = store.meshes.remove(&mesh.id) {
            delete_mesh(&self.gl, &gpu);
        }
    }

    fn release_lines(&mut self, lines: GlLines) {
        let Ok(mut store) = self.store.lock() else {
            return;
        };
        if let Some(gpu) = store.lines.remove(&lines.id) {
            delete_lines(&self.gl, &gpu);
        }
    }

    fn set_size(&mut self, size: egui::Vec2) {
        self.size = size;
    }

    fn render(&mut self, frame: &RenderFrame<'_, GlMesh, GlLines>) {
        self.pending = Some(FrameDraw {
            view_projection: frame.camera.view_projection(frame.aspect),
            lighting: *frame.lighting,
            background: frame.background,
            meshes: frame.meshes.iter().map(|m| (m.id, m.material)).collect(),
            lines: frame.lines.iter().map(|l| l.id).collect(),
        });
    }

    fn dispose(&mut self) {
        let Ok(mut store) = self.store.lock() else {
            return;
        };
        if !store.meshes.is_empty() || !store.lines.is_empty() {
            tracing::warn!(
                "Disposing renderer with {} mesh(es) and {} line buffer(s) still live",
                store.meshes.len(),
                store.lines.len()
            );
        }
        for (_, mesh) in store.meshes.drain() {
            delete_mesh(&self.gl, &mesh);
        }
        for (_, lines) in store.lines.drain() {
            delete_lines(&self.gl, &lines);
        }
        unsafe {
            if let Some(program) = store.mesh_program.take() {
                self.gl.delete_program(program);
            }
            if let Some(program) = store.line_program.take() {
                self.gl.delete_program(program);
            }
        }
        tracing::debug!("GL renderer disposed");
    }

    fn detach(&mut self) {
        self.detached = true;
        self.pending = None;
    }
}

impl GpuStore {
    fn paint(&self, gl: &glow::Context, viewport: [i32; 4], frame: &FrameDraw) {
        let (Some(mesh_program), Some(line_program)) = (self.mesh_program, self.line_program)
        else {
            return;
        };
        let vp = &frame.view_projection;
        let [x, y, w, h] = viewport;

        unsafe {
            gl.viewport(x, y, w, h);
            gl.scissor(x, y, w, h);
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(
                frame.background[0] as f32 / 255.0,
                frame.background[1] as f32 / 255.0,
                frame.background[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LEQUAL);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            // Surfaces
            gl.use_program(Some(mesh_program));
            set_uniform_mat4(gl, mesh_program, "u_mvp", vp);
            let lighting = &frame.lighting;
            set_uniform_vec3(gl, mesh_program, "u_key_dir", &lighting.key.direction);
            set_uniform_f32(gl, mesh_program, "u_key_intensity", lighting.key.intensity);
            set_uniform_vec3(gl, mesh_program, "u_fill_dir", &lighting.fill.direction);
            set_uniform_f32(gl, mesh_program, "u_fill_intensity", lighting.fill.intensity);
            set_uniform_f32(gl, mesh_program, "u_ambient", lighting.ambient);

            for (id, material) in &frame.meshes {
                let Some(mesh) = self.meshes.get(id) else {
                    continue;
                };
                let double_sided = if material.double_sided { 1.0 } else { 0.0 };
                set_uniform_f32(gl, mesh_program, "u_double_sided", double_sided);
                set_uniform_f32(gl, mesh_program, "u_opacity", material.opacity);
                draw_mesh(gl, mesh);
            }

            // Grid, outlines, dimension lines
            gl.use_program(Some(line_program));
            set_uniform_mat4(gl, line_program, "u_mvp", vp);
            for id in &frame.lines {
                if let Some(lines) = self.lines.get(id) {
                    draw_lines(gl, lines);
                }
            }

            gl.disable(glow::BLEND);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (MESH_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> Result<GpuLines, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (LINE_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        Ok(GpuLines {
            vao,
            vbo,
            vertex_count: data.vertex_count() as i32,
        })
    }
}

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_lines(gl: &glow::Context, lines: &GpuLines) {
    unsafe {
        gl.delete_vertex_array(lines.vao);
        gl.delete_buffer(lines.vbo);
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Option<glow::Program> {
    unsafe {
        let program = match gl.create_program() {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Failed to create GL program: {e}");
                return None;
            }
        };

        let mut shaders = Vec::new();
        for (kind, src, name) in [
            (glow::VERTEX_SHADER, vert_src, "Vertex"),
            (glow::FRAGMENT_SHADER, frag_src, "Fragment"),
        ] {
            let shader = match gl.create_shader(kind) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("Failed to create {name} shader: {e}");
                    gl.delete_program(program);
                    return None;
                }
            };
            gl.shader_source(shader, src);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                tracing::error!("{name} shader error: {log}");
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
        }

        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        Some(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_normal = a_normal;
    v_color = a_color;
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_key_dir;
uniform float u_key_intensity;
uniform vec3 u_fill_dir;
uniform float u_fill_intensity;
uniform float u_ambient;
uniform float u_double_sided;
uniform float u_opacity;

in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    if (u_double_sided > 0.5 && !gl_FrontFacing) {
        n = -n;
    }
    float diffuse = max(dot(n, u_key_dir), 0.0) * u_key_intensity
                  + max(dot(n, u_fill_dir), 0.0) * u_fill_intensity;
    float light = min(u_ambient + diffuse, 1.0);
    frag_color = vec4(v_color * light, u_opacity);
}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;
