use crate::camera::Camera;
use crate::constants::COLOR_BACKGROUND;
use crate::draw::DrawEvent;
use crate::geometry::Rect;
use glam::Vec3;
use glow::*;
use std::mem;
use std::sync::Arc;

const VERTEX_SHADER_SRC: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;
layout (location = 1) in vec2 aInstancePos;
layout (location = 2) in vec2 aInstanceSize;
layout (location = 3) in vec3 aInstanceColor;

uniform mat4 uProjection;

out vec3 vColor;

void main() {
    vec2 worldPos = aInstancePos + aPos * aInstanceSize;
    gl_Position = uProjection * vec4(worldPos, 0.0, 1.0);
    vColor = aInstanceColor;
}
"#;

const FRAGMENT_SHADER_SRC: &str = r#"#version 330 core
in vec3 vColor;
out vec4 FragColor;

void main() {
    FragColor = vec4(vColor, 1.0);
}
"#;

const LINE_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;

uniform mat4 uProjection;

void main() {
    gl_Position = uProjection * vec4(aPos, 0.0, 1.0);
}
"#;

const LINE_FRAGMENT_SHADER: &str = r#"#version 330 core
uniform vec3 uColor;
out vec4 FragColor;

void main() {
    FragColor = vec4(uColor, 1.0);
}
"#;

pub struct Renderer {
    gl: Arc<glow::Context>,
    program: NativeProgram,
    vao: NativeVertexArray,
    vbo: NativeBuffer,
    instance_vbo: NativeBuffer,
    projection_loc: NativeUniformLocation,
    // Outline rendering
    line_program: NativeProgram,
    line_vao: NativeVertexArray,
    line_vbo: NativeBuffer,
    line_projection_loc: NativeUniformLocation,
    line_color_loc: NativeUniformLocation,
}

impl Renderer {
    pub fn new(gl: Arc<glow::Context>) -> Result<Self, String> {
        unsafe {
            // Compile shaders
            let vertex_shader = gl
                .create_shader(VERTEX_SHADER)
                .map_err(|e| format!("Failed to create vertex shader: {}", e))?;
            gl.shader_source(vertex_shader, VERTEX_SHADER_SRC);
            gl.compile_shader(vertex_shader);
            if !gl.get_shader_compile_status(vertex_shader) {
                return Err(gl.get_shader_info_log(vertex_shader));
            }

            let fragment_shader = gl
                .create_shader(FRAGMENT_SHADER)
                .map_err(|e| format!("Failed to create fragment shader: {}", e))?;
            gl.shader_source(fragment_shader, FRAGMENT_SHADER_SRC);
            gl.compile_shader(fragment_shader);
            if !gl.get_shader_compile_status(fragment_shader) {
                return Err(gl.get_shader_info_log(fragment_shader));
            }

            let program = gl
                .create_program()
                .map_err(|e| format!("Failed to create program: {}", e))?;
            gl.attach_shader(program, vertex_shader);
            gl.attach_shader(program, fragment_shader);
            gl.link_program(program);
            if !gl.get_program_link_status(program) {
                return Err(gl.get_program_info_log(program));
            }

            gl.delete_shader(vertex_shader);
            gl.delete_shader(fragment_shader);

            let projection_loc = gl
                .get_uniform_location(program, "uProjection")
                .ok_or("Failed to get projection uniform location")?;

            // Create quad vertices (0,0 to 1,1)
            let vertices: [f32; 12] = [
                0.0, 0.0, // top-left
                1.0, 0.0, // top-right
                1.0, 1.0, // bottom-right
                0.0, 0.0, // top-left
                1.0, 1.0, // bottom-right
                0.0, 1.0, // bottom-left
            ];

            let vao = gl
                .create_vertex_array()
                .map_err(|e| format!("Failed to create VAO: {}", e))?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl
                .create_buffer()
                .map_err(|e| format!("Failed to create VBO: {}", e))?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&vertices), STATIC_DRAW);

            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, 8, 0);

            // Create instance buffer
            let instance_vbo = gl
                .create_buffer()
                .map_err(|e| format!("Failed to create instance VBO: {}", e))?;
            gl.bind_buffer(ARRAY_BUFFER, Some(instance_vbo));

            // Position attribute (2 floats)
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, FLOAT, false, 28, 0);
            gl.vertex_attrib_divisor(1, 1);

            // Size attribute (2 floats)
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(2, 2, FLOAT, false, 28, 8);
            gl.vertex_attrib_divisor(2, 1);

            // Color attribute (3 floats)
            gl.enable_vertex_attrib_array(3);
            gl.vertex_attrib_pointer_f32(3, 3, FLOAT, false, 28, 16);
            gl.vertex_attrib_divisor(3, 1);

            gl.bind_vertex_array(None);

            // Create outline shader program
            let line_vertex_shader = gl
                .create_shader(VERTEX_SHADER)
                .map_err(|e| format!("Failed to create line vertex shader: {}", e))?;
            gl.shader_source(line_vertex_shader, LINE_VERTEX_SHADER);
            gl.compile_shader(line_vertex_shader);
            if !gl.get_shader_compile_status(line_vertex_shader) {
                return Err(gl.get_shader_info_log(line_vertex_shader));
            }

            let line_fragment_shader = gl
                .create_shader(FRAGMENT_SHADER)
                .map_err(|e| format!("Failed to create line fragment shader: {}", e))?;
            gl.shader_source(line_fragment_shader, LINE_FRAGMENT_SHADER);
            gl.compile_shader(line_fragment_shader);
            if !gl.get_shader_compile_status(line_fragment_shader) {
                return Err(gl.get_shader_info_log(line_fragment_shader));
            }

            let line_program = gl
                .create_program()
                .map_err(|e| format!("Failed to create line program: {}", e))?;
            gl.attach_shader(line_program, line_vertex_shader);
            gl.attach_shader(line_program, line_fragment_shader);
            gl.link_program(line_program);
            if !gl.get_program_link_status(line_program) {
                return Err(gl.get_program_info_log(line_program));
            }

            gl.delete_shader(line_vertex_shader);
            gl.delete_shader(line_fragment_shader);

            let line_projection_loc = gl
                .get_uniform_location(line_program, "uProjection")
                .ok_or("Failed to get line projection uniform location")?;
            let line_color_loc = gl
                .get_uniform_location(line_program, "uColor")
                .ok_or("Failed to get line color uniform location")?;

            // Create outline VAO and VBO
            let line_vao = gl
                .create_vertex_array()
                .map_err(|e| format!("Failed to create line VAO: {}", e))?;
            gl.bind_vertex_array(Some(line_vao));

            let line_vbo = gl
                .create_buffer()
                .map_err(|e| format!("Failed to create line VBO: {}", e))?;
            gl.bind_buffer(ARRAY_BUFFER, Some(line_vbo));

            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, 8, 0);

            gl.bind_vertex_array(None);

            gl.clear_color(COLOR_BACKGROUND.x, COLOR_BACKGROUND.y, COLOR_BACKGROUND.z, 1.0);

            gl.enable(BLEND);
            gl.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);

            Ok(Self {
                gl,
                program,
                vao,
                vbo,
                instance_vbo,
                projection_loc,
                line_program,
                line_vao,
                line_vbo,
                line_projection_loc,
                line_color_loc,
            })
        }
    }

    pub fn resize(&self, width: i32, height: i32) {
        unsafe {
            self.gl.viewport(0, 0, width, height);
        }
    }

    /// Draw filled rectangles as one instanced quad batch.
    pub fn render_cells(&self, camera: &Camera, events: &[DrawEvent]) {
        unsafe {
            self.gl.use_program(Some(self.program));
            self.gl.bind_vertex_array(Some(self.vao));

            // Position (2) + size (2) + color (3) = 7 floats per instance
            let mut instance_data = Vec::with_capacity(events.len() * 7);
            for event in events {
                if !event.filled {
                    continue;
                }
                instance_data.push(event.rect.x as f32);
                instance_data.push(event.rect.y as f32);
                instance_data.push(event.rect.width as f32);
                instance_data.push(event.rect.height as f32);
                instance_data.push(event.color.x);
                instance_data.push(event.color.y);
                instance_data.push(event.color.z);
            }

            if !instance_data.is_empty() {
                self.gl.bind_buffer(ARRAY_BUFFER, Some(self.instance_vbo));
                self.gl
                    .buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&instance_data), DYNAMIC_DRAW);

                let projection = camera.projection_matrix();
                self.gl.uniform_matrix_4_f32_slice(
                    Some(&self.projection_loc),
                    false,
                    projection.as_ref(),
                );

                let instance_count = instance_data.len() / 7;
                self.gl
                    .draw_arrays_instanced(TRIANGLES, 0, 6, instance_count as i32);
            }

            self.gl.bind_vertex_array(None);
        }
    }

    /// Draw rectangle borders as line segments in a single color.
    pub fn render_outlines(&self, camera: &Camera, rects: &[Rect], color: Vec3) {
        unsafe {
            self.gl.use_program(Some(self.line_program));
            self.gl.bind_vertex_array(Some(self.line_vao));

            let projection = camera.projection_matrix();
            self.gl.uniform_matrix_4_f32_slice(
                Some(&self.line_projection_loc),
                false,
                projection.as_ref(),
            );
            self.gl
                .uniform_3_f32(Some(&self.line_color_loc), color.x, color.y, color.z);

            // Four segments per rectangle
            let mut line_vertices = Vec::with_capacity(rects.len() * 16);
            for rect in rects {
                let x0 = rect.x as f32;
                let y0 = rect.y as f32;
                let x1 = rect.right() as f32;
                let y1 = rect.bottom() as f32;

                line_vertices.extend_from_slice(&[
                    x0, y0, x1, y0, // top
                    x1, y0, x1, y1, // right
                    x1, y1, x0, y1, // bottom
                    x0, y1, x0, y0, // left
                ]);
            }

            if !line_vertices.is_empty() {
                self.gl.bind_buffer(ARRAY_BUFFER, Some(self.line_vbo));
                self.gl
                    .buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&line_vertices), DYNAMIC_DRAW);

                self.gl
                    .draw_arrays(LINES, 0, (line_vertices.len() / 2) as i32);
            }

            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.program);
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.instance_vbo);
            self.gl.delete_program(self.line_program);
            self.gl.delete_vertex_array(self.line_vao);
            self.gl.delete_buffer(self.line_vbo);
        }
    }
}

fn as_u8_slice<T>(data: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(data.as_ptr() as *const u8, data.len() * mem::size_of::<T>())
    }
}
