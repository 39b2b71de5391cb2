//! WebGL2 backend: program setup, per-cube buffers and the draw calls

use dice_core::shader::{self, attributes, uniforms};
use dice_core::{CubeEntity, LightUniforms, RenderBackend};
use nalgebra::Matrix4;
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

use crate::error::{Result, WebError};

/// Compile a shader from source code
pub fn compile_shader(gl: &Gl, shader_type: u32, source: &str) -> Result<WebGlShader> {
    let stage = if shader_type == Gl::VERTEX_SHADER {
        "vertex"
    } else {
        "fragment"
    };
    let shader = gl
        .create_shader(shader_type)
        .ok_or(WebError::Allocation("shader"))?;

    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !compiled {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(WebError::ShaderCompile { stage, log });
    }

    Ok(shader)
}

/// Create and link a shader program from vertex and fragment shader sources
pub fn create_program(gl: &Gl, vertex_src: &str, fragment_src: &str) -> Result<WebGlProgram> {
    let vertex_shader = compile_shader(gl, Gl::VERTEX_SHADER, vertex_src)?;
    let fragment_shader = compile_shader(gl, Gl::FRAGMENT_SHADER, fragment_src)?;
    let program = gl.create_program().ok_or(WebError::Allocation("program"))?;

    gl.attach_shader(&program, &vertex_shader);
    gl.attach_shader(&program, &fragment_shader);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !linked {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        return Err(WebError::ProgramLink(log));
    }

    gl.detach_shader(&program, &vertex_shader);
    gl.detach_shader(&program, &fragment_shader);
    gl.delete_shader(Some(&vertex_shader));
    gl.delete_shader(Some(&fragment_shader));

    Ok(program)
}

fn attribute(gl: &Gl, program: &WebGlProgram, name: &'static str) -> Result<u32> {
    u32::try_from(gl.get_attrib_location(program, name)).map_err(|_| WebError::MissingAttribute(name))
}

/// Uniform locations; `None` for uniforms the driver optimized out
struct UniformLocations {
    projection: Option<WebGlUniformLocation>,
    model_view: Option<WebGlUniformLocation>,
    light_power: Option<WebGlUniformLocation>,
    light_direction: Option<WebGlUniformLocation>,
    damping_function: Option<WebGlUniformLocation>,
    view_position: Option<WebGlUniformLocation>,
    light_model: Option<WebGlUniformLocation>,
    shading: Option<WebGlUniformLocation>,
    light_shininess: Option<WebGlUniformLocation>,
}

impl UniformLocations {
    fn lookup(gl: &Gl, program: &WebGlProgram) -> Self {
        Self {
            projection: gl.get_uniform_location(program, uniforms::PROJECTION_MATRIX),
            model_view: gl.get_uniform_location(program, uniforms::MODEL_VIEW_MATRIX),
            light_power: gl.get_uniform_location(program, uniforms::LIGHT_POWER),
            light_direction: gl.get_uniform_location(program, uniforms::LIGHT_DIRECTION),
            damping_function: gl.get_uniform_location(program, uniforms::DAMPING_FUNCTION),
            view_position: gl.get_uniform_location(program, uniforms::VIEW_POSITION),
            light_model: gl.get_uniform_location(program, uniforms::LIGHT_MODEL),
            shading: gl.get_uniform_location(program, uniforms::SHADING),
            light_shininess: gl.get_uniform_location(program, uniforms::LIGHT_SHININESS),
        }
    }
}

struct CubeBuffers {
    positions: WebGlBuffer,
    normals: WebGlBuffer,
    indices: WebGlBuffer,
    index_count: i32,
}

fn upload(gl: &Gl, target: u32, bytes: &[u8]) -> Result<WebGlBuffer> {
    let buffer = gl.create_buffer().ok_or(WebError::Allocation("buffer"))?;
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data_with_u8_array(target, bytes, Gl::STATIC_DRAW);
    Ok(buffer)
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn u16_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Draws the dice with the shared lighting program
///
/// Buffers are uploaded once in scene order, and `draw_cube` must be called
/// in that same order every frame.
pub struct WebGlBackend {
    gl: Gl,
    program: WebGlProgram,
    position_attribute: u32,
    color_attribute: u32,
    normal_attribute: u32,
    uniforms: UniformLocations,
    cubes: Vec<CubeBuffers>,
    next_cube: usize,
    viewport: (i32, i32),
}

impl WebGlBackend {
    /// Build the program and upload every cube's geometry
    ///
    /// A compile or link failure is fatal: the scene must not start.
    pub fn new(gl: Gl, cubes: &[CubeEntity]) -> Result<Self> {
        let program = create_program(
            &gl,
            &shader::vertex_shader_source(),
            &shader::fragment_shader_source(),
        )?;

        let position_attribute = attribute(&gl, &program, attributes::POSITION)?;
        let color_attribute = attribute(&gl, &program, attributes::COLOR)?;
        let normal_attribute = attribute(&gl, &program, attributes::NORMAL)?;
        let uniforms = UniformLocations::lookup(&gl, &program);

        let cubes = cubes
            .iter()
            .map(|cube| -> Result<CubeBuffers> {
                Ok(CubeBuffers {
                    positions: upload(&gl, Gl::ARRAY_BUFFER, &f32_bytes(&cube.mesh.positions()))?,
                    normals: upload(&gl, Gl::ARRAY_BUFFER, &f32_bytes(&cube.mesh.normals()))?,
                    indices: upload(&gl, Gl::ELEMENT_ARRAY_BUFFER, &u16_bytes(&cube.mesh.indices))?,
                    index_count: cube.mesh.indices.len() as i32,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(cubes = cubes.len(), "uploaded cube buffers");

        Ok(Self {
            gl,
            program,
            position_attribute,
            color_attribute,
            normal_attribute,
            uniforms,
            cubes,
            next_cube: 0,
            viewport: (0, 0),
        })
    }

    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.viewport = (width, height);
    }

    fn bind_vertex_buffer(&self, buffer: &WebGlBuffer, attribute: u32) {
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        self.gl
            .vertex_attrib_pointer_with_i32(attribute, 3, Gl::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(attribute);
    }

    fn bind_light(&self, light: &LightUniforms) {
        let gl = &self.gl;
        let u = &self.uniforms;
        gl.uniform1f(u.light_power.as_ref(), light.light_power);
        gl.uniform3fv_with_f32_array(u.light_direction.as_ref(), &light.light_direction);
        gl.uniform1i(u.damping_function.as_ref(), light.damping_function);
        gl.uniform3fv_with_f32_array(u.view_position.as_ref(), &light.view_position);
        gl.uniform1i(u.light_model.as_ref(), light.light_model);
        gl.uniform1i(u.shading.as_ref(), light.shading);
        gl.uniform1f(u.light_shininess.as_ref(), light.light_shininess);
    }
}

impl RenderBackend for WebGlBackend {
    type Error = WebError;

    fn begin_frame(&mut self, projection: &Matrix4<f32>) -> Result<()> {
        let gl = &self.gl;
        gl.viewport(0, 0, self.viewport.0, self.viewport.1);
        gl.clear_color(1.0, 1.0, 1.0, 1.0);
        gl.clear_depth(1.0);
        gl.enable(Gl::DEPTH_TEST);
        gl.depth_func(Gl::LEQUAL);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(self.uniforms.projection.as_ref(), false, projection.as_slice());
        self.next_cube = 0;
        Ok(())
    }

    fn draw_cube(&mut self, cube: &CubeEntity, model_view: &Matrix4<f32>, light: &LightUniforms) -> Result<()> {
        let index = self.next_cube;
        let buffers = self.cubes.get(index).ok_or(WebError::UnknownCube(index))?;

        self.bind_vertex_buffer(&buffers.positions, self.position_attribute);
        self.bind_vertex_buffer(&buffers.normals, self.normal_attribute);

        // One color per cube, fed as a constant attribute
        let color = cube.color;
        self.gl.disable_vertex_attrib_array(self.color_attribute);
        self.gl
            .vertex_attrib4f(self.color_attribute, color.x, color.y, color.z, color.w);

        self.gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&buffers.indices));
        self.gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.model_view.as_ref(),
            false,
            model_view.as_slice(),
        );
        self.bind_light(light);

        self.gl
            .draw_elements_with_i32(Gl::TRIANGLES, buffers.index_count, Gl::UNSIGNED_SHORT, 0);
        self.next_cube += 1;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }
}
