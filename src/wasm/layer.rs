use js_sys::Float32Array;
use web_sys::{HtmlImageElement, WebGlBuffer, WebGlProgram, WebGlTexture};

use super::context::{GlContext, GL};
use super::framebuffers::{FramebufferSet, FRAMEBUFFER_UNITS};
use crate::config::{LayerConfig, Target};
use crate::driver::Animated;
use crate::error::{RenderError, RenderResult};
use crate::geometry::{Size, QUAD_POSITIONS};
use crate::layer::LayerState;
use crate::shader;

/// Texture unit for the image of the layer at `slot`.
pub fn background_unit(slot: usize) -> u32 {
    FRAMEBUFFER_UNITS.len() as u32 + slot as u32
}

/// A textured full-screen quad whose background coordinates pan with the pointer.
pub struct Layer {
    gl: GlContext,
    state: LayerState,
    program: WebGlProgram,
    texture: WebGlTexture,
    unit: u32,
    tex_buffer: WebGlBuffer,
    quad_buffer: WebGlBuffer,
    attr_background: u32,
    attr_position: u32,
    output: Target,
}

impl Layer {
    /// `program` must be linked from [`shader::LAYER_VERTEX`] and [`shader::LAYER_FRAGMENT`].
    pub fn new(
        gl: &GlContext,
        program: WebGlProgram,
        image: &HtmlImageElement,
        config: &LayerConfig,
        slot: usize,
        framebuffers: &FramebufferSet,
    ) -> RenderResult<Self> {
        let unit = background_unit(slot);

        gl.active_texture(unit);
        let texture = gl
            .create_texture()
            .ok_or(RenderError::allocation("layer texture"))?;
        gl.bind_texture(Some(&texture));
        gl.upload_image(image)?;
        gl.set_sampling();

        gl.use_program(Some(&program));
        let attr_background = attribute(gl, &program, shader::ATTR_BACKGROUND)?;
        let attr_position = attribute(gl, &program, shader::ATTR_POSITION)?;

        let foreground_unit = config.foreground.and_then(|fg| framebuffers.unit(fg));
        gl.uniform1i(
            gl.uniform_location(&program, shader::UNIFORM_BACKGROUND).as_ref(),
            unit as i32,
        );
        gl.uniform1i(
            gl.uniform_location(&program, shader::UNIFORM_USE_FOREGROUND).as_ref(),
            i32::from(foreground_unit.is_some()),
        );
        // An unused sampler still must not point at the target being drawn.
        gl.uniform1i(
            gl.uniform_location(&program, shader::UNIFORM_FOREGROUND).as_ref(),
            foreground_unit.unwrap_or(unit) as i32,
        );

        let tex_buffer = gl
            .create_buffer()
            .ok_or(RenderError::allocation("texture coordinate buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&tex_buffer));
        gl.buffer_data(
            GL::ARRAY_BUFFER,
            &Float32Array::from(&[0.0f32; 8][..]),
            GL::DYNAMIC_DRAW,
        );

        let quad_buffer = gl
            .create_buffer()
            .ok_or(RenderError::allocation("quad buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad_buffer));
        gl.buffer_data(
            GL::ARRAY_BUFFER,
            &Float32Array::from(&QUAD_POSITIONS[..]),
            GL::STATIC_DRAW,
        );

        let size = Size::new(image.natural_width() as f32, image.natural_height() as f32);
        tracing::debug!(
            src = %image.src(),
            width = size.width,
            height = size.height,
            unit,
            output = ?config.output,
            "created layer"
        );

        Ok(Self {
            gl: gl.clone(),
            state: LayerState::new(size, config.params()),
            program,
            texture,
            unit,
            tex_buffer,
            quad_buffer,
            attr_background,
            attr_position,
            output: config.output,
        })
    }

    pub fn state(&self) -> &LayerState {
        &self.state
    }

    /// Refits the texture window to the viewport and uploads the new coordinates.
    pub fn scale(&mut self, viewport: Size) {
        self.state.scale(viewport);
        self.upload_tex_coords();
    }

    /// Draws the quad into this layer's output target.
    pub fn render(&self, framebuffers: &FramebufferSet) {
        let gl = &self.gl;
        gl.use_program(Some(&self.program));

        gl.active_texture(self.unit);
        gl.bind_texture(Some(&self.texture));

        gl.enable_vertex_attrib_array(self.attr_background);
        gl.enable_vertex_attrib_array(self.attr_position);

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.tex_buffer));
        gl.vertex_attrib_pointer(self.attr_background, 2);
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.quad_buffer));
        gl.vertex_attrib_pointer(self.attr_position, 2);

        gl.bind_framebuffer(framebuffers.framebuffer(self.output));
        gl.draw_strip(4);

        gl.disable_vertex_attrib_array(self.attr_background);
        gl.disable_vertex_attrib_array(self.attr_position);
    }

    fn upload_tex_coords(&self) {
        let coords = self.state.tex_coords();
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.tex_buffer));
        self.gl
            .buffer_sub_data(GL::ARRAY_BUFFER, 0, &Float32Array::from(&coords[..]));
    }
}

impl Animated for Layer {
    fn advance(&mut self, dt_ms: f32, pointer: [f32; 2]) {
        self.state.update(dt_ms, pointer);
        self.upload_tex_coords();
    }

    fn reset(&mut self) {
        self.state.reset();
        self.upload_tex_coords();
    }
}

fn attribute(gl: &GlContext, program: &WebGlProgram, name: &'static str) -> RenderResult<u32> {
    u32::try_from(gl.attrib_location(program, name))
        .map_err(|_| RenderError::MissingAttribute { name })
}
