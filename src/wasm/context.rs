//! One handle over WebGL2 and WebGL1 contexts.
//!
//! The layer pipeline only uses calls both versions share, so each method
//! just forwards to whichever context was negotiated.

use js_sys::Object;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, HtmlImageElement, WebGl2RenderingContext, WebGlBuffer, WebGlFramebuffer,
    WebGlProgram, WebGlRenderingContext, WebGlShader, WebGlTexture, WebGlUniformLocation,
};

use crate::error::{RenderError, RenderResult};

/// WebGL enums are identical across versions; use the WebGL1 names.
pub use web_sys::WebGlRenderingContext as GL;

const CONTEXT_IDS: [&str; 3] = ["webgl2", "webgl", "experimental-webgl"];

#[derive(Clone)]
pub enum GlContext {
    WebGl2(WebGl2RenderingContext),
    WebGl1(WebGlRenderingContext),
}

macro_rules! forward {
    ($self:ident, $gl:ident => $call:expr) => {
        match $self {
            GlContext::WebGl2($gl) => $call,
            GlContext::WebGl1($gl) => $call,
        }
    };
}

impl GlContext {
    /// Tries WebGL2 first, then WebGL1 under its current and legacy names.
    pub fn negotiate(canvas: &HtmlCanvasElement) -> RenderResult<Self> {
        for id in CONTEXT_IDS {
            let Ok(Some(object)) = canvas.get_context(id) else {
                tracing::debug!(context = id, "context not available");
                continue;
            };
            let gl = if id == "webgl2" {
                object.dyn_into::<WebGl2RenderingContext>().map(GlContext::WebGl2).ok()
            } else {
                object.dyn_into::<WebGlRenderingContext>().map(GlContext::WebGl1).ok()
            };
            if let Some(gl) = gl {
                tracing::info!(context = id, "negotiated rendering context");
                return Ok(gl);
            }
        }
        Err(RenderError::ContextUnavailable {
            tried: CONTEXT_IDS.join(", "),
        })
    }

    pub fn version(&self) -> u8 {
        match self {
            GlContext::WebGl2(_) => 2,
            GlContext::WebGl1(_) => 1,
        }
    }

    pub fn create_shader(&self, kind: u32) -> Option<WebGlShader> {
        forward!(self, gl => gl.create_shader(kind))
    }

    pub fn shader_source(&self, shader: &WebGlShader, source: &str) {
        forward!(self, gl => gl.shader_source(shader, source))
    }

    pub fn compile_shader(&self, shader: &WebGlShader) {
        forward!(self, gl => gl.compile_shader(shader))
    }

    pub fn shader_compiled(&self, shader: &WebGlShader) -> bool {
        forward!(self, gl => gl.get_shader_parameter(shader, GL::COMPILE_STATUS))
            .as_bool()
            .unwrap_or(false)
    }

    pub fn shader_info_log(&self, shader: &WebGlShader) -> Option<String> {
        forward!(self, gl => gl.get_shader_info_log(shader))
    }

    pub fn delete_shader(&self, shader: &WebGlShader) {
        forward!(self, gl => gl.delete_shader(Some(shader)))
    }

    pub fn create_program(&self) -> Option<WebGlProgram> {
        forward!(self, gl => gl.create_program())
    }

    pub fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        forward!(self, gl => gl.attach_shader(program, shader))
    }

    pub fn link_program(&self, program: &WebGlProgram) {
        forward!(self, gl => gl.link_program(program))
    }

    pub fn program_linked(&self, program: &WebGlProgram) -> bool {
        forward!(self, gl => gl.get_program_parameter(program, GL::LINK_STATUS))
            .as_bool()
            .unwrap_or(false)
    }

    pub fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
        forward!(self, gl => gl.get_program_info_log(program))
    }

    pub fn use_program(&self, program: Option<&WebGlProgram>) {
        forward!(self, gl => gl.use_program(program))
    }

    pub fn attrib_location(&self, program: &WebGlProgram, name: &str) -> i32 {
        forward!(self, gl => gl.get_attrib_location(program, name))
    }

    pub fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        forward!(self, gl => gl.get_uniform_location(program, name))
    }

    pub fn uniform1i(&self, location: Option<&WebGlUniformLocation>, value: i32) {
        forward!(self, gl => gl.uniform1i(location, value))
    }

    pub fn create_buffer(&self) -> Option<WebGlBuffer> {
        forward!(self, gl => gl.create_buffer())
    }

    pub fn bind_buffer(&self, target: u32, buffer: Option<&WebGlBuffer>) {
        forward!(self, gl => gl.bind_buffer(target, buffer))
    }

    pub fn buffer_data(&self, target: u32, data: &Object, usage: u32) {
        forward!(self, gl => gl.buffer_data_with_array_buffer_view(target, data, usage))
    }

    pub fn buffer_sub_data(&self, target: u32, offset: i32, data: &Object) {
        forward!(self, gl => gl.buffer_sub_data_with_i32_and_array_buffer_view(target, offset, data))
    }

    pub fn enable_vertex_attrib_array(&self, index: u32) {
        forward!(self, gl => gl.enable_vertex_attrib_array(index))
    }

    pub fn disable_vertex_attrib_array(&self, index: u32) {
        forward!(self, gl => gl.disable_vertex_attrib_array(index))
    }

    pub fn vertex_attrib_pointer(&self, index: u32, size: i32) {
        forward!(self, gl => gl.vertex_attrib_pointer_with_i32(index, size, GL::FLOAT, false, 0, 0))
    }

    pub fn create_texture(&self) -> Option<WebGlTexture> {
        forward!(self, gl => gl.create_texture())
    }

    pub fn active_texture(&self, unit: u32) {
        forward!(self, gl => gl.active_texture(GL::TEXTURE0 + unit))
    }

    pub fn bind_texture(&self, texture: Option<&WebGlTexture>) {
        forward!(self, gl => gl.bind_texture(GL::TEXTURE_2D, texture))
    }

    /// Linear filtering and clamp-to-edge on the bound 2D texture.
    pub fn set_sampling(&self) {
        for (pname, value) in [
            (GL::TEXTURE_MAG_FILTER, GL::LINEAR),
            (GL::TEXTURE_MIN_FILTER, GL::LINEAR),
            (GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE),
            (GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE),
        ] {
            forward!(self, gl => gl.tex_parameteri(GL::TEXTURE_2D, pname, value as i32))
        }
    }

    pub fn upload_image(&self, image: &HtmlImageElement) -> RenderResult<()> {
        forward!(self, gl => gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            image,
        ))?;
        Ok(())
    }

    /// (Re)allocates empty RGBA8 storage for the bound 2D texture.
    pub fn allocate_rgba(&self, width: i32, height: i32) -> RenderResult<()> {
        forward!(self, gl => gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            width,
            height,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            None,
        ))?;
        Ok(())
    }

    pub fn create_framebuffer(&self) -> Option<WebGlFramebuffer> {
        forward!(self, gl => gl.create_framebuffer())
    }

    pub fn bind_framebuffer(&self, framebuffer: Option<&WebGlFramebuffer>) {
        forward!(self, gl => gl.bind_framebuffer(GL::FRAMEBUFFER, framebuffer))
    }

    pub fn attach_color(&self, texture: &WebGlTexture) {
        forward!(self, gl => gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(texture),
            0,
        ))
    }

    pub fn framebuffer_complete(&self) -> bool {
        forward!(self, gl => gl.check_framebuffer_status(GL::FRAMEBUFFER)) == GL::FRAMEBUFFER_COMPLETE
    }

    pub fn viewport(&self, width: i32, height: i32) {
        forward!(self, gl => gl.viewport(0, 0, width, height))
    }

    pub fn clear_color(&self, rgba: [f32; 4]) {
        forward!(self, gl => gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]))
    }

    pub fn clear(&self) {
        forward!(self, gl => gl.clear(GL::COLOR_BUFFER_BIT))
    }

    /// Alpha blending on, depth testing off.
    pub fn configure_blending(&self) {
        forward!(self, gl => {
            gl.disable(GL::DEPTH_TEST);
            gl.enable(GL::BLEND);
            gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        })
    }

    pub fn draw_strip(&self, count: i32) {
        forward!(self, gl => gl.draw_arrays(GL::TRIANGLE_STRIP, 0, count))
    }
}
