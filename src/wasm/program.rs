use web_sys::{WebGlProgram, WebGlShader};

use super::context::{GlContext, GL};
use crate::error::{RenderError, RenderResult, ShaderStage};

/// Compiles both stages and links them, surfacing the driver's info log on failure.
pub fn build_program(gl: &GlContext, vertex: &str, fragment: &str) -> RenderResult<WebGlProgram> {
    let vs = compile_shader(gl, ShaderStage::Vertex, vertex)?;
    let fs = match compile_shader(gl, ShaderStage::Fragment, fragment) {
        Ok(fs) => fs,
        Err(err) => {
            gl.delete_shader(&vs);
            return Err(err);
        }
    };

    let program = gl
        .create_program()
        .ok_or(RenderError::allocation("shader program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);

    // the program keeps what it needs once linked
    gl.delete_shader(&vs);
    gl.delete_shader(&fs);

    if gl.program_linked(&program) {
        Ok(program)
    } else {
        let log = gl.program_info_log(&program).unwrap_or_default();
        Err(RenderError::ShaderLink { log })
    }
}

fn compile_shader(gl: &GlContext, stage: ShaderStage, source: &str) -> RenderResult<WebGlShader> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .ok_or(RenderError::allocation("shader object"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.shader_compiled(&shader) {
        Ok(shader)
    } else {
        let log = gl.shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(&shader);
        Err(RenderError::ShaderCompile { stage, log })
    }
}
