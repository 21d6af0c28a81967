use web_sys::{WebGlFramebuffer, WebGlTexture};

use super::context::GlContext;
use crate::config::Target;
use crate::error::{RenderError, RenderResult};

/// Texture units holding the framebuffer pair; layer images start after them.
pub const FRAMEBUFFER_UNITS: [u32; 2] = [0, 1];

struct Offscreen {
    framebuffer: WebGlFramebuffer,
    texture: WebGlTexture,
    unit: u32,
}

/// Two colour-only render targets that later passes sample as textures.
pub struct FramebufferSet {
    targets: [Offscreen; 2],
    size: (i32, i32),
}

impl FramebufferSet {
    pub fn new(gl: &GlContext) -> RenderResult<Self> {
        let make = |unit: u32| -> RenderResult<Offscreen> {
            Ok(Offscreen {
                framebuffer: gl
                    .create_framebuffer()
                    .ok_or(RenderError::allocation("framebuffer"))?,
                texture: gl
                    .create_texture()
                    .ok_or(RenderError::allocation("framebuffer texture"))?,
                unit,
            })
        };
        Ok(Self {
            targets: [make(FRAMEBUFFER_UNITS[0])?, make(FRAMEBUFFER_UNITS[1])?],
            size: (0, 0),
        })
    }

    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    /// Reallocates both targets at `width × height`, keeping their handles.
    pub fn resize(&mut self, gl: &GlContext, width: i32, height: i32) -> RenderResult<()> {
        let (width, height) = (width.max(1), height.max(1));
        for target in &self.targets {
            gl.active_texture(target.unit);
            gl.bind_texture(Some(&target.texture));
            gl.allocate_rgba(width, height)?;
            gl.set_sampling();

            gl.bind_framebuffer(Some(&target.framebuffer));
            gl.attach_color(&target.texture);
            if !gl.framebuffer_complete() {
                tracing::warn!(unit = target.unit, width, height, "offscreen target incomplete");
            }
        }
        gl.bind_framebuffer(None);
        self.size = (width, height);
        Ok(())
    }

    /// Framebuffer a pass renders into; `None` draws to the canvas.
    pub fn framebuffer(&self, target: Target) -> Option<&WebGlFramebuffer> {
        target
            .offscreen_index()
            .map(|index| &self.targets[index].framebuffer)
    }

    /// Texture unit a pass samples to read `target`.
    pub fn unit(&self, target: Target) -> Option<u32> {
        target.offscreen_index().map(|index| self.targets[index].unit)
    }

    /// Clears the canvas and both offscreen targets.
    pub fn clear_all(&self, gl: &GlContext) {
        gl.bind_framebuffer(None);
        gl.clear();
        for target in &self.targets {
            gl.bind_framebuffer(Some(&target.framebuffer));
            gl.clear();
        }
        gl.bind_framebuffer(None);
    }
}
