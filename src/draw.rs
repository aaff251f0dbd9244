// Window plumbing.
// Visual effects provided here:
// 1) A window that shows the particle screen.
// 2) Click detection so each press of the left button sets off one explosion.

use log::trace;
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::types::FrameBuffer;

pub struct Drawer {
    window: Window,      // the on-screen window you see
    was_down: bool,      // left button state from the previous poll
}

impl Drawer {
    /// Create a window sized to the screen surface.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, target_fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        if target_fps > 0 {
            window.set_target_fps(target_fps);
        }
        Ok(Self { window, was_down: false })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Position of a fresh left-button press, once per press.
    /// Holding the button does not repeat; clicks outside the window are ignored.
    pub fn mouse_clicked(&mut self) -> Option<(f32, f32)> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pressed = down && !self.was_down;
        self.was_down = down;
        if !pressed {
            return None;
        }

        let pos = self.window.get_mouse_pos(MouseMode::Discard);
        trace!("click at {pos:?}");
        pos
    }
}
