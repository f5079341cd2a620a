use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::Surface;

struct CachedTexture {
    handle: TextureHandle,
    version: u64,
    last_used: u64,
}

/// Uploads ink surfaces to egui textures, one per layer key, re-uploading
/// only when a surface's version changes.
pub struct TextureManager {
    textures: HashMap<u32, CachedTexture>,
    current_frame: u64,
    /// Textures not used for this many frames are dropped.
    max_idle_frames: u64,
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new(120)
    }
}

impl TextureManager {
    pub fn new(max_idle_frames: u64) -> Self {
        Self {
            textures: HashMap::new(),
            current_frame: 0,
            max_idle_frames,
        }
    }

    /// Call once per frame, before any [`Self::texture_for`].
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
        let (frame, idle) = (self.current_frame, self.max_idle_frames);
        self.textures
            .retain(|_, texture| frame.saturating_sub(texture.last_used) <= idle);
    }

    /// The texture showing `surface`, uploaded if it changed. `None` for an
    /// empty surface.
    pub fn texture_for(&mut self, ctx: &Context, key: u32, surface: &Surface) -> Option<TextureId> {
        let frame = self.current_frame;
        if let Some(texture) = self.textures.get_mut(&key) {
            if texture.version != surface.version() {
                texture.handle.set(color_image(surface)?, TextureOptions::LINEAR);
                texture.version = surface.version();
            }
            texture.last_used = frame;
            return Some(texture.handle.id());
        }

        let handle = ctx.load_texture(format!("ink_layer_{key}"), color_image(surface)?, TextureOptions::LINEAR);
        let id = handle.id();
        self.textures.insert(
            key,
            CachedTexture {
                handle,
                version: surface.version(),
                last_used: frame,
            },
        );
        Some(id)
    }

    pub fn invalidate(&mut self, key: u32) {
        self.textures.remove(&key);
    }

    pub fn clear_cache(&mut self) {
        self.textures.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.textures.len()
    }
}

fn color_image(surface: &Surface) -> Option<ColorImage> {
    if surface.size().is_empty() {
        return None;
    }
    let image = surface.to_rgba_image()?;
    let size = [image.width() as usize, image.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}
