use std::io::Cursor;

use egui::{Pos2, Vec2};
use tiny_skia::{Color, Pixmap};

use crate::error::SurfaceError;

/// Pixel dimensions of a raster surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// The sizes a surface has to cover: the visible viewport and the natural
/// (scrollable) size of the content underneath it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceLayout {
    pub viewport: Vec2,
    pub content: Vec2,
}

impl SurfaceLayout {
    pub fn new(viewport: Vec2, content: Vec2) -> Self {
        Self { viewport, content }
    }

    /// Large enough that ink over content scrolled out of view stays addressable.
    pub fn surface_size(&self) -> SurfaceSize {
        let size = self.viewport.max(self.content);
        SurfaceSize::new(to_pixels(size.x), to_pixels(size.y))
    }
}

fn to_pixels(v: f32) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.ceil() as u32
    } else {
        0
    }
}

/// Maps device (client) coordinates to surface pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceMapping {
    /// Where the surface's top-left corner is displayed.
    pub origin: Pos2,
    /// How large the surface is displayed. Zero means "same as its pixel size".
    pub displayed_size: Vec2,
}

impl SurfaceMapping {
    pub fn new(origin: Pos2, displayed_size: Vec2) -> Self {
        Self {
            origin,
            displayed_size,
        }
    }

    pub fn to_surface(&self, device: Pos2, surface: SurfaceSize) -> Pos2 {
        let scale = |pixels: u32, displayed: f32| {
            if displayed > 0.0 {
                pixels as f32 / displayed
            } else {
                1.0
            }
        };
        let offset = device - self.origin;
        Pos2::new(
            offset.x * scale(surface.width, self.displayed_size.x),
            offset.y * scale(surface.height, self.displayed_size.y),
        )
    }
}

/// A raster surface strokes are painted onto.
///
/// Resizing drops the pixel contents; the owner must redraw right after.
pub struct Surface {
    pixmap: Option<Pixmap>,
    size: SurfaceSize,
    version: u64,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("size", &self.size)
            .field("version", &self.version)
            .finish()
    }
}

impl Surface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            pixmap: Pixmap::new(size.width, size.height),
            size,
            version: 0,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Bumped on every pixel change, so hosts know when to re-upload.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Reallocates the pixels if `size` differs. Returns whether it did.
    pub fn resize(&mut self, size: SurfaceSize) -> bool {
        if size == self.size {
            return false;
        }
        self.pixmap = Pixmap::new(size.width, size.height);
        self.size = size;
        self.touch();
        true
    }

    pub fn clear(&mut self) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(Color::TRANSPARENT);
        }
        self.touch();
    }

    pub(crate) fn pixmap_mut(&mut self) -> Option<&mut Pixmap> {
        self.pixmap.as_mut()
    }

    pub(crate) fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Premultiplied RGBA bytes, row-major. Empty for a zero-sized surface.
    pub fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map_or(&[][..], |p| p.data())
    }

    /// Alpha of the pixel at `(x, y)`, if it lies on the surface.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.as_ref()?.pixel(x, y).map(|p| p.alpha())
    }

    /// Unmultiplied RGBA, as image libraries and texture uploads expect.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        let pixmap = self.pixmap.as_ref()?;
        let bytes = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        image::RgbaImage::from_raw(self.size.width, self.size.height, bytes)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let image = self.to_rgba_image().ok_or(SurfaceError::Empty)?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_layout_takes_larger_dimension() {
        let layout = SurfaceLayout::new(vec2(800.0, 600.0), vec2(640.0, 1500.5));
        assert_eq!(layout.surface_size(), SurfaceSize::new(800, 1501));
    }

    #[test]
    fn test_mapping_scales_to_pixels() {
        let mapping = SurfaceMapping::new(pos2(10.0, 20.0), vec2(100.0, 50.0));
        let p = mapping.to_surface(pos2(60.0, 45.0), SurfaceSize::new(200, 100));
        assert_eq!(p, pos2(100.0, 50.0));

        let unscaled = SurfaceMapping::new(pos2(10.0, 20.0), Vec2::ZERO);
        assert_eq!(unscaled.to_surface(pos2(15.0, 25.0), SurfaceSize::new(200, 100)), pos2(5.0, 5.0));
    }

    #[test]
    fn test_zero_sized_surface_is_inert() {
        let mut surface = Surface::new(SurfaceSize::new(0, 0));
        surface.clear();
        assert!(surface.data().is_empty());
        assert!(matches!(surface.encode_png(), Err(SurfaceError::Empty)));
        assert!(surface.resize(SurfaceSize::new(4, 4)));
        assert_eq!(surface.data().len(), 4 * 4 * 4);
    }

    #[test]
    fn test_resize_to_same_size_keeps_pixels() {
        let mut surface = Surface::new(SurfaceSize::new(8, 8));
        let version = surface.version();
        assert!(!surface.resize(SurfaceSize::new(8, 8)));
        assert_eq!(surface.version(), version);
    }

    #[test]
    fn test_png_export() {
        let surface = Surface::new(SurfaceSize::new(3, 2));
        let png = surface.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
