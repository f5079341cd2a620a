use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::engine::DrawingEngine;
use crate::event::StatusTracker;
use crate::stroke::Stroke;
use crate::surface::{SurfaceLayout, SurfaceSize};
use crate::tools::{Tool, ToolSettings};

pub const DEFAULT_PAGE_SCALE: f32 = 1.5;
pub const MIN_PAGE_SCALE: f32 = 0.5;
pub const MAX_PAGE_SCALE: f32 = 3.0;

/// Size of a rendered PDF page, as reported by the PDF renderer.
///
/// `width` and `height` are in pixels at `scale`; ink on the page is drawn in
/// those pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageViewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl PageViewport {
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        Self { width, height, scale }
    }

    pub fn clamp_scale(scale: f32) -> f32 {
        scale.clamp(MIN_PAGE_SCALE, MAX_PAGE_SCALE)
    }

    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceLayout::new(egui::vec2(self.width, self.height), egui::Vec2::ZERO).surface_size()
    }
}

struct PageInk {
    engine: DrawingEngine,
    viewport: PageViewport,
}

/// One drawing engine per PDF page.
///
/// Strokes are kept in page pixels while a page is open, and exchanged with
/// persistence in unscaled page units so they survive zoom changes.
pub struct PageInkSet {
    config: EngineConfig,
    tool: Tool,
    pages: BTreeMap<u32, PageInk>,
    // Persisted strokes for pages that have not been opened yet.
    pending: BTreeMap<u32, Vec<Stroke>>,
    status: StatusTracker,
}

impl std::fmt::Debug for PageInkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageInkSet")
            .field("open_pages", &self.pages.keys().collect::<Vec<_>>())
            .field("pending_pages", &self.pending.len())
            .finish()
    }
}

impl PageInkSet {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            tool: Tool::default(),
            pages: BTreeMap::new(),
            pending: BTreeMap::new(),
            status: StatusTracker::new(),
        }
    }

    /// Opens (or re-lays-out) a page's ink layer and returns its engine.
    pub fn open_page(&mut self, page: u32, viewport: PageViewport) -> &mut DrawingEngine {
        if self.pages.contains_key(&page) {
            self.set_viewport(page, viewport);
        }
        let ink = self.pages.entry(page).or_insert_with(|| {
            let mut engine = DrawingEngine::new(&self.config, viewport.surface_size());
            engine.set_tool(self.tool);
            *engine.settings_mut() = self.config.tools.scaled(viewport.scale);
            engine.subscribe(Box::new(self.status.clone()));
            if let Some(strokes) = self.pending.remove(&page) {
                engine.load_drawings(scale_all(&strokes, viewport.scale));
            }
            log::debug!("Opened ink for page {page} at scale {}", viewport.scale);
            PageInk { engine, viewport }
        });
        &mut ink.engine
    }

    /// Applies a new viewport; a scale change rescales the page's strokes.
    pub fn set_viewport(&mut self, page: u32, viewport: PageViewport) {
        let Some(ink) = self.pages.get_mut(&page) else {
            return;
        };
        let old_scale = ink.viewport.scale;
        ink.viewport = viewport;
        ink.engine.resize(SurfaceLayout::new(
            egui::vec2(viewport.width, viewport.height),
            egui::Vec2::ZERO,
        ));
        if old_scale != viewport.scale && old_scale > 0.0 {
            ink.engine.rescale(viewport.scale / old_scale);
            *ink.engine.settings_mut() = self.config.tools.scaled(viewport.scale);
        }
    }

    pub fn page(&self, page: u32) -> Option<&DrawingEngine> {
        self.pages.get(&page).map(|ink| &ink.engine)
    }

    pub fn page_mut(&mut self, page: u32) -> Option<&mut DrawingEngine> {
        self.pages.get_mut(&page).map(|ink| &mut ink.engine)
    }

    pub fn open_pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        for ink in self.pages.values_mut() {
            ink.engine.set_tool(tool);
        }
    }

    /// New brush settings, applied to every page at its own scale.
    pub fn set_settings(&mut self, settings: ToolSettings) {
        self.config.tools = settings;
        for ink in self.pages.values_mut() {
            *ink.engine.settings_mut() = settings.scaled(ink.viewport.scale);
        }
    }

    /// Whether any page's drawings changed since the last call.
    pub fn take_dirty(&self) -> bool {
        self.status.take_dirty()
    }

    /// Strokes of every page with ink, in unscaled page units.
    pub fn drawings_by_page(&self) -> BTreeMap<u32, Vec<Stroke>> {
        let mut pages: BTreeMap<u32, Vec<Stroke>> = self
            .pending
            .iter()
            .filter(|(_, strokes)| !strokes.is_empty())
            .map(|(page, strokes)| (*page, strokes.clone()))
            .collect();
        for (page, ink) in &self.pages {
            let drawings = ink.engine.drawings();
            if !drawings.is_empty() && ink.viewport.scale > 0.0 {
                pages.insert(*page, scale_all(drawings, 1.0 / ink.viewport.scale));
            }
        }
        pages
    }

    /// Replaces all page ink with persisted strokes.
    pub fn load_pages(&mut self, mut pages: BTreeMap<u32, Vec<Stroke>>) {
        for (page, ink) in &mut self.pages {
            let strokes = pages.remove(page).unwrap_or_default();
            ink.engine.load_drawings(scale_all(&strokes, ink.viewport.scale));
        }
        self.pending = pages;
        self.status.take_dirty();
    }

    /// Closes every page, e.g. when the PDF is closed.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.pending.clear();
    }
}

fn scale_all(strokes: &[Stroke], factor: f32) -> Vec<Stroke> {
    strokes.iter().map(|s| s.scaled(factor)).collect()
}
