use std::path::Path;

use egui::{Color32, PointerButton, Pos2};
use uuid::Uuid;

use super::EditorContext;
use super::settings::ToolSetting;
use crate::command::CommandHistory;
use crate::config::PaintConfig;
use crate::error::PaintResult;
use crate::event::{DocumentEvent, EditorEvent, EventHandler};
use crate::geometry::DirtyRegion;
use crate::input::{GestureState, InputEvent, InputSequencer};
use crate::scene::{Scene, SceneRenderer, SceneShape};
use crate::surface::{Snapshot, Surface};
use crate::tools::style::{DrawType, StrokeStyle};
use crate::tools::{Palette, ToolKind, ToolSet};

/// A paint session: the editor context plus the input sequencer driving it.
///
/// Shell-level commands that replace or clear the surface are committed to
/// the history like any other edit, so they can be undone.
#[derive(Debug)]
pub struct EditorSession {
    ctx: EditorContext,
    sequencer: InputSequencer,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(PaintConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: PaintConfig) -> Self {
        Self::from_context(EditorContext::new(config))
    }

    pub fn with_renderer(config: PaintConfig, renderer: Box<dyn SceneRenderer>) -> Self {
        Self::from_context(EditorContext::with_renderer(config, renderer))
    }

    pub fn from_context(ctx: EditorContext) -> Self {
        Self {
            ctx,
            sequencer: InputSequencer::new(),
        }
    }

    pub fn context(&self) -> &EditorContext {
        &self.ctx
    }

    pub fn surface(&self) -> &Surface {
        &self.ctx.surface
    }

    pub fn tools(&self) -> &ToolSet {
        &self.ctx.tools
    }

    pub fn palette(&self) -> &Palette {
        &self.ctx.palette
    }

    pub fn history(&self) -> &CommandHistory {
        &self.ctx.history
    }

    pub fn config(&self) -> &PaintConfig {
        &self.ctx.config
    }

    pub fn gesture_state(&self) -> GestureState {
        self.sequencer.state(self.ctx.tools.active_kind())
    }

    /// Subscribe a handler to the session's event bus
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.ctx.event_bus.subscribe(handler);
    }

    /// Region changed since the last call
    pub fn take_damage(&mut self) -> Option<DirtyRegion> {
        self.ctx.surface.take_damage()
    }

    // --- pointer input ---

    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown { position, button } => self.press(*position, *button),
            InputEvent::PointerMove { position, held_buttons } => self.pointer_move(*position, held_buttons),
            InputEvent::PointerUp { position, button } => self.release(*position, *button),
            InputEvent::DoubleClick { position, button } => self.double_click(*position, *button),
        }
    }

    pub fn press(&mut self, point: Pos2, button: PointerButton) {
        self.sequencer.press(&mut self.ctx, point, button);
    }

    pub fn pointer_move(&mut self, point: Pos2, held_buttons: &[PointerButton]) {
        self.sequencer.pointer_move(&mut self.ctx, point, held_buttons);
    }

    pub fn release(&mut self, point: Pos2, button: PointerButton) {
        self.sequencer.release(&mut self.ctx, point, button);
    }

    pub fn double_click(&mut self, point: Pos2, button: PointerButton) {
        self.sequencer.double_click(&mut self.ctx, point, button);
    }

    // --- shell commands ---

    /// Replace the surface with a blank canvas filled with the background color
    pub fn new_canvas(&mut self, width: u32, height: u32) -> PaintResult<()> {
        log::info!("New {}x{} canvas", width, height);
        self.sequencer.reset(&self.ctx);
        let before = self.ctx.surface.snapshot();
        self.ctx.surface.create_blank(width, height, self.ctx.palette.background)?;
        self.commit_if_changed("New canvas", before);
        self.emit_document(DocumentEvent::Created { width, height });
        Ok(())
    }

    /// New canvas at the configured default size
    pub fn new_default_canvas(&mut self) -> PaintResult<()> {
        let (width, height) = (self.ctx.config.canvas_width, self.ctx.config.canvas_height);
        self.new_canvas(width, height)
    }

    /// Load an image file. A failed decode still leaves an undoable edit
    /// when it emptied a previously non-empty surface.
    pub fn load(&mut self, path: impl AsRef<Path>) -> PaintResult<()> {
        log::info!("Loading {}", path.as_ref().display());
        self.sequencer.reset(&self.ctx);
        let before = self.ctx.surface.snapshot();
        let result = self.ctx.surface.load_from_path(path.as_ref());
        self.finish_load(before, result)
    }

    /// Load an image from encoded bytes
    pub fn load_bytes(&mut self, bytes: &[u8]) -> PaintResult<()> {
        self.sequencer.reset(&self.ctx);
        let before = self.ctx.surface.snapshot();
        let result = self.ctx.surface.load_from(bytes);
        self.finish_load(before, result)
    }

    fn finish_load(&mut self, before: Snapshot, result: PaintResult<()>) -> PaintResult<()> {
        self.commit_if_changed("Load", before);
        match &result {
            Ok(()) => self.emit_document(DocumentEvent::Loaded),
            Err(err) => log::warn!("Load failed: {}", err),
        }
        result
    }

    /// Save as BMP regardless of the file extension
    pub fn save(&mut self, path: impl AsRef<Path>) -> PaintResult<()> {
        self.ctx.surface.save_to(path)?;
        self.emit_document(DocumentEvent::Saved);
        Ok(())
    }

    /// Rescale the surface, ignoring aspect ratio
    pub fn resize(&mut self, width: u32, height: u32) -> PaintResult<()> {
        log::info!("Resizing canvas to {}x{}", width, height);
        let before = self.ctx.surface.snapshot();
        self.ctx.surface.resize_to(width, height)?;
        self.sequencer.reset(&self.ctx);
        self.commit_if_changed("Resize", before);
        self.emit_document(DocumentEvent::Resized { width, height });
        Ok(())
    }

    /// Fill the whole surface with the background color
    pub fn clear_all(&mut self) -> PaintResult<()> {
        log::info!("Clearing canvas");
        let before = self.ctx.surface.snapshot();
        self.ctx.surface.clear(self.ctx.palette.background)?;
        self.sequencer.reset(&self.ctx);
        self.commit_if_changed("Clear", before);
        self.emit_document(DocumentEvent::Cleared);
        Ok(())
    }

    /// Change the foreground color. Tools read the palette at draw time, so a
    /// shape filling with the foreground follows the change.
    pub fn set_foreground(&mut self, color: Color32) {
        self.ctx.palette.foreground = color;
    }

    pub fn set_background(&mut self, color: Color32) {
        self.ctx.palette.background = color;
    }

    /// Make `kind` the active tool. Leaving the line tool ends poly mode.
    pub fn switch_tool(&mut self, kind: ToolKind) {
        let old = self.ctx.tools.active_kind();
        if old == kind {
            return;
        }
        if old == ToolKind::Line {
            self.sequencer.cancel_poly(&self.ctx);
        }
        self.ctx.tools.set_active(kind);
        log::info!("Switched tool {} -> {}", old.label(), kind.label());
        self.ctx.event_bus.emit(EditorEvent::ToolChanged { old, new: kind });
    }

    /// Drop every undo and redo entry, e.g. after creating the startup canvas
    pub fn clear_history(&mut self) {
        self.ctx.history.clear();
    }

    pub fn undo(&mut self) -> bool {
        self.sequencer.reset(&self.ctx);
        match self.ctx.history.undo(&mut self.ctx.surface) {
            Some(id) => {
                log::debug!("Undid {}", id);
                self.ctx.event_bus.emit(EditorEvent::Undone { id });
                self.ctx.event_bus.emit(EditorEvent::Repaint(DirtyRegion::Full));
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.sequencer.reset(&self.ctx);
        match self.ctx.history.redo(&mut self.ctx.surface) {
            Some(id) => {
                log::debug!("Redid {}", id);
                self.ctx.event_bus.emit(EditorEvent::Redone { id });
                self.ctx.event_bus.emit(EditorEvent::Repaint(DirtyRegion::Full));
                true
            }
            None => false,
        }
    }

    /// Show `shape` in the scene renderer, lit in the current foreground
    /// color on the current background
    pub fn set_scene(&mut self, shape: SceneShape) {
        log::info!("Scene set to {}", shape.label());
        self.ctx.renderer.set_scene(Scene {
            shape,
            foreground: self.ctx.palette.foreground,
            background: self.ctx.palette.background,
        });
    }

    pub fn apply_setting(&mut self, setting: ToolSetting) {
        log::debug!("Applying {:?}", setting);
        let tools = &mut self.ctx.tools;
        match setting {
            ToolSetting::PenCap(cap) => with_style(tools, ToolKind::Pen, |s| s.cap = cap),
            ToolSetting::PenWidth(width) => with_style(tools, ToolKind::Pen, |s| s.width = width),
            ToolSetting::EraserWidth(width) => with_style(tools, ToolKind::Eraser, |s| s.width = width),
            ToolSetting::LineStyle(line) => with_style(tools, ToolKind::Line, |s| s.line = line),
            ToolSetting::LineCap(cap) => with_style(tools, ToolKind::Line, |s| s.cap = cap),
            ToolSetting::LineWidth(width) => with_style(tools, ToolKind::Line, |s| s.width = width),
            ToolSetting::LineDrawType(draw_type) => {
                if let Some(line) = tools.line_mut() {
                    line.draw_type = draw_type;
                }
                if draw_type == DrawType::Single {
                    self.sequencer.cancel_poly(&self.ctx);
                }
            }
            ToolSetting::ShapeLineStyle(line) => with_style(tools, ToolKind::Shape, |s| s.line = line),
            ToolSetting::ShapeJoin(join) => with_style(tools, ToolKind::Shape, |s| s.join = join),
            ToolSetting::ShapeWidth(width) => with_style(tools, ToolKind::Shape, |s| s.width = width),
            ToolSetting::ShapeType(shape_type) => {
                if let Some(shape) = tools.shape_mut() {
                    shape.shape_type = shape_type;
                }
            }
            ToolSetting::ShapeFill(fill_mode) => {
                if let Some(shape) = tools.shape_mut() {
                    shape.fill_mode = fill_mode;
                }
            }
            ToolSetting::ShapeCurve(curve) => {
                if let Some(shape) = tools.shape_mut() {
                    shape.curve = curve;
                }
            }
        }
    }

    fn commit_if_changed(&mut self, label: &'static str, before: Snapshot) -> Option<Uuid> {
        if self.ctx.surface.matches(&before) {
            return None;
        }
        let id = self.ctx.history.push(label, before, self.ctx.surface.snapshot());
        log::debug!("Committed {} ({})", label, id);
        self.ctx.event_bus.emit(EditorEvent::CommandCommitted { id, label });
        self.ctx.event_bus.emit(EditorEvent::Repaint(DirtyRegion::Full));
        Some(id)
    }

    fn emit_document(&self, event: DocumentEvent) {
        self.ctx.event_bus.emit(EditorEvent::DocumentChanged(event));
    }
}

fn with_style(tools: &mut ToolSet, kind: ToolKind, apply: impl FnOnce(&mut StrokeStyle)) {
    if let Some(style) = tools.get_mut(kind).style_mut() {
        apply(style);
    }
}
