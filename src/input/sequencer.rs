//! Turns pointer events into tool calls and decides when an edit is complete.
//!
//! One gesture is press → moves → release with the primary button. The
//! surface is snapshotted on press; on release the snapshot is compared with
//! the live surface and a command is committed only if a pixel changed.

use egui::{PointerButton, Pos2};

use crate::event::EditorEvent;
use crate::geometry::{DirtyRegion, to_pixel};
use crate::state::EditorContext;
use crate::surface::Snapshot;
use crate::tools::{DrawContext, Tool, ToolKind};

/// Where the sequencer is in a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
    /// Line tool in poly mode between segments; the next press continues from
    /// the last release point
    PolyPending,
    /// Scene capture drag in progress
    Extruding,
}

#[derive(Debug, Default)]
pub struct InputSequencer {
    dragging: bool,
    poly_pending: bool,
    before: Snapshot,
}

impl InputSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, active: ToolKind) -> GestureState {
        if self.dragging {
            if active == ToolKind::SceneCapture {
                GestureState::Extruding
            } else {
                GestureState::Dragging
            }
        } else if self.poly_pending {
            GestureState::PolyPending
        } else {
            GestureState::Idle
        }
    }

    /// Leave poly mode; already committed segments stay
    pub fn cancel_poly(&mut self, ctx: &EditorContext) {
        if self.poly_pending {
            self.poly_pending = false;
            log::debug!("Poly-line finished");
            ctx.event_bus.emit(EditorEvent::PolyModeChanged { active: false });
        }
    }

    /// Forget any gesture in progress, e.g. after the surface was replaced
    pub fn reset(&mut self, ctx: &EditorContext) {
        self.dragging = false;
        self.before = Snapshot::default();
        self.cancel_poly(ctx);
    }

    pub fn press(&mut self, ctx: &mut EditorContext, point: Pos2, button: PointerButton) {
        let point = to_pixel(point);
        match button {
            PointerButton::Primary => {}
            PointerButton::Secondary => {
                let tool = ctx.tools.active_kind();
                log::debug!("Secondary click with {:?} at {:?}", tool, point);
                ctx.event_bus.emit(EditorEvent::SecondaryClick { tool, position: point });
                return;
            }
            _ => return,
        }
        if ctx.surface.is_empty() {
            log::debug!("Ignoring press, no canvas");
            return;
        }

        if !self.poly_pending {
            ctx.tools.active_mut().set_anchor(point);
        }
        self.before = ctx.surface.snapshot();
        self.dragging = true;
    }

    pub fn pointer_move(&mut self, ctx: &mut EditorContext, point: Pos2, held_buttons: &[PointerButton]) {
        if !self.dragging || !held_buttons.contains(&PointerButton::Primary) {
            return;
        }
        let point = to_pixel(point);
        let kind = ctx.tools.active_kind();
        match kind {
            ToolKind::SceneCapture => {}
            _ if kind.previews_from_anchor() => {
                // live preview: every move redraws from the press-time surface
                ctx.surface.restore(&self.before);
                draw_active(ctx, point);
                let poly = ctx.tools.line().is_some_and(|line| line.is_poly());
                if kind == ToolKind::Line && poly && !self.poly_pending {
                    self.poly_pending = true;
                    log::debug!("Poly-line started");
                    ctx.event_bus.emit(EditorEvent::PolyModeChanged { active: true });
                }
            }
            _ => {
                draw_active(ctx, point);
            }
        }
    }

    pub fn release(&mut self, ctx: &mut EditorContext, point: Pos2, button: PointerButton) {
        if button != PointerButton::Primary || !self.dragging {
            return;
        }
        self.dragging = false;
        if ctx.surface.is_empty() {
            return;
        }
        let point = to_pixel(point);
        let kind = ctx.tools.active_kind();

        if kind == ToolKind::SceneCapture {
            self.before = ctx.surface.snapshot();
            draw_active(ctx, point);
        }
        if self.poly_pending {
            ctx.tools.active_mut().set_anchor(point);
        }
        if kind == ToolKind::Pen {
            draw_active(ctx, point);
        }

        self.commit(ctx, kind);
    }

    pub fn double_click(&mut self, ctx: &mut EditorContext, _point: Pos2, button: PointerButton) {
        if button == PointerButton::Primary {
            self.cancel_poly(ctx);
        }
    }

    fn commit(&mut self, ctx: &mut EditorContext, kind: ToolKind) {
        if ctx.surface.matches(&self.before) {
            log::debug!("{} gesture left the surface unchanged", kind.label());
            return;
        }
        let before = std::mem::take(&mut self.before);
        let id = ctx.history.push(kind.label(), before, ctx.surface.snapshot());
        log::debug!("Committed {} ({})", kind.label(), id);
        ctx.event_bus.emit(EditorEvent::CommandCommitted { id, label: kind.label() });
    }
}

/// Run the active tool up to `point` and announce the repaint region
fn draw_active(ctx: &mut EditorContext, point: Pos2) -> Option<DirtyRegion> {
    let EditorContext {
        surface,
        tools,
        palette,
        renderer,
        event_bus,
        ..
    } = ctx;

    let tool = tools.active_mut();
    let mut draw = DrawContext {
        surface: &mut *surface,
        palette: &*palette,
        renderer: renderer.as_mut(),
    };
    match tool.draw_to(point, &mut draw) {
        Ok(Some(region)) => {
            surface.mark_damaged(region);
            event_bus.emit(EditorEvent::Repaint(region));
            Some(region)
        }
        Ok(None) => None,
        Err(err) => {
            log::warn!("{} failed to draw: {}", tool.kind().label(), err);
            None
        }
    }
}
