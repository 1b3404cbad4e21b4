use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use egui::{Color32, PointerButton, Pos2, Rect, pos2};
use image::{Rgba, RgbaImage};
use raster_paint::geometry::DirtyRegion;
use raster_paint::tools::style::{DrawType, FillMode, ShapeType};
use raster_paint::{
    EditorEvent, EditorSession, EventQueue, Frame, GestureState, PaintConfig, PaintError, PaintResult,
    SceneRenderer, SceneShape, ToolKind, ToolSetting,
};

const PRIMARY: PointerButton = PointerButton::Primary;

fn session_with(config: PaintConfig, renderer: Option<Box<dyn SceneRenderer>>) -> EditorSession {
    let mut session = match renderer {
        Some(renderer) => EditorSession::with_renderer(config, renderer),
        None => EditorSession::new(config),
    };
    session.new_canvas(100, 100).unwrap();
    session.clear_history();
    session
}

fn white_canvas() -> EditorSession {
    session_with(PaintConfig::default(), None)
}

fn drag(session: &mut EditorSession, from: Pos2, to: Pos2) {
    session.press(from, PRIMARY);
    session.pointer_move(to, &[PRIMARY]);
    session.release(to, PRIMARY);
}

fn pixel(session: &EditorSession, x: u32, y: u32) -> Color32 {
    session.surface().pixel(x, y).unwrap()
}

fn black_pixels(session: &EditorSession) -> Vec<(u32, u32)> {
    let mut pixels = Vec::new();
    for y in 0..session.surface().height() {
        for x in 0..session.surface().width() {
            if pixel(session, x, y) == Color32::BLACK {
                pixels.push((x, y));
            }
        }
    }
    pixels
}

fn all_white(session: &EditorSession) -> bool {
    (0..session.surface().height())
        .all(|y| (0..session.surface().width()).all(|x| pixel(session, x, y) == Color32::WHITE))
}

/// Renders a frame whose top half is green and bottom half red, stored the
/// way real renderers hand frames over
struct SplitRenderer {
    calls: Arc<AtomicUsize>,
}

impl SceneRenderer for SplitRenderer {
    fn capture_frame(&mut self, width: u32, height: u32) -> PaintResult<Frame> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let image = RgbaImage::from_fn(width, height, |_, y| {
            if y < height / 2 {
                Rgba([0, 255, 0, 255])
            } else {
                Rgba([255, 0, 0, 255])
            }
        });
        Ok(Frame::from_rgba(&image))
    }
}

struct OfflineRenderer;

impl SceneRenderer for OfflineRenderer {
    fn capture_frame(&mut self, _width: u32, _height: u32) -> PaintResult<Frame> {
        Err(PaintError::RenderUnavailable("render window closed".to_string()))
    }
}

#[test]
fn test_pen_stroke_commits_once_and_undoes() {
    let mut session = white_canvas();
    drag(&mut session, pos2(10.0, 10.0), pos2(20.0, 10.0));

    let expected: Vec<(u32, u32)> = (10..=20).map(|x| (x, 10)).collect();
    assert_eq!(black_pixels(&session), expected);
    assert_eq!(session.history().len(), 1);

    assert!(session.undo());
    assert!(all_white(&session));
}

#[test]
fn test_press_release_in_place_commits_nothing() {
    let mut session = white_canvas();
    session.press(pos2(40.0, 40.0), PRIMARY);
    session.release(pos2(40.0, 40.0), PRIMARY);

    assert!(session.history().is_empty());
    assert!(all_white(&session));
    assert_eq!(session.gesture_state(), GestureState::Idle);
}

#[test]
fn test_pen_draws_terminal_segment_on_release() {
    let mut session = white_canvas();
    session.press(pos2(10.0, 30.0), PRIMARY);
    session.pointer_move(pos2(20.0, 30.0), &[PRIMARY]);
    session.release(pos2(30.0, 30.0), PRIMARY);

    assert_eq!(pixel(&session, 25, 30), Color32::BLACK);
    assert_eq!(pixel(&session, 30, 30), Color32::BLACK);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_moves_without_primary_button_are_ignored() {
    let mut session = white_canvas();
    session.press(pos2(10.0, 10.0), PRIMARY);
    session.pointer_move(pos2(50.0, 10.0), &[PointerButton::Secondary]);
    session.release(pos2(10.0, 10.0), PRIMARY);
    assert!(all_white(&session));
    assert!(session.history().is_empty());
}

#[test]
fn test_filled_rectangle_dragged_up_left() {
    let mut session = white_canvas();
    session.apply_setting(ToolSetting::ShapeFill(FillMode::Foreground));
    session.switch_tool(ToolKind::Shape);
    drag(&mut session, pos2(50.0, 50.0), pos2(10.0, 10.0));

    let pixels = black_pixels(&session);
    assert_eq!(pixels.len(), 41 * 41);
    assert!(pixels.iter().all(|&(x, y)| (10..=50).contains(&x) && (10..=50).contains(&y)));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_shape_fill_follows_palette_changes() {
    let mut session = white_canvas();
    session.apply_setting(ToolSetting::ShapeFill(FillMode::Background));
    session.switch_tool(ToolKind::Shape);
    session.set_background(Color32::BLUE);
    drag(&mut session, pos2(10.0, 10.0), pos2(30.0, 30.0));

    assert_eq!(pixel(&session, 20, 20), Color32::BLUE);
    assert_eq!(pixel(&session, 10, 20), Color32::BLACK);
}

#[test]
fn test_line_preview_does_not_accumulate() {
    let mut session = white_canvas();
    session.switch_tool(ToolKind::Line);
    session.press(pos2(10.0, 10.0), PRIMARY);
    session.pointer_move(pos2(50.0, 10.0), &[PRIMARY]);
    session.pointer_move(pos2(10.0, 50.0), &[PRIMARY]);
    session.release(pos2(10.0, 50.0), PRIMARY);

    assert_eq!(pixel(&session, 10, 30), Color32::BLACK);
    assert_eq!(pixel(&session, 30, 10), Color32::WHITE);
    assert_eq!(pixel(&session, 50, 10), Color32::WHITE);
    assert_eq!(session.history().len(), 1);
}

fn start_poly_line(session: &mut EditorSession) {
    session.apply_setting(ToolSetting::LineDrawType(DrawType::Poly));
    session.switch_tool(ToolKind::Line);
    drag(session, pos2(10.0, 10.0), pos2(30.0, 10.0));
    assert_eq!(session.gesture_state(), GestureState::PolyPending);
}

#[test]
fn test_poly_line_chains_segments() {
    let mut session = white_canvas();
    start_poly_line(&mut session);

    // the press position is ignored while a poly-line is pending
    session.press(pos2(60.0, 60.0), PRIMARY);
    assert_eq!(session.gesture_state(), GestureState::Dragging);
    session.pointer_move(pos2(30.0, 40.0), &[PRIMARY]);
    session.release(pos2(30.0, 40.0), PRIMARY);

    assert_eq!(pixel(&session, 20, 10), Color32::BLACK);
    assert_eq!(pixel(&session, 30, 25), Color32::BLACK);
    assert_eq!(pixel(&session, 60, 60), Color32::WHITE);
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.gesture_state(), GestureState::PolyPending);
}

#[test]
fn test_double_click_ends_poly_line() {
    let mut session = white_canvas();
    start_poly_line(&mut session);

    session.double_click(pos2(30.0, 10.0), PRIMARY);
    assert_eq!(session.gesture_state(), GestureState::Idle);
    assert_eq!(session.history().len(), 1);

    drag(&mut session, pos2(70.0, 70.0), pos2(80.0, 70.0));
    assert_eq!(pixel(&session, 75, 70), Color32::BLACK);
    // on the segment (30,10)-(80,70) a pending poly-line would have drawn
    assert_eq!(pixel(&session, 55, 40), Color32::WHITE);
}

#[test]
fn test_switching_tools_cancels_poly_line() {
    let mut session = white_canvas();
    start_poly_line(&mut session);

    session.switch_tool(ToolKind::Pen);
    assert_eq!(session.gesture_state(), GestureState::Idle);
    session.switch_tool(ToolKind::Line);

    drag(&mut session, pos2(60.0, 60.0), pos2(70.0, 60.0));
    assert_eq!(pixel(&session, 65, 60), Color32::BLACK);
    // on the segment (30,10)-(70,60) a pending poly-line would have drawn
    assert_eq!(pixel(&session, 50, 35), Color32::WHITE);
}

#[test]
fn test_single_draw_type_cancels_poly_line() {
    let mut session = white_canvas();
    start_poly_line(&mut session);
    session.apply_setting(ToolSetting::LineDrawType(DrawType::Single));
    assert_eq!(session.gesture_state(), GestureState::Idle);
}

#[test]
fn test_eraser_paints_background() {
    let mut session = white_canvas();
    drag(&mut session, pos2(10.0, 50.0), pos2(90.0, 50.0));
    assert!(!all_white(&session));

    session.switch_tool(ToolKind::Eraser);
    drag(&mut session, pos2(10.0, 50.0), pos2(90.0, 50.0));
    assert!(all_white(&session));
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_eraser_release_without_move_draws_nothing() {
    let mut session = white_canvas();
    drag(&mut session, pos2(10.0, 50.0), pos2(90.0, 50.0));
    session.switch_tool(ToolKind::Eraser);

    session.press(pos2(10.0, 50.0), PRIMARY);
    session.release(pos2(90.0, 50.0), PRIMARY);

    assert_eq!(pixel(&session, 50, 50), Color32::BLACK);
    assert_eq!(session.history().len(), 1);
}

fn repaints(events: &EventQueue) -> Vec<DirtyRegion> {
    events
        .drain()
        .into_iter()
        .filter_map(|e| match e {
            EditorEvent::Repaint(region) => Some(region),
            _ => None,
        })
        .collect()
}

#[test]
fn test_stroke_tools_repaint_segment_area() {
    let mut session = white_canvas();
    let events = EventQueue::new();
    session.subscribe(Box::new(events.clone()));

    // half width 0.5 plus a 2 pixel margin
    drag(&mut session, pos2(10.0, 10.0), pos2(20.0, 10.0));
    let regions = repaints(&events);
    assert_eq!(
        regions.first(),
        Some(&DirtyRegion::Area(Rect::from_min_max(pos2(7.5, 7.5), pos2(22.5, 12.5))))
    );
    assert!(regions.iter().all(|r| matches!(r, DirtyRegion::Area(_))));

    // half width 5 plus the margin
    session.switch_tool(ToolKind::Eraser);
    drag(&mut session, pos2(30.0, 30.0), pos2(40.0, 30.0));
    assert_eq!(
        repaints(&events),
        vec![DirtyRegion::Area(Rect::from_min_max(pos2(23.0, 23.0), pos2(47.0, 37.0)))]
    );
}

#[test]
fn test_anchored_tools_repaint_whole_surface() {
    let mut session = white_canvas();
    session.set_scene(SceneShape::Cube);
    let events = EventQueue::new();
    session.subscribe(Box::new(events.clone()));

    for kind in [ToolKind::Line, ToolKind::Shape, ToolKind::SceneCapture] {
        session.switch_tool(kind);
        drag(&mut session, pos2(20.0, 20.0), pos2(60.0, 50.0));
        let regions = repaints(&events);
        assert!(!regions.is_empty(), "{kind:?} did not repaint");
        assert!(regions.iter().all(|r| *r == DirtyRegion::Full), "{kind:?}: {regions:?}");
    }
}

#[test]
fn test_unfilled_ellipse_outline() {
    let mut session = white_canvas();
    session.apply_setting(ToolSetting::ShapeType(ShapeType::Ellipse));
    session.switch_tool(ToolKind::Shape);
    drag(&mut session, pos2(20.0, 20.0), pos2(80.0, 60.0));

    assert_eq!(pixel(&session, 20, 40), Color32::BLACK);
    assert_eq!(pixel(&session, 50, 20), Color32::BLACK);
    assert_eq!(pixel(&session, 80, 40), Color32::BLACK);
    assert_eq!(pixel(&session, 50, 40), Color32::WHITE);
    assert_eq!(pixel(&session, 20, 20), Color32::WHITE);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_unfilled_rounded_rectangle_outline() {
    let mut session = white_canvas();
    session.apply_setting(ToolSetting::ShapeType(ShapeType::RoundedRectangle));
    session.switch_tool(ToolKind::Shape);
    drag(&mut session, pos2(20.0, 20.0), pos2(80.0, 60.0));

    assert_eq!(pixel(&session, 50, 20), Color32::BLACK);
    assert_eq!(pixel(&session, 20, 40), Color32::BLACK);
    assert_eq!(pixel(&session, 50, 60), Color32::BLACK);
    assert_eq!(pixel(&session, 50, 40), Color32::WHITE);
    assert_eq!(pixel(&session, 20, 20), Color32::WHITE);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_secondary_click_reaches_observer() {
    let mut session = white_canvas();
    let events = EventQueue::new();
    session.subscribe(Box::new(events.clone()));
    session.switch_tool(ToolKind::Shape);

    session.press(pos2(5.0, 5.0), PointerButton::Secondary);

    let clicks: Vec<EditorEvent> = events
        .drain()
        .into_iter()
        .filter(|e| matches!(e, EditorEvent::SecondaryClick { .. }))
        .collect();
    assert_eq!(
        clicks,
        vec![EditorEvent::SecondaryClick {
            tool: ToolKind::Shape,
            position: pos2(5.0, 5.0),
        }]
    );
    assert_eq!(session.gesture_state(), GestureState::Idle);
    assert!(all_white(&session));
}

#[test]
fn test_commit_is_announced_on_event_bus() {
    let mut session = white_canvas();
    let events = EventQueue::new();
    session.subscribe(Box::new(events.clone()));
    drag(&mut session, pos2(10.0, 10.0), pos2(20.0, 20.0));

    let events = events.drain();
    assert!(events.iter().any(|e| matches!(e, EditorEvent::Repaint(_))));
    assert!(events.iter().any(|e| matches!(e, EditorEvent::CommandCommitted { label: "Pen", .. })));
}

#[test]
fn test_scene_capture_composites_normalized_frame() {
    let calls = Arc::new(AtomicUsize::new(0));
    let renderer = SplitRenderer { calls: calls.clone() };
    let mut session = session_with(PaintConfig::default(), Some(Box::new(renderer)));
    session.switch_tool(ToolKind::SceneCapture);

    session.press(pos2(60.0, 60.0), PRIMARY);
    assert_eq!(session.gesture_state(), GestureState::Extruding);
    session.pointer_move(pos2(40.0, 40.0), &[PRIMARY]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    session.release(pos2(20.0, 20.0), PRIMARY);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let top = pixel(&session, 25, 25);
    let bottom = pixel(&session, 25, 55);
    assert!(top.g() > 250 && top.r() < 5, "top half should be green, got {top:?}");
    assert!(bottom.r() > 250 && bottom.g() < 5, "bottom half should be red, got {bottom:?}");
    assert_eq!(pixel(&session, 10, 10), Color32::WHITE);
    assert_eq!(pixel(&session, 65, 65), Color32::WHITE);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_scene_capture_without_area_skips_render() {
    let calls = Arc::new(AtomicUsize::new(0));
    let renderer = SplitRenderer { calls: calls.clone() };
    let mut session = session_with(PaintConfig::default(), Some(Box::new(renderer)));
    session.switch_tool(ToolKind::SceneCapture);

    session.press(pos2(30.0, 30.0), PRIMARY);
    session.release(pos2(30.0, 30.0), PRIMARY);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(session.history().is_empty());
}

#[test]
fn test_failed_render_leaves_surface_untouched() {
    let mut session = session_with(PaintConfig::default(), Some(Box::new(OfflineRenderer)));
    drag(&mut session, pos2(10.0, 10.0), pos2(20.0, 10.0));
    let before = session.surface().snapshot();

    session.switch_tool(ToolKind::SceneCapture);
    drag(&mut session, pos2(20.0, 20.0), pos2(60.0, 60.0));

    assert!(session.surface().matches(&before));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_builtin_renderer_stamps_scene() {
    let mut session = white_canvas();
    session.switch_tool(ToolKind::SceneCapture);

    // nothing to render yet
    drag(&mut session, pos2(20.0, 20.0), pos2(80.0, 80.0));
    assert!(session.history().is_empty());

    session.set_scene(SceneShape::Sphere);
    drag(&mut session, pos2(20.0, 20.0), pos2(80.0, 80.0));
    assert_eq!(pixel(&session, 50, 50), Color32::BLACK);
    assert_eq!(pixel(&session, 10, 10), Color32::WHITE);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_undo_redo_is_bit_identical_at_any_depth() {
    let mut session = white_canvas();
    for row in [10.0, 30.0, 50.0] {
        drag(&mut session, pos2(10.0, row), pos2(60.0, row + 5.0));
    }

    for depth in 1..=3 {
        let current = session.surface().snapshot();
        for _ in 0..depth {
            assert!(session.undo());
        }
        assert!(!session.surface().matches(&current));
        for _ in 0..depth {
            assert!(session.redo());
        }
        assert!(session.surface().matches(&current), "depth {depth}");
    }
}

#[test]
fn test_history_keeps_only_newest_commands() {
    let config = PaintConfig {
        undo_limit: 3,
        ..PaintConfig::default()
    };
    let mut session = session_with(config, None);
    let mut states = vec![session.surface().snapshot()];
    for i in 0..5 {
        let y = 10.0 + 10.0 * i as f32;
        drag(&mut session, pos2(10.0, y), pos2(60.0, y));
        states.push(session.surface().snapshot());
    }

    for _ in 0..3 {
        assert!(session.undo());
    }
    assert!(!session.undo());
    assert!(session.surface().matches(&states[2]));
    assert!(!session.surface().matches(&states[0]));
}

#[test]
fn test_gestures_on_empty_surface_are_ignored() {
    let mut session = EditorSession::default();
    drag(&mut session, pos2(10.0, 10.0), pos2(20.0, 20.0));
    assert!(session.surface().is_empty());
    assert!(session.history().is_empty());
    assert_eq!(session.gesture_state(), GestureState::Idle);
}
