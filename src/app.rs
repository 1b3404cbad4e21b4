use egui::{Color32, Rect, Sense, pos2, vec2};

use crate::config::{MAX_IMG_SIZE, MAX_PEN_SIZE, MAX_RECT_CURVE, MIN_IMG_SIZE, MIN_PEN_SIZE, MIN_RECT_CURVE, PaintConfig};
use crate::event::{EditorEvent, EventQueue, LoggingEventHandler};
use crate::input::InputHandler;
use crate::scene::SceneShape;
use crate::state::{EditorSession, ToolSetting};
use crate::texture_manager::TextureManager;
use crate::tools::ToolKind;
use crate::tools::style::{CapStyle, DrawType, FillMode, JoinStyle, LineStyle, ShapeType};

/// Thin eframe shell around an [`EditorSession`]
pub struct PaintApp {
    session: EditorSession,
    input: InputHandler,
    textures: TextureManager,
    events: EventQueue,
    /// Tool whose configuration window is open
    config_window: Option<ToolKind>,
    file_path: String,
    resize_to: [u32; 2],
    status: Option<String>,
}

impl PaintApp {
    /// Called once before the first frame.
    ///
    /// A config persisted by a previous run wins over `config`.
    pub fn new(cc: &eframe::CreationContext<'_>, config: PaintConfig) -> Self {
        let config = cc
            .storage
            .and_then(|storage| eframe::get_value::<PaintConfig>(storage, eframe::APP_KEY))
            .unwrap_or(config)
            .sanitized();
        Self::with_session(EditorSession::new(config))
    }

    pub fn with_session(mut session: EditorSession) -> Self {
        let events = EventQueue::new();
        session.subscribe(Box::new(events.clone()));
        session.subscribe(Box::new(LoggingEventHandler));

        let mut status = None;
        if let Err(err) = session.new_default_canvas() {
            log::warn!("Could not create the startup canvas: {}", err);
            status = Some(err.to_string());
        }
        session.clear_history();

        let resize_to = [session.surface().width(), session.surface().height()];
        Self {
            session,
            input: InputHandler::new(),
            textures: TextureManager::new(),
            events,
            config_window: None,
            file_path: "untitled.bmp".to_string(),
            resize_to,
            status,
        }
    }

    fn report<T>(&mut self, result: crate::error::PaintResult<T>) {
        self.status = result.err().map(|err| err.to_string());
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New").clicked() {
                    let result = self.session.new_default_canvas();
                    self.report(result);
                    ui.close_menu();
                }
                if ui.button("Open").clicked() {
                    let result = self.session.load(&self.file_path);
                    self.report(result);
                    ui.close_menu();
                }
                if ui.button("Save").clicked() {
                    let result = self.session.save(&self.file_path);
                    self.report(result);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Clear all").clicked() {
                    let result = self.session.clear_all();
                    self.report(result);
                    ui.close_menu();
                }
            });
            ui.menu_button("Edit", |ui| {
                let history = self.session.history();
                let undo = egui::Button::new(menu_label("Undo", history.undo_label()));
                let redo = egui::Button::new(menu_label("Redo", history.redo_label()));
                let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                if ui.add_enabled(can_undo, undo).clicked() {
                    self.session.undo();
                    ui.close_menu();
                }
                if ui.add_enabled(can_redo, redo).clicked() {
                    self.session.redo();
                    ui.close_menu();
                }
            });
            ui.menu_button("Scene", |ui| {
                for shape in SceneShape::ALL {
                    if ui.button(shape.label()).clicked() {
                        self.session.set_scene(shape);
                        self.session.switch_tool(ToolKind::SceneCapture);
                        ui.close_menu();
                    }
                }
            });
        });
    }

    fn tool_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let active = self.session.tools().active_kind();
            for kind in ToolKind::ALL {
                if ui.selectable_label(active == kind, kind.label()).clicked() {
                    self.session.switch_tool(kind);
                }
            }
            ui.separator();

            let mut foreground = self.session.palette().foreground;
            if ui.color_edit_button_srgba(&mut foreground).changed() {
                self.session.set_foreground(foreground);
            }
            let mut background = self.session.palette().background;
            if ui.color_edit_button_srgba(&mut background).changed() {
                self.session.set_background(background);
            }
            ui.separator();

            ui.label("File:");
            ui.text_edit_singleline(&mut self.file_path);
            ui.separator();

            ui.add(egui::DragValue::new(&mut self.resize_to[0]).range(MIN_IMG_SIZE..=MAX_IMG_SIZE));
            ui.label("×");
            ui.add(egui::DragValue::new(&mut self.resize_to[1]).range(MIN_IMG_SIZE..=MAX_IMG_SIZE));
            if ui.button("Resize").clicked() {
                let result = self.session.resize(self.resize_to[0], self.resize_to[1]);
                self.report(result);
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let damage = self.session.take_damage();
        let size = vec2(self.session.surface().width() as f32, self.session.surface().height() as f32);
        let (rect, _response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        match self.textures.sync(ui.ctx(), self.session.surface(), damage) {
            Ok(texture) => {
                let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                ui.painter().image(texture, rect, uv, Color32::WHITE);
            }
            Err(err) => {
                ui.painter().rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);
                log::trace!("Surface not drawn: {}", err);
            }
        }

        let events = self.input.process_input(ui.ctx(), rect);
        if !events.is_empty() {
            ui.ctx().request_repaint();
        }
        for event in events {
            self.session.handle_input(&event);
        }
    }

    fn config_window(&mut self, ctx: &egui::Context) {
        let Some(kind) = self.config_window else {
            return;
        };
        let mut open = true;
        let mut changes = Vec::new();
        let tools = self.session.tools();

        egui::Window::new(format!("{} settings", kind.label()))
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| match kind {
                ToolKind::Pen | ToolKind::Eraser => {
                    let Some(style) = tools.get(kind).style() else {
                        return;
                    };
                    let (mut width, mut cap) = (style.width, style.cap);
                    if width_slider(ui, &mut width) {
                        changes.push(if kind == ToolKind::Pen {
                            ToolSetting::PenWidth(width)
                        } else {
                            ToolSetting::EraserWidth(width)
                        });
                    }
                    if kind == ToolKind::Pen && radio_row(ui, "Cap", &mut cap, CapStyle::ALL, CapStyle::label) {
                        changes.push(ToolSetting::PenCap(cap));
                    }
                }
                ToolKind::Line => {
                    let Some(line) = tools.line() else {
                        return;
                    };
                    let mut width = line.style.width;
                    let (mut cap, mut dash, mut draw_type) = (line.style.cap, line.style.line, line.draw_type);
                    if width_slider(ui, &mut width) {
                        changes.push(ToolSetting::LineWidth(width));
                    }
                    if radio_row(ui, "Cap", &mut cap, CapStyle::ALL, CapStyle::label) {
                        changes.push(ToolSetting::LineCap(cap));
                    }
                    if radio_row(ui, "Style", &mut dash, LineStyle::ALL, LineStyle::label) {
                        changes.push(ToolSetting::LineStyle(dash));
                    }
                    if radio_row(ui, "Draw", &mut draw_type, DrawType::ALL, DrawType::label) {
                        changes.push(ToolSetting::LineDrawType(draw_type));
                    }
                }
                ToolKind::Shape => {
                    let Some(shape) = tools.shape() else {
                        return;
                    };
                    let mut width = shape.style.width;
                    let (mut dash, mut join) = (shape.style.line, shape.style.join);
                    let (mut shape_type, mut fill, mut curve) = (shape.shape_type, shape.fill_mode, shape.curve);
                    if width_slider(ui, &mut width) {
                        changes.push(ToolSetting::ShapeWidth(width));
                    }
                    if radio_row(ui, "Shape", &mut shape_type, ShapeType::ALL, ShapeType::label) {
                        changes.push(ToolSetting::ShapeType(shape_type));
                    }
                    if radio_row(ui, "Fill", &mut fill, FillMode::ALL, FillMode::label) {
                        changes.push(ToolSetting::ShapeFill(fill));
                    }
                    if radio_row(ui, "Border", &mut dash, LineStyle::ALL, LineStyle::label) {
                        changes.push(ToolSetting::ShapeLineStyle(dash));
                    }
                    if radio_row(ui, "Join", &mut join, JoinStyle::ALL, JoinStyle::label) {
                        changes.push(ToolSetting::ShapeJoin(join));
                    }
                    let curve_slider = egui::Slider::new(&mut curve, MIN_RECT_CURVE..=MAX_RECT_CURVE).text("Curve");
                    if ui.add(curve_slider).changed() {
                        changes.push(ToolSetting::ShapeCurve(curve));
                    }
                }
                ToolKind::SceneCapture => {
                    ui.label("Pick a primitive from the Scene menu, then drag a rectangle.");
                }
            });

        for setting in changes {
            self.session.apply_setting(setting);
        }
        if !open {
            self.config_window = None;
        }
    }

    fn handle_events(&mut self) {
        for event in self.events.drain() {
            match event {
                EditorEvent::SecondaryClick { tool, .. } => self.config_window = Some(tool),
                EditorEvent::DocumentChanged(_) | EditorEvent::Undone { .. } | EditorEvent::Redone { .. } => {
                    self.resize_to = [self.session.surface().width(), self.session.surface().height()];
                }
                _ => {}
            }
        }
    }
}

fn menu_label(action: &str, command: Option<&str>) -> String {
    match command {
        Some(command) => format!("{action} {command}"),
        None => action.to_string(),
    }
}

fn width_slider(ui: &mut egui::Ui, width: &mut u32) -> bool {
    ui.add(egui::Slider::new(width, MIN_PEN_SIZE..=MAX_PEN_SIZE).text("Width")).changed()
}

fn radio_row<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    title: &str,
    value: &mut T,
    options: &[T],
    label: impl Fn(T) -> &'static str,
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(title);
        for option in options {
            changed |= ui.radio_value(value, *option, label(*option)).changed();
        }
    });
    changed
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let mut config = self.session.config().clone();
        config.foreground = self.session.palette().foreground;
        config.background = self.session.palette().background;
        eframe::set_value(storage, eframe::APP_KEY, &config);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (undo, redo) = ctx.input(|i| {
            let z = i.modifiers.command && i.key_pressed(egui::Key::Z);
            (z && !i.modifiers.shift, z && i.modifiers.shift)
        });
        if undo {
            self.session.undo();
        }
        if redo {
            self.session.redo();
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            self.menu_bar(ui);
            self.tool_bar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} | {}x{} | {:?}",
                    self.session.tools().active_kind().label(),
                    self.session.surface().width(),
                    self.session.surface().height(),
                    self.session.gesture_state()
                ));
                if let Some(status) = &self.status {
                    ui.colored_label(ui.visuals().error_fg_color, status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| self.canvas(ui));
        });

        self.handle_events();
        self.config_window(ctx);
    }
}
