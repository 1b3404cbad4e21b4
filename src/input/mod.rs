use egui::{Context, PointerButton, Pos2, Rect};

mod sequencer;
pub use sequencer::{GestureState, InputSequencer};

const BUTTONS: [PointerButton; 3] = [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle];

/// Pointer input in surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown { position: Pos2, button: PointerButton },
    /// Mouse button was released
    PointerUp { position: Pos2, button: PointerButton },
    /// Mouse moved (with or without buttons pressed)
    PointerMove {
        position: Pos2,
        /// Buttons that are currently held down
        held_buttons: Vec<PointerButton>,
    },
    DoubleClick { position: Pos2, button: PointerButton },
}

impl InputEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            InputEvent::PointerDown { position, .. }
            | InputEvent::PointerUp { position, .. }
            | InputEvent::PointerMove { position, .. }
            | InputEvent::DoubleClick { position, .. } => *position,
        }
    }
}

/// Converts raw egui pointer input over the canvas into [`InputEvent`]s
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's input. `canvas_rect` is where the surface's
    /// top-left pixel is drawn on screen, at one screen point per pixel.
    ///
    /// Presses only count over the canvas; moves and releases are reported
    /// anywhere so a drag can leave the canvas and come back.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let to_surface = |pos: Pos2| Pos2::ZERO + (pos - canvas_rect.min);

        ctx.input(|input| {
            let Some(pos) = input.pointer.latest_pos() else {
                self.last_pointer_pos = None;
                return;
            };

            if Some(pos) != self.last_pointer_pos {
                let held_buttons = BUTTONS
                    .into_iter()
                    .filter(|button| input.pointer.button_down(*button))
                    .collect();
                events.push(InputEvent::PointerMove {
                    position: to_surface(pos),
                    held_buttons,
                });
                self.last_pointer_pos = Some(pos);
            }

            for button in BUTTONS {
                if input.pointer.button_pressed(button) && canvas_rect.contains(pos) {
                    events.push(InputEvent::PointerDown {
                        position: to_surface(pos),
                        button,
                    });
                }
                if input.pointer.button_released(button) {
                    events.push(InputEvent::PointerUp {
                        position: to_surface(pos),
                        button,
                    });
                }
                if input.pointer.button_double_clicked(button) && canvas_rect.contains(pos) {
                    events.push(InputEvent::DoubleClick {
                        position: to_surface(pos),
                        button,
                    });
                }
            }
        });

        events
    }
}
