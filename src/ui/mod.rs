//! eframe front end: the simulated device canvas next to views of the
//! simulated and the real joystick.
//!
//! egui input is translated into [`UiEvent`]s and handed to the device, so
//! the control logic never sees egui types.

pub mod common;

use eframe::egui::{self, Rect, Sense, Vec2};
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

use crate::canvas::input::{ButtonInput, KeyInput, PointerButton, UiEvent};
use crate::device::GuiDevice;
use crate::geometry::Point;
use crate::stick_view::{JoystickState, StickView};

use self::common::{create_frame, PainterSurface, UiColors};

/// Turns egui events into canvas events relative to the canvas rect.
///
/// Presses only count inside the canvas; releases always pass so a control
/// grabbed inside sees the button go up outside. Leaving the rect produces a
/// single [`UiEvent::Leave`].
#[derive(Debug, Default)]
pub struct InputTranslator {
    pointer_inside: bool,
}

impl InputTranslator {
    pub fn translate(&mut self, event: &egui::Event, rect: Rect) -> Option<UiEvent> {
        let local = |pos: egui::Pos2| {
            let rel = pos - rect.min;
            Point::new(rel.x as f64, rel.y as f64)
        };
        match event {
            egui::Event::PointerMoved(pos) => {
                if rect.contains(*pos) {
                    self.pointer_inside = true;
                    Some(UiEvent::Motion(local(*pos)))
                } else {
                    self.leave()
                }
            }
            egui::Event::PointerGone => self.leave(),
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                if *pressed && !rect.contains(*pos) {
                    return None;
                }
                let button = map_pointer_button(*button);
                Some(UiEvent::Button(if *pressed {
                    ButtonInput::press(button, local(*pos))
                } else {
                    ButtonInput::release(button, local(*pos))
                }))
            }
            egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                ..
            } => Some(UiEvent::Key(KeyInput::new(key.name()))),
            _ => None,
        }
    }

    fn leave(&mut self) -> Option<UiEvent> {
        if std::mem::take(&mut self.pointer_inside) {
            Some(UiEvent::Leave)
        } else {
            None
        }
    }
}

fn map_pointer_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Primary => PointerButton::Left,
        egui::PointerButton::Middle => PointerButton::Middle,
        egui::PointerButton::Secondary => PointerButton::Right,
        egui::PointerButton::Extra1 => PointerButton::Other(4),
        egui::PointerButton::Extra2 => PointerButton::Other(5),
    }
}

pub struct FlexiStickUI {
    device: GuiDevice,
    input: InputTranslator,
    simulated: watch::Receiver<JoystickState>,
    hardware: Option<watch::Receiver<JoystickState>>,
    simulated_view: StickView,
    hardware_view: StickView,
}

impl FlexiStickUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        device: GuiDevice,
        simulated: watch::Receiver<JoystickState>,
        hardware: Option<watch::Receiver<JoystickState>>,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        Self {
            device,
            input: InputTranslator::default(),
            simulated,
            hardware,
            simulated_view: StickView::new("Simulated", UiColors::ACTIVE),
            hardware_view: StickView::new("Hardware", UiColors::HARDWARE),
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (width, height) = self.device.size();
        let (response, painter) =
            ui.allocate_painter(Vec2::new(width as f32, height as f32), Sense::click_and_drag());
        let rect = response.rect;

        let events = ui.ctx().input(|i| i.events.clone());
        let mut changed = false;
        for event in &events {
            if let Some(ui_event) = self.input.translate(event, rect) {
                changed |= self.device.dispatch(&ui_event);
            }
        }
        if changed {
            debug!("Canvas changed, repainting");
            ui.ctx().request_repaint();
        }

        painter.rect_filled(rect, 0.0, UiColors::INNER_BG);
        self.device.draw(&mut PainterSurface::new(&painter, rect.min));
    }

    fn stick_view(ui: &mut egui::Ui, view: &StickView, state: &JoystickState) {
        let size = Vec2::new(view.width() as f32, view.height(state) as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        view.draw(
            state,
            Point::new(0.0, 0.0),
            &mut PainterSurface::new(&painter, response.rect.min),
        );
    }
}

impl eframe::App for FlexiStickUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.ctx().request_repaint_after(Duration::from_millis(33));

            egui::TopBottomPanel::top("top_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(format!(
                            "{} (id {}), {} controls",
                            self.device.name(),
                            self.device.which(),
                            self.device.registry().len()
                        ));
                    });
                });

            ui.horizontal_top(|ui| {
                create_frame(UiColors::MAIN_BG, UiColors::BORDER).show(ui, |ui| self.canvas(ui));

                ui.vertical(|ui| {
                    let simulated = self.simulated.borrow().clone();
                    create_frame(UiColors::MAIN_BG, UiColors::BORDER)
                        .show(ui, |ui| Self::stick_view(ui, &self.simulated_view, &simulated));
                    if let Some(hardware) = &self.hardware {
                        let hardware = hardware.borrow().clone();
                        create_frame(UiColors::MAIN_BG, UiColors::BORDER)
                            .show(ui, |ui| Self::stick_view(ui, &self.hardware_view, &hardware));
                    }
                });
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::input::ButtonAction;
    use egui::{Modifiers, Pos2};

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(200.0, 100.0))
    }

    fn button(pos: Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_motion_is_canvas_relative() {
        let mut input = InputTranslator::default();
        let event = input.translate(&egui::Event::PointerMoved(Pos2::new(110.0, 70.0)), rect());
        assert_eq!(event, Some(UiEvent::Motion(Point::new(10.0, 20.0))));
    }

    #[test]
    fn test_leaving_rect_reports_leave_once() {
        let mut input = InputTranslator::default();
        input.translate(&egui::Event::PointerMoved(Pos2::new(150.0, 100.0)), rect());
        let outside = egui::Event::PointerMoved(Pos2::new(10.0, 10.0));
        assert_eq!(input.translate(&outside, rect()), Some(UiEvent::Leave));
        assert_eq!(input.translate(&outside, rect()), None);
        assert_eq!(input.translate(&egui::Event::PointerGone, rect()), None);
    }

    #[test]
    fn test_press_outside_is_dropped_but_release_passes() {
        let mut input = InputTranslator::default();
        assert_eq!(input.translate(&button(Pos2::new(5.0, 5.0), true), rect()), None);
        match input.translate(&button(Pos2::new(5.0, 5.0), false), rect()) {
            Some(UiEvent::Button(b)) => {
                assert_eq!(b.action, ButtonAction::Release);
                assert_eq!(b.button, PointerButton::Left);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_key_press_only() {
        let mut input = InputTranslator::default();
        let key = |pressed, repeat| egui::Event::Key {
            key: egui::Key::Space,
            physical_key: None,
            pressed,
            repeat,
            modifiers: Modifiers::NONE,
        };
        assert_eq!(
            input.translate(&key(true, false), rect()),
            Some(UiEvent::Key(KeyInput::new("Space")))
        );
        assert_eq!(input.translate(&key(false, false), rect()), None);
        assert_eq!(input.translate(&key(true, true), rect()), None);
    }
}
