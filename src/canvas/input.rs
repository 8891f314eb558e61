use crate::geometry::Point;

/// Pointer button identifiers, independent of the windowing toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Press,
    Release,
}

/// A pointer button press or release at a canvas position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonInput {
    pub button: PointerButton,
    pub action: ButtonAction,
    pub at: Point,
}

impl ButtonInput {
    pub fn press(button: PointerButton, at: Point) -> Self {
        Self {
            button,
            action: ButtonAction::Press,
            at,
        }
    }

    pub fn release(button: PointerButton, at: Point) -> Self {
        Self {
            button,
            action: ButtonAction::Release,
            at,
        }
    }
}

/// A key press. Only the key name is kept; controls never look at modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub name: String,
}

impl KeyInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Raw canvas event as delivered by the windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Button(ButtonInput),
    Motion(Point),
    Leave,
    Key(KeyInput),
    Resize { width: f64, height: f64 },
}

/// What a press means to a control, after applying its `sticky` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PressMode {
    /// Active while held (left button).
    Momentary,
    /// Flips on every press (middle button, or left when sticky).
    Toggle,
}

impl PointerButton {
    pub(crate) fn press_mode(self, sticky: bool) -> Option<PressMode> {
        match self {
            PointerButton::Left if sticky => Some(PressMode::Toggle),
            PointerButton::Left => Some(PressMode::Momentary),
            PointerButton::Middle => Some(PressMode::Toggle),
            _ => None,
        }
    }
}
