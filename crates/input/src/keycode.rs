use serde::{Deserialize, Serialize};

/// A logical key or button the engine can report as down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    // Shifted digits.
    Exclamation,
    At,
    Hash,
    Dollar,
    Percent,
    Caret,
    Ampersand,
    Asterisk,
    LeftParenthesis,
    RightParenthesis,
    Minus,
    Equals,
    Backspace,
    Tab,
    Enter,
    Space,
    LeftBracket,
    RightBracket,
    Backslash,
    Comma,
    Period,
    Slash,
    CapsLock,
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftMeta,
    RightMeta,
    Escape,
    Pause,
    Print,
    ScrollLock,
    NumLock,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadPeriod,
    KeypadDivide,
    KeypadMultiply,
    KeypadMinus,
    KeypadPlus,
    KeypadEnter,
    KeypadEquals,
    MouseLeft,
    MouseMiddle,
    MouseRight,
    WheelUp,
    WheelDown,
}

impl KeyCode {
    pub const SHIFT: [KeyCode; 2] = [KeyCode::LeftShift, KeyCode::RightShift];

    /// Map a physical key name as reported by browsers and winit
    /// (`"KeyA"`, `"Digit1"`, `"ArrowUp"`, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        use KeyCode::*;
        if let Some(letter) = code.strip_prefix("Key") {
            return Self::letter(letter);
        }
        let key = match code {
            "Digit0" => Digit0,
            "Digit1" => Digit1,
            "Digit2" => Digit2,
            "Digit3" => Digit3,
            "Digit4" => Digit4,
            "Digit5" => Digit5,
            "Digit6" => Digit6,
            "Digit7" => Digit7,
            "Digit8" => Digit8,
            "Digit9" => Digit9,
            "Minus" => Minus,
            "Equal" => Equals,
            "Backspace" => Backspace,
            "Tab" => Tab,
            "Enter" => Enter,
            "Space" => Space,
            "BracketLeft" => LeftBracket,
            "BracketRight" => RightBracket,
            "Backslash" => Backslash,
            "Comma" => Comma,
            "Period" => Period,
            "Slash" => Slash,
            "CapsLock" => CapsLock,
            "ShiftLeft" => LeftShift,
            "ShiftRight" => RightShift,
            "ControlLeft" => LeftCtrl,
            "ControlRight" => RightCtrl,
            "AltLeft" => LeftAlt,
            "AltRight" => RightAlt,
            "MetaLeft" => LeftMeta,
            "MetaRight" => RightMeta,
            "Escape" => Escape,
            "Pause" => Pause,
            "PrintScreen" => Print,
            "ScrollLock" => ScrollLock,
            "NumLock" => NumLock,
            "Insert" => Insert,
            "Delete" => Delete,
            "Home" => Home,
            "End" => End,
            "PageUp" => PageUp,
            "PageDown" => PageDown,
            "ArrowUp" => Up,
            "ArrowDown" => Down,
            "ArrowLeft" => Left,
            "ArrowRight" => Right,
            "F1" => F1,
            "F2" => F2,
            "F3" => F3,
            "F4" => F4,
            "F5" => F5,
            "F6" => F6,
            "F7" => F7,
            "F8" => F8,
            "F9" => F9,
            "F10" => F10,
            "F11" => F11,
            "F12" => F12,
            "F13" => F13,
            "F14" => F14,
            "F15" => F15,
            "Numpad0" => Keypad0,
            "Numpad1" => Keypad1,
            "Numpad2" => Keypad2,
            "Numpad3" => Keypad3,
            "Numpad4" => Keypad4,
            "Numpad5" => Keypad5,
            "Numpad6" => Keypad6,
            "Numpad7" => Keypad7,
            "Numpad8" => Keypad8,
            "Numpad9" => Keypad9,
            "NumpadDecimal" => KeypadPeriod,
            "NumpadDivide" => KeypadDivide,
            "NumpadMultiply" => KeypadMultiply,
            "NumpadSubtract" => KeypadMinus,
            "NumpadAdd" => KeypadPlus,
            "NumpadEnter" => KeypadEnter,
            "NumpadEqual" => KeypadEquals,
            _ => return None,
        };
        Some(key)
    }

    fn letter(letter: &str) -> Option<Self> {
        use KeyCode::*;
        const LETTERS: [KeyCode; 26] = [
            A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
        ];
        match letter.as_bytes() {
            [b @ b'A'..=b'Z'] => Some(LETTERS[usize::from(b - b'A')]),
            _ => None,
        }
    }

    /// Mouse button index as reported by hosts: 0 left, 1 middle, 2 right.
    pub fn mouse_button(button: u8) -> Option<Self> {
        match button {
            0 => Some(KeyCode::MouseLeft),
            1 => Some(KeyCode::MouseMiddle),
            2 => Some(KeyCode::MouseRight),
            _ => None,
        }
    }

    /// The symbol a digit produces while shift is held.
    pub fn shifted(self) -> Option<Self> {
        use KeyCode::*;
        Some(match self {
            Digit1 => Exclamation,
            Digit2 => At,
            Digit3 => Hash,
            Digit4 => Dollar,
            Digit5 => Percent,
            Digit6 => Caret,
            Digit7 => Ampersand,
            Digit8 => Asterisk,
            Digit9 => LeftParenthesis,
            Digit0 => RightParenthesis,
            _ => return None,
        })
    }

    pub fn is_shift(self) -> bool {
        Self::SHIFT.contains(&self)
    }
}
