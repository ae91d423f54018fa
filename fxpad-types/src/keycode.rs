use core::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumString, FromRepr};

/// Key codes from the HID keyboard/keypad usage page, plus the eight
/// modifiers.
///
/// Macro definition documents refer to keys by symbolic name; the names are
/// resolved against this table with [`KeyCode::from_name`]. Name matching is
/// ASCII-case-insensitive and accepts the common long spellings
/// (`LEFT_CONTROL`, `PAGE_UP`, `KEYPAD_ONE`, ...) next to the short variant
/// names.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, FromRepr, EnumString)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[strum(ascii_case_insensitive)]
pub enum KeyCode {
    /// Reserved, no-key.
    No = 0x00,
    /// `a` and `A`
    A = 0x04,
    /// `b` and `B`
    B = 0x05,
    /// `c` and `C`
    C = 0x06,
    /// `d` and `D`
    D = 0x07,
    /// `e` and `E`
    E = 0x08,
    /// `f` and `F`
    F = 0x09,
    /// `g` and `G`
    G = 0x0A,
    /// `h` and `H`
    H = 0x0B,
    /// `i` and `I`
    I = 0x0C,
    /// `j` and `J`
    J = 0x0D,
    /// `k` and `K`
    K = 0x0E,
    /// `l` and `L`
    L = 0x0F,
    /// `m` and `M`
    M = 0x10,
    /// `n` and `N`
    N = 0x11,
    /// `o` and `O`
    O = 0x12,
    /// `p` and `P`
    P = 0x13,
    /// `q` and `Q`
    Q = 0x14,
    /// `r` and `R`
    R = 0x15,
    /// `s` and `S`
    S = 0x16,
    /// `t` and `T`
    T = 0x17,
    /// `u` and `U`
    U = 0x18,
    /// `v` and `V`
    V = 0x19,
    /// `w` and `W`
    W = 0x1A,
    /// `x` and `X`
    X = 0x1B,
    /// `y` and `Y`
    Y = 0x1C,
    /// `z` and `Z`
    Z = 0x1D,
    /// `1` and `!`
    #[strum(serialize = "Kc1", serialize = "1", serialize = "One")]
    Kc1 = 0x1E,
    /// `2` and `@`
    #[strum(serialize = "Kc2", serialize = "2", serialize = "Two")]
    Kc2 = 0x1F,
    /// `3` and `#`
    #[strum(serialize = "Kc3", serialize = "3", serialize = "Three")]
    Kc3 = 0x20,
    /// `4` and `$`
    #[strum(serialize = "Kc4", serialize = "4", serialize = "Four")]
    Kc4 = 0x21,
    /// `5` and `%`
    #[strum(serialize = "Kc5", serialize = "5", serialize = "Five")]
    Kc5 = 0x22,
    /// `6` and `^`
    #[strum(serialize = "Kc6", serialize = "6", serialize = "Six")]
    Kc6 = 0x23,
    /// `7` and `&`
    #[strum(serialize = "Kc7", serialize = "7", serialize = "Seven")]
    Kc7 = 0x24,
    /// `8` and `*`
    #[strum(serialize = "Kc8", serialize = "8", serialize = "Eight")]
    Kc8 = 0x25,
    /// `9` and `(`
    #[strum(serialize = "Kc9", serialize = "9", serialize = "Nine")]
    Kc9 = 0x26,
    /// `0` and `)`
    #[strum(serialize = "Kc0", serialize = "0", serialize = "Zero")]
    Kc0 = 0x27,
    /// `Enter`
    #[strum(serialize = "Enter", serialize = "Return")]
    Enter = 0x28,
    /// `Esc`
    #[strum(serialize = "Escape", serialize = "Esc")]
    Escape = 0x29,
    /// `Backspace`
    Backspace = 0x2A,
    /// `Tab`
    Tab = 0x2B,
    /// `Space`
    #[strum(serialize = "Space", serialize = "Spacebar")]
    Space = 0x2C,
    /// `-` and `_`
    Minus = 0x2D,
    /// `=` and `+`
    #[strum(serialize = "Equal", serialize = "Equals")]
    Equal = 0x2E,
    /// `[` and `{`
    #[strum(serialize = "LeftBracket", serialize = "Left_Bracket")]
    LeftBracket = 0x2F,
    /// `]` and `}`
    #[strum(serialize = "RightBracket", serialize = "Right_Bracket")]
    RightBracket = 0x30,
    /// `\` and `|`
    Backslash = 0x31,
    /// Non-US `#` and `~`
    #[strum(serialize = "NonusHash", serialize = "Pound")]
    NonusHash = 0x32,
    /// `;` and `:`
    Semicolon = 0x33,
    /// `'` and `"`
    Quote = 0x34,
    /// `` ` `` and `~`
    #[strum(serialize = "Grave", serialize = "Grave_Accent")]
    Grave = 0x35,
    /// `,` and `<`
    Comma = 0x36,
    /// `.` and `>`
    #[strum(serialize = "Dot", serialize = "Period")]
    Dot = 0x37,
    /// `/` and `?`
    #[strum(serialize = "Slash", serialize = "Forward_Slash")]
    Slash = 0x38,
    /// `CapsLock`
    #[strum(serialize = "CapsLock", serialize = "Caps_Lock")]
    CapsLock = 0x39,
    /// `F1`
    F1 = 0x3A,
    /// `F2`
    F2 = 0x3B,
    /// `F3`
    F3 = 0x3C,
    /// `F4`
    F4 = 0x3D,
    /// `F5`
    F5 = 0x3E,
    /// `F6`
    F6 = 0x3F,
    /// `F7`
    F7 = 0x40,
    /// `F8`
    F8 = 0x41,
    /// `F9`
    F9 = 0x42,
    /// `F10`
    F10 = 0x43,
    /// `F11`
    F11 = 0x44,
    /// `F12`
    F12 = 0x45,
    /// Print Screen
    #[strum(serialize = "PrintScreen", serialize = "Print_Screen")]
    PrintScreen = 0x46,
    /// Scroll Lock
    #[strum(serialize = "ScrollLock", serialize = "Scroll_Lock")]
    ScrollLock = 0x47,
    /// Pause
    Pause = 0x48,
    /// Insert
    Insert = 0x49,
    /// Home
    Home = 0x4A,
    /// Page Up
    #[strum(serialize = "PageUp", serialize = "Page_Up")]
    PageUp = 0x4B,
    /// Delete
    Delete = 0x4C,
    /// End
    End = 0x4D,
    /// Page Down
    #[strum(serialize = "PageDown", serialize = "Page_Down")]
    PageDown = 0x4E,
    /// Right arrow
    #[strum(serialize = "Right", serialize = "Right_Arrow")]
    Right = 0x4F,
    /// Left arrow
    #[strum(serialize = "Left", serialize = "Left_Arrow")]
    Left = 0x50,
    /// Down arrow
    #[strum(serialize = "Down", serialize = "Down_Arrow")]
    Down = 0x51,
    /// Up arrow
    #[strum(serialize = "Up", serialize = "Up_Arrow")]
    Up = 0x52,
    /// Num Lock
    #[strum(serialize = "NumLock", serialize = "Num_Lock", serialize = "Keypad_Numlock")]
    NumLock = 0x53,
    /// `/` on keypad
    #[strum(serialize = "KpSlash", serialize = "Keypad_Forward_Slash")]
    KpSlash = 0x54,
    /// `*` on keypad
    #[strum(serialize = "KpAsterisk", serialize = "Keypad_Asterisk")]
    KpAsterisk = 0x55,
    /// `-` on keypad
    #[strum(serialize = "KpMinus", serialize = "Keypad_Minus")]
    KpMinus = 0x56,
    /// `+` on keypad
    #[strum(serialize = "KpPlus", serialize = "Keypad_Plus")]
    KpPlus = 0x57,
    /// `Enter` on keypad
    #[strum(serialize = "KpEnter", serialize = "Keypad_Enter")]
    KpEnter = 0x58,
    /// `1` on keypad
    #[strum(serialize = "Kp1", serialize = "Keypad_One")]
    Kp1 = 0x59,
    /// `2` on keypad
    #[strum(serialize = "Kp2", serialize = "Keypad_Two")]
    Kp2 = 0x5A,
    /// `3` on keypad
    #[strum(serialize = "Kp3", serialize = "Keypad_Three")]
    Kp3 = 0x5B,
    /// `4` on keypad
    #[strum(serialize = "Kp4", serialize = "Keypad_Four")]
    Kp4 = 0x5C,
    /// `5` on keypad
    #[strum(serialize = "Kp5", serialize = "Keypad_Five")]
    Kp5 = 0x5D,
    /// `6` on keypad
    #[strum(serialize = "Kp6", serialize = "Keypad_Six")]
    Kp6 = 0x5E,
    /// `7` on keypad
    #[strum(serialize = "Kp7", serialize = "Keypad_Seven")]
    Kp7 = 0x5F,
    /// `8` on keypad
    #[strum(serialize = "Kp8", serialize = "Keypad_Eight")]
    Kp8 = 0x60,
    /// `9` on keypad
    #[strum(serialize = "Kp9", serialize = "Keypad_Nine")]
    Kp9 = 0x61,
    /// `0` on keypad
    #[strum(serialize = "Kp0", serialize = "Keypad_Zero")]
    Kp0 = 0x62,
    /// `.` on keypad
    #[strum(serialize = "KpDot", serialize = "Keypad_Period")]
    KpDot = 0x63,
    /// Non-US `\` and `|`
    NonusBackslash = 0x64,
    /// `Application`
    Application = 0x65,
    /// `Power`
    #[strum(serialize = "KbPower", serialize = "Power")]
    KbPower = 0x66,
    /// `=` on keypad
    #[strum(serialize = "KpEqual", serialize = "Keypad_Equals")]
    KpEqual = 0x67,
    /// `F13`
    F13 = 0x68,
    /// `F14`
    F14 = 0x69,
    /// `F15`
    F15 = 0x6A,
    /// `F16`
    F16 = 0x6B,
    /// `F17`
    F17 = 0x6C,
    /// `F18`
    F18 = 0x6D,
    /// `F19`
    F19 = 0x6E,
    /// `F20`
    F20 = 0x6F,
    /// `F21`
    F21 = 0x70,
    /// `F22`
    F22 = 0x71,
    /// `F23`
    F23 = 0x72,
    /// `F24`
    F24 = 0x73,
    Execute = 0x74,
    Help = 0x75,
    Menu = 0x76,
    Select = 0x77,
    Stop = 0x78,
    Again = 0x79,
    Undo = 0x7A,
    Cut = 0x7B,
    Copy = 0x7C,
    Paste = 0x7D,
    Find = 0x7E,
    /// Mute, keyboard page
    KbMute = 0x7F,
    /// Volume up, keyboard page
    KbVolumeUp = 0x80,
    /// Volume down, keyboard page
    KbVolumeDown = 0x81,
    /// Left Control
    #[strum(
        serialize = "LCtrl",
        serialize = "Left_Control",
        serialize = "Ctrl",
        serialize = "Control"
    )]
    LCtrl = 0xE0,
    /// Left Shift
    #[strum(serialize = "LShift", serialize = "Left_Shift", serialize = "Shift")]
    LShift = 0xE1,
    /// Left Alt
    #[strum(serialize = "LAlt", serialize = "Left_Alt", serialize = "Alt", serialize = "Option")]
    LAlt = 0xE2,
    /// Left GUI
    #[strum(
        serialize = "LGui",
        serialize = "Left_Gui",
        serialize = "Gui",
        serialize = "Windows",
        serialize = "Command"
    )]
    LGui = 0xE3,
    /// Right Control
    #[strum(serialize = "RCtrl", serialize = "Right_Control")]
    RCtrl = 0xE4,
    /// Right Shift
    #[strum(serialize = "RShift", serialize = "Right_Shift")]
    RShift = 0xE5,
    /// Right Alt
    #[strum(serialize = "RAlt", serialize = "Right_Alt", serialize = "AltGr")]
    RAlt = 0xE6,
    /// Right GUI
    #[strum(serialize = "RGui", serialize = "Right_Gui")]
    RGui = 0xE7,
}

impl From<u8> for KeyCode {
    fn from(value: u8) -> Self {
        Self::from_repr(value).unwrap_or(KeyCode::No)
    }
}

impl KeyCode {
    /// Resolve a symbolic name from a definitions document.
    ///
    /// Returns `None` for names with no entry in the table; the caller
    /// decides whether to skip the step or the whole entry.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }

    /// Whether the keycode is one of the eight HID modifiers.
    pub fn is_modifier(&self) -> bool {
        *self >= KeyCode::LCtrl && *self <= KeyCode::RGui
    }

    /// Bit of this key in the HID modifier byte, 0 for non-modifiers.
    pub fn as_modifier_bit(&self) -> u8 {
        if self.is_modifier() {
            1 << (*self as u8 - KeyCode::LCtrl as u8)
        } else {
            0
        }
    }
}

/// Convert an ascii char to a keycode and whether it needs shift.
/// Assumes the en-us layout.
pub fn from_ascii(ascii: u8) -> (KeyCode, bool) {
    match ascii {
        b'0' => (KeyCode::Kc0, false),
        b'1' => (KeyCode::Kc1, false),
        b'2' => (KeyCode::Kc2, false),
        b'3' => (KeyCode::Kc3, false),
        b'4' => (KeyCode::Kc4, false),
        b'5' => (KeyCode::Kc5, false),
        b'6' => (KeyCode::Kc6, false),
        b'7' => (KeyCode::Kc7, false),
        b'8' => (KeyCode::Kc8, false),
        b'9' => (KeyCode::Kc9, false),
        b'a' => (KeyCode::A, false),
        b'b' => (KeyCode::B, false),
        b'c' => (KeyCode::C, false),
        b'd' => (KeyCode::D, false),
        b'e' => (KeyCode::E, false),
        b'f' => (KeyCode::F, false),
        b'g' => (KeyCode::G, false),
        b'h' => (KeyCode::H, false),
        b'i' => (KeyCode::I, false),
        b'j' => (KeyCode::J, false),
        b'k' => (KeyCode::K, false),
        b'l' => (KeyCode::L, false),
        b'm' => (KeyCode::M, false),
        b'n' => (KeyCode::N, false),
        b'o' => (KeyCode::O, false),
        b'p' => (KeyCode::P, false),
        b'q' => (KeyCode::Q, false),
        b'r' => (KeyCode::R, false),
        b's' => (KeyCode::S, false),
        b't' => (KeyCode::T, false),
        b'u' => (KeyCode::U, false),
        b'v' => (KeyCode::V, false),
        b'w' => (KeyCode::W, false),
        b'x' => (KeyCode::X, false),
        b'y' => (KeyCode::Y, false),
        b'z' => (KeyCode::Z, false),
        b'A' => (KeyCode::A, true),
        b'B' => (KeyCode::B, true),
        b'C' => (KeyCode::C, true),
        b'D' => (KeyCode::D, true),
        b'E' => (KeyCode::E, true),
        b'F' => (KeyCode::F, true),
        b'G' => (KeyCode::G, true),
        b'H' => (KeyCode::H, true),
        b'I' => (KeyCode::I, true),
        b'J' => (KeyCode::J, true),
        b'K' => (KeyCode::K, true),
        b'L' => (KeyCode::L, true),
        b'M' => (KeyCode::M, true),
        b'N' => (KeyCode::N, true),
        b'O' => (KeyCode::O, true),
        b'P' => (KeyCode::P, true),
        b'Q' => (KeyCode::Q, true),
        b'R' => (KeyCode::R, true),
        b'S' => (KeyCode::S, true),
        b'T' => (KeyCode::T, true),
        b'U' => (KeyCode::U, true),
        b'V' => (KeyCode::V, true),
        b'W' => (KeyCode::W, true),
        b'X' => (KeyCode::X, true),
        b'Y' => (KeyCode::Y, true),
        b'Z' => (KeyCode::Z, true),
        b'!' => (KeyCode::Kc1, true),
        b'@' => (KeyCode::Kc2, true),
        b'#' => (KeyCode::Kc3, true),
        b'$' => (KeyCode::Kc4, true),
        b'%' => (KeyCode::Kc5, true),
        b'^' => (KeyCode::Kc6, true),
        b'&' => (KeyCode::Kc7, true),
        b'*' => (KeyCode::Kc8, true),
        b'(' => (KeyCode::Kc9, true),
        b')' => (KeyCode::Kc0, true),
        b'-' => (KeyCode::Minus, false),
        b'_' => (KeyCode::Minus, true),
        b'=' => (KeyCode::Equal, false),
        b'+' => (KeyCode::Equal, true),
        b'[' => (KeyCode::LeftBracket, false),
        b']' => (KeyCode::RightBracket, false),
        b'{' => (KeyCode::LeftBracket, true),
        b'}' => (KeyCode::RightBracket, true),
        b';' => (KeyCode::Semicolon, false),
        b':' => (KeyCode::Semicolon, true),
        b'\'' => (KeyCode::Quote, false),
        b'"' => (KeyCode::Quote, true),
        b'`' => (KeyCode::Grave, false),
        b'~' => (KeyCode::Grave, true),
        b'\\' => (KeyCode::Backslash, false),
        b'|' => (KeyCode::Backslash, true),
        b',' => (KeyCode::Comma, false),
        b'<' => (KeyCode::Comma, true),
        b'.' => (KeyCode::Dot, false),
        b'>' => (KeyCode::Dot, true),
        b'/' => (KeyCode::Slash, false),
        b'?' => (KeyCode::Slash, true),
        b' ' => (KeyCode::Space, false),
        b'\n' => (KeyCode::Enter, false),
        b'\t' => (KeyCode::Tab, false),
        b'\x08' => (KeyCode::Backspace, false),
        b'\x1B' => (KeyCode::Escape, false),
        b'\x7F' => (KeyCode::Delete, false),
        _ => (KeyCode::No, false),
    }
}
