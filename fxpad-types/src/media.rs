use core::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumString, FromRepr};

/// Media control keys from the consumer usage page.
/// Ref: <https://www.usb.org/sites/default/files/documents/hut1_12v2.pdf#page=75>
///
/// Like [`crate::keycode::KeyCode`], these resolve from symbolic document
/// names via [`MediaKey::from_name`], accepting both the short variant
/// names and the long spellings (`SCAN_NEXT_TRACK`, `VOLUME_INCREMENT`, ...).
#[non_exhaustive]
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, FromRepr, EnumString)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[strum(ascii_case_insensitive)]
pub enum MediaKey {
    No = 0x00,
    // 15.5 Display Controls
    SnapShot = 0x65,
    /// <https://www.usb.org/sites/default/files/hutrr41_0.pdf>
    #[strum(serialize = "BrightnessUp", serialize = "Brightness_Increment")]
    BrightnessUp = 0x6F,
    #[strum(serialize = "BrightnessDown", serialize = "Brightness_Decrement")]
    BrightnessDown = 0x70,
    // 15.7 Transport Controls
    Play = 0xB0,
    Pause = 0xB1,
    Record = 0xB2,
    #[strum(serialize = "FastForward", serialize = "Fast_Forward")]
    FastForward = 0xB3,
    Rewind = 0xB4,
    #[strum(serialize = "NextTrack", serialize = "Scan_Next_Track")]
    NextTrack = 0xB5,
    #[strum(serialize = "PrevTrack", serialize = "Scan_Previous_Track")]
    PrevTrack = 0xB6,
    #[strum(serialize = "StopPlay", serialize = "Stop")]
    StopPlay = 0xB7,
    Eject = 0xB8,
    RandomPlay = 0xB9,
    Repeat = 0xBC,
    StopEject = 0xCC,
    #[strum(serialize = "PlayPause", serialize = "Play_Pause")]
    PlayPause = 0xCD,
    // 15.9.1 Audio Controls - Volume
    Mute = 0xE2,
    #[strum(
        serialize = "VolumeIncrement",
        serialize = "Volume_Increment",
        serialize = "VolumeUp"
    )]
    VolumeIncrement = 0xE9,
    #[strum(
        serialize = "VolumeDecrement",
        serialize = "Volume_Decrement",
        serialize = "VolumeDown"
    )]
    VolumeDecrement = 0xEA,
}

impl From<u16> for MediaKey {
    fn from(value: u16) -> Self {
        Self::from_repr(value).unwrap_or(MediaKey::No)
    }
}

impl MediaKey {
    /// Resolve a symbolic name from a definitions document.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }

    /// Usage ID to put in a consumer control report.
    pub fn usage_id(&self) -> u16 {
        *self as u16
    }
}
