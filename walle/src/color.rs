use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::WallError;

/// The fixed palette a program can paint with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Black,
    White,
    Transparent,
    Orange,
    Purple,
    OrangeRed,
    DarkBlue,
    DarkRed,
    Gold,
    DarkGreen,
    Firebrick,
}

impl Color {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Red,
            Self::Green,
            Self::Blue,
            Self::Yellow,
            Self::Black,
            Self::White,
            Self::Transparent,
            Self::Orange,
            Self::Purple,
            Self::OrangeRed,
            Self::DarkBlue,
            Self::DarkRed,
            Self::Gold,
            Self::DarkGreen,
            Self::Firebrick,
        ]
    }

    /// Name as written in programs: `Color("DarkBlue")`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Yellow => "Yellow",
            Self::Black => "Black",
            Self::White => "White",
            Self::Transparent => "Transparent",
            Self::Orange => "Orange",
            Self::Purple => "Purple",
            Self::OrangeRed => "OrangeRed",
            Self::DarkBlue => "DarkBlue",
            Self::DarkRed => "DarkRed",
            Self::Gold => "Gold",
            Self::DarkGreen => "DarkGreen",
            Self::Firebrick => "Firebrick",
        }
    }

    /// 0xRRGGBB. Transparent reports white, the color it shows over the background.
    pub fn rgb(&self) -> u32 {
        match self {
            Self::Red => 0xFF0000,
            Self::Green => 0x008000,
            Self::Blue => 0x0000FF,
            Self::Yellow => 0xFFFF00,
            Self::Black => 0x000000,
            Self::White | Self::Transparent => 0xFFFFFF,
            Self::Orange => 0xFFA500,
            Self::Purple => 0x800080,
            Self::OrangeRed => 0xFF4500,
            Self::DarkBlue => 0x00008B,
            Self::DarkRed => 0x8B0000,
            Self::Gold => 0xFFD700,
            Self::DarkGreen => 0x006400,
            Self::Firebrick => 0xB22222,
        }
    }

    /// One character used by text renderings of the canvas.
    pub fn symbol(&self) -> char {
        match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::Yellow => 'Y',
            Self::Black => '#',
            Self::White => ' ',
            Self::Transparent => '.',
            Self::Orange => 'O',
            Self::Purple => 'P',
            Self::OrangeRed => 'o',
            Self::DarkBlue => 'b',
            Self::DarkRed => 'r',
            Self::Gold => '$',
            Self::DarkGreen => 'g',
            Self::Firebrick => 'f',
        }
    }
}

impl FromStr for Color {
    type Err = WallError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|color| color.name() == name)
            .ok_or_else(|| WallError::UnknownColor(name.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
