use crate::error::{KeyStatError, KsResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum Hand {
    #[strum(serialize = "L")]
    #[serde(rename = "L")]
    Left,
    #[strum(serialize = "R")]
    #[serde(rename = "R")]
    Right,
}

/// The ten actuator classes: eight finger columns plus the two thumbs.
///
/// Declaration order runs left pinky -> right pinky; `rank` counts outward
/// from the thumb (0) to the pinky (4) on each hand.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Finger {
    #[strum(serialize = "LP")]
    #[serde(rename = "LP")]
    LeftPinky,
    #[strum(serialize = "LR")]
    #[serde(rename = "LR")]
    LeftRing,
    #[strum(serialize = "LM")]
    #[serde(rename = "LM")]
    LeftMiddle,
    #[strum(serialize = "LI")]
    #[serde(rename = "LI")]
    LeftIndex,
    #[strum(serialize = "LT")]
    #[serde(rename = "LT")]
    LeftThumb,
    #[strum(serialize = "RT")]
    #[serde(rename = "RT")]
    RightThumb,
    #[strum(serialize = "RI")]
    #[serde(rename = "RI")]
    RightIndex,
    #[strum(serialize = "RM")]
    #[serde(rename = "RM")]
    RightMiddle,
    #[strum(serialize = "RR")]
    #[serde(rename = "RR")]
    RightRing,
    #[strum(serialize = "RP")]
    #[serde(rename = "RP")]
    RightPinky,
}

impl Finger {
    pub fn hand(self) -> Hand {
        match self {
            Self::LeftPinky | Self::LeftRing | Self::LeftMiddle | Self::LeftIndex | Self::LeftThumb => {
                Hand::Left
            }
            _ => Hand::Right,
        }
    }

    /// Distance rank from the centre of the hand: 0 = thumb ... 4 = pinky.
    pub fn rank(self) -> u8 {
        match self {
            Self::LeftThumb | Self::RightThumb => 0,
            Self::LeftIndex | Self::RightIndex => 1,
            Self::LeftMiddle | Self::RightMiddle => 2,
            Self::LeftRing | Self::RightRing => 3,
            Self::LeftPinky | Self::RightPinky => 4,
        }
    }

    pub fn is_thumb(self) -> bool {
        self.rank() == 0
    }

    /// Position in declaration order (0..10), used for dense table indexing.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn thumb(hand: Hand) -> Self {
        match hand {
            Hand::Left => Self::LeftThumb,
            Hand::Right => Self::RightThumb,
        }
    }

    /// The eight non-thumb fingers, left to right.
    pub fn columns() -> impl Iterator<Item = Finger> {
        Self::iter().filter(|f| !f.is_thumb())
    }

    /// Parses the two-letter identifier (`"LP"`, `"RT"`, ...).
    pub fn parse(s: &str) -> KsResult<Self> {
        Self::from_str(s.trim()).map_err(|_| KeyStatError::UnknownFinger(s.to_string()))
    }
}
