use crate::consts::{FILE_FINGER_ORDER, SHIFT_BASE, SHIFT_UPPER, STANDARD_KEYS, STANDARD_ROW_FINGERS};
use crate::error::{KeyStatError, KsResult};
use crate::fingers::Finger;
use crate::util::content_hash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use strum_macros::{AsRefStr, Display, EnumIter};
use tracing::{debug, info};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, AsRefStr, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Row {
    #[strum(serialize = "top")]
    Top,
    #[strum(serialize = "home")]
    Home,
    #[strum(serialize = "bottom")]
    Bottom,
}

impl Row {
    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Self::Top),
            1 => Some(Self::Home),
            2 => Some(Self::Bottom),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Row {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Row::from_index(v as usize).ok_or_else(|| format!("row {} is not one of 0, 1, 2", v))
    }
}

impl From<Row> for u8 {
    fn from(r: Row) -> u8 {
        r as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyInfo {
    pub finger: Finger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    #[serde(default)]
    pub shift: bool,
}

/// A layout's physical definition: which finger (and row) types each character.
///
/// `hash` is a content digest; same name + different hash means a new version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub hash: String,
    pub keys: HashMap<char, KeyInfo>,
}

impl Layout {
    #[inline(always)]
    pub fn key(&self, c: char) -> Option<&KeyInfo> {
        self.keys.get(&c)
    }

    #[inline(always)]
    pub fn finger(&self, c: char) -> Option<Finger> {
        self.keys.get(&c).map(|k| k.finger)
    }

    /// Thumbs are injected per analysis, never stored in the layout.
    pub fn validate(&self) -> KsResult<()> {
        if self.name.trim().is_empty() {
            return Err(KeyStatError::Validation("Layout has no name".to_string()));
        }
        if let Some((c, k)) = self.keys.iter().find(|(_, k)| k.finger.is_thumb()) {
            return Err(KeyStatError::Validation(format!(
                "Layout '{}' assigns '{}' to thumb {}",
                self.name, c, k.finger
            )));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> KsResult<Self> {
        let layout: Layout = serde_json::from_str(s)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load_json_file<P: AsRef<Path>>(path: P) -> KsResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> KsResult<Self> {
        let path = path.as_ref();
        let layout = if path.extension().is_some_and(|e| e == "json") {
            Self::load_json_file(path)?
        } else {
            parse_layout_text(&fs::read_to_string(path)?)?
        };
        debug!("Loaded layout '{}' from {:?}", layout.name, path);
        Ok(layout)
    }

    /// Standard 3x10 board from a 30-character key string, row-major.
    pub fn from_key_string(name: &str, keys: &str) -> KsResult<Self> {
        let chars: Vec<char> = keys.chars().collect();
        if chars.len() != 30 {
            return Err(KeyStatError::Validation(format!(
                "Key string must be exactly 30 characters, got {}",
                chars.len()
            )));
        }

        let mut map = HashMap::with_capacity(30);
        for (i, &c) in chars.iter().enumerate() {
            let finger = Finger::parse(STANDARD_ROW_FINGERS[i % 10])?;
            map.insert(
                c,
                KeyInfo {
                    finger,
                    row: Row::from_index(i / 10),
                    col: Some(i % 10),
                    shift: false,
                },
            );
        }

        let layout = Layout {
            name: name.to_string(),
            hash: content_hash(&[keys]),
            keys: map,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Shuffled standard key set; same seed, same layout.
    pub fn random(seed: u64) -> KsResult<Self> {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut letters: Vec<char> = STANDARD_KEYS.chars().collect();
        rng.shuffle(&mut letters);
        let keys: String = letters.into_iter().collect();
        Self::from_key_string("random", &keys)
    }
}

fn shifted_of(c: char) -> Option<char> {
    SHIFT_BASE
        .chars()
        .position(|b| b == c)
        .and_then(|i| SHIFT_UPPER.chars().nth(i))
}

/// Parses the plain-text layout format.
///
/// ```text
/// QWERTY
/// q w e r t  y u i o p
/// a s d f g  h j k l ;
/// z x c v b  n m , . /
/// 0 1 2 3 3  4 4 5 6 7
/// 0 1 2 3 3  4 4 5 6 7
/// 0 1 2 3 3  4 4 5 6 7
/// ```
///
/// The first line is the name; the remaining rows split into character rows
/// followed by the same number of finger-index rows.
pub fn parse_layout_text(content: &str) -> KsResult<Layout> {
    let mut lines = content.lines();
    let name = lines
        .next()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    if name.is_empty() {
        return Err(KeyStatError::Validation("Layout file has no name line".to_string()));
    }

    let rows: Vec<Vec<&str>> = lines
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .filter(|r| !r.is_empty())
        .collect();
    if rows.is_empty() || rows.len() % 2 != 0 {
        return Err(KeyStatError::Validation(format!(
            "Layout '{}' needs matching character and finger rows, found {} rows",
            name,
            rows.len()
        )));
    }

    let tokens: Vec<&str> = rows.iter().flatten().copied().collect();
    let hash = content_hash(&tokens);

    let (char_rows, finger_rows) = rows.split_at(rows.len() / 2);
    let mut keys = HashMap::new();

    for (r, (chars, fingers)) in char_rows.iter().zip(finger_rows).enumerate() {
        if chars.len() != fingers.len() {
            return Err(KeyStatError::Validation(format!(
                "Layout '{}' row {} has {} keys but {} finger indexes",
                name,
                r,
                chars.len(),
                fingers.len()
            )));
        }

        for (col, (token, idx)) in chars.iter().zip(fingers).enumerate() {
            let finger_id = idx
                .parse::<usize>()
                .ok()
                .and_then(|i| FILE_FINGER_ORDER.get(i))
                .ok_or_else(|| KeyStatError::UnknownFinger(idx.to_string()))?;
            let finger = Finger::parse(finger_id)?;

            let mut token_chars = token.chars();
            let primary = token_chars
                .next()
                .ok_or_else(|| KeyStatError::Validation("empty key token".to_string()))?;
            let shift = match (token_chars.next(), token_chars.next()) {
                (Some(s), None) => Some(s),
                (None, _) => shifted_of(primary),
                (Some(_), Some(_)) => {
                    return Err(KeyStatError::Validation(format!(
                        "Key token '{}' is longer than 2 characters",
                        token
                    )))
                }
            };

            let info = KeyInfo {
                finger,
                row: Row::from_index(r),
                col: Some(col),
                shift: false,
            };
            keys.insert(primary, info);
            if let Some(s) = shift {
                keys.insert(s, KeyInfo { shift: true, ..info });
            }
        }
    }

    let layout = Layout { name, hash, keys };
    layout.validate()?;
    Ok(layout)
}

/// Loads every file in `dir`, ordered by path.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> KsResult<Vec<Layout>> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let layouts = paths
        .iter()
        .map(Layout::load_file)
        .collect::<KsResult<Vec<_>>>()?;
    info!("Loaded {} layouts from {:?}", layouts.len(), dir);
    Ok(layouts)
}
