/// The character standing in for the thumb-actuated key (word boundary) in a corpus.
pub const THUMB_CHAR: char = ' ';

/// Number of actuator classes (eight finger columns + two thumbs).
pub const FINGER_COUNT: usize = 10;

/// Size of the full classification table (every ordered triple of actuator classes).
pub const TABLE_SIZE: usize = FINGER_COUNT * FINGER_COUNT * FINGER_COUNT;

/// Tolerance used when checking that a fraction group sums to one.
pub const FRACTION_TOLERANCE: f64 = 1e-9;

/// Standard 30-key character set shuffled by `Layout::random`.
pub const STANDARD_KEYS: &str = "abcdefghijklmnopqrstuvwxyz,.'/";

/// Finger assignment of one 10-column row on a standard 3x10 board.
pub const STANDARD_ROW_FINGERS: [&str; 10] =
    ["LP", "LR", "LM", "LI", "LI", "RI", "RI", "RM", "RR", "RP"];

/// Finger indexes used by layout text files.
pub const FILE_FINGER_ORDER: [&str; 10] =
    ["LP", "LR", "LM", "LI", "RI", "RM", "RR", "RP", "LT", "RT"];

/// Unshifted / shifted pairs for the US layer, used when a layout token omits its shift.
pub const SHIFT_BASE: &str = "abcdefghijklmnopqrstuvwxyz,./;'-=[]";
pub const SHIFT_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ<>?:\"_+{}";
