//! Maze size configuration.

use std::fmt;
use std::str::FromStr;

use crate::GameError;

// ---------------------------------------------------------------------------
// MazeDimensions
// ---------------------------------------------------------------------------

/// Validated maze dimensions: both sides odd and at least [`Self::MIN_SIDE`].
///
/// Odd sides are required because passages are carved only on
/// odd-coordinate cells, with an unbroken wall border all around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeDimensions {
    width: usize,
    height: usize,
}

impl MazeDimensions {
    /// Smallest side the generator accepts.
    pub const MIN_SIDE: usize = 11;

    /// Strict constructor.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidDimensions`] if either side is even or
    /// below [`Self::MIN_SIDE`].
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        let valid = |side: usize| side >= Self::MIN_SIDE && side % 2 == 1;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(GameError::InvalidDimensions { width, height })
        }
    }

    /// Lenient constructor for user input. Never fails:
    /// - a side below [`Self::MIN_SIDE`] falls back to the default size;
    /// - an even side is bumped to the next odd number.
    pub fn coerced(width: usize, height: usize) -> Self {
        if width < Self::MIN_SIDE || height < Self::MIN_SIDE {
            let fallback = Self::default();
            tracing::warn!(
                width,
                height,
                fallback = %fallback,
                "maze dimensions below minimum, using default"
            );
            return fallback;
        }
        let odd = |side: usize| if side % 2 == 0 { side + 1 } else { side };
        Self {
            width: odd(width),
            height: odd(height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

impl Default for MazeDimensions {
    fn default() -> Self {
        MazeSize::Medium.dimensions()
    }
}

impl fmt::Display for MazeDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// MazeSize
// ---------------------------------------------------------------------------

/// Named size presets offered to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MazeSize {
    /// 31×21
    Small,
    /// 71×41
    #[default]
    Medium,
    /// 101×61
    Large,
    /// 151×81
    Huge,
}

impl MazeSize {
    pub fn dimensions(self) -> MazeDimensions {
        let (width, height) = match self {
            Self::Small => (31, 21),
            Self::Medium => (71, 41),
            Self::Large => (101, 61),
            Self::Huge => (151, 81),
        };
        MazeDimensions { width, height }
    }
}

impl FromStr for MazeSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "huge" => Ok(Self::Huge),
            other => Err(format!(
                "unknown maze size '{other}' (expected small, medium, large or huge)"
            )),
        }
    }
}
