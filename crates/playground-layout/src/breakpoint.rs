// Viewport breakpoint classification.

use serde::Serialize;

/// Minimum viewport width for the `md` breakpoint.
pub const MD_MIN_WIDTH: f32 = 768.0;
/// Minimum viewport width for the `lg` breakpoint (side-by-side panes).
pub const LG_MIN_WIDTH: f32 = 1024.0;

/// Named viewport-width thresholds, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Base,
    Md,
    Lg,
}

impl Breakpoint {
    pub fn from_width(width: f32) -> Self {
        if width >= LG_MIN_WIDTH {
            Breakpoint::Lg
        } else if width >= MD_MIN_WIDTH {
            Breakpoint::Md
        } else {
            Breakpoint::Base
        }
    }

    /// Whether the editor and preview sit side by side at this breakpoint.
    pub fn is_side_by_side(self) -> bool {
        self == Breakpoint::Lg
    }

    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Base => "base",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
        }
    }
}

/// Tracks the current breakpoint across window resizes.
#[derive(Debug, Clone)]
pub struct BreakpointDetector {
    current: Breakpoint,
}

impl BreakpointDetector {
    pub fn new(width: f32) -> Self {
        Self {
            current: Breakpoint::from_width(width),
        }
    }

    pub fn current(&self) -> Breakpoint {
        self.current
    }

    /// Re-classify after a resize. Returns the new breakpoint only when it changed.
    pub fn observe(&mut self, width: f32) -> Option<Breakpoint> {
        let next = Breakpoint::from_width(width);
        if next == self.current {
            return None;
        }
        log::debug!("breakpoint {} -> {} at {}px", self.current.name(), next.name(), width);
        self.current = next;
        Some(next)
    }
}
