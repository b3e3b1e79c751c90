//! Surface lifecycle states.
//!
//! ```text
//! Unshown --show--> Shown --close--> Closed
//!    |                ^ |
//!    |          show  | | hide (native surface off-screen, still Shown)
//!    |                +-+
//!    +------------------close------> Closed
//! ```
//!
//! `Closed` is terminal. Every transition is idempotent once its target state
//! is reached.

use std::fmt;

/// Where a surface is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceState {
    /// Described but never successfully shown.
    #[default]
    Unshown,
    /// Has a native surface and is registered with the host.
    Shown,
    /// Torn down. Nothing further happens to it.
    Closed,
}

impl SurfaceState {
    pub fn is_shown(self) -> bool {
        self == SurfaceState::Shown
    }

    pub fn is_closed(self) -> bool {
        self == SurfaceState::Closed
    }

    /// Whether `show` may allocate a native surface from this state.
    pub fn can_show(self) -> bool {
        self == SurfaceState::Unshown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceState::Unshown => "unshown",
            SurfaceState::Shown => "shown",
            SurfaceState::Closed => "closed",
        }
    }
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
