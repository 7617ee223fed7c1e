//! Frame sequence gate

use tracing::debug;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No frame sequence running
    #[default]
    Idle,
    /// Decoding is allowed
    Active,
}

/// Brackets a frame sequence; decoding is only allowed while it is active.
///
/// Dropping an active session ends the sequence.
#[derive(Debug, Default)]
pub struct FrameSession {
    state: SessionState,
}

impl FrameSession {
    /// New idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a frame sequence. Returns false if one is already running;
    /// sequences do not nest.
    pub fn start(&mut self) -> bool {
        if self.state == SessionState::Active {
            debug!("frame sequence already active");
            return false;
        }
        self.state = SessionState::Active;
        debug!("frame sequence started");
        true
    }

    /// End the frame sequence. No-op when idle.
    pub fn end(&mut self) {
        if self.state == SessionState::Active {
            self.state = SessionState::Idle;
            debug!("frame sequence ended");
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True between `start` and `end`
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }
}

impl Drop for FrameSession {
    fn drop(&mut self) {
        self.end();
    }
}
