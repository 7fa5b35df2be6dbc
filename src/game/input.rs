//! Input Snapshot and Recording
//!
//! The host samples its devices and hands the core one `InputFrame` per
//! `step` call. The scheduler copies it into the player at every fixed step
//! boundary, so a recording of (step index, frame) pairs is enough to replay
//! a session exactly.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::game::state::Direction;

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Held-key state for one step.
///
/// Packed flags:
/// - Bit 0: Jump held
/// - Bit 1: Left held
/// - Bit 2: Right held
/// - Bit 3-7: Reserved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct InputFrame {
    pub flags: u8,
}

impl InputFrame {
    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x01;

    /// Left flag bit
    pub const FLAG_LEFT: u8 = 0x02;

    /// Right flag bit
    pub const FLAG_RIGHT: u8 = 0x04;

    /// Nothing held.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Build a frame from held keys.
    pub const fn held(jump: bool, left: bool, right: bool) -> Self {
        let mut flags = 0;
        if jump {
            flags |= Self::FLAG_JUMP;
        }
        if left {
            flags |= Self::FLAG_LEFT;
        }
        if right {
            flags |= Self::FLAG_RIGHT;
        }
        Self { flags }
    }

    /// Check if jump is held.
    #[inline]
    pub fn jump_held(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Check if left is held.
    #[inline]
    pub fn left_held(&self) -> bool {
        self.flags & Self::FLAG_LEFT != 0
    }

    /// Check if right is held.
    #[inline]
    pub fn right_held(&self) -> bool {
        self.flags & Self::FLAG_RIGHT != 0
    }

    /// Facing implied by the held keys. Left wins over right.
    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::from_held(self.left_held(), self.right_held())
    }

    /// Check if this is an idle frame.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }

    /// Set jump flag.
    #[inline]
    pub fn set_jump(&mut self, held: bool) {
        self.set_flag(Self::FLAG_JUMP, held);
    }

    /// Set left flag.
    #[inline]
    pub fn set_left(&mut self, held: bool) {
        self.set_flag(Self::FLAG_LEFT, held);
    }

    /// Set right flag.
    #[inline]
    pub fn set_right(&mut self, held: bool) {
        self.set_flag(Self::FLAG_RIGHT, held);
    }

    fn set_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Input that took effect starting at a given fixed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Step index (0-based) when this input state began
    pub step: u64,
    /// The new input state
    pub frame: InputFrame,
}

/// Delta-compressed input for a session, keyed by fixed step index.
///
/// Only stores steps where the input CHANGED.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecording {
    deltas: Vec<InputDelta>,

    /// Number of steps recorded
    step_count: u64,

    #[serde(skip)]
    last_frame: InputFrame,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the input sampled for the next fixed step.
    pub fn record(&mut self, frame: InputFrame) {
        let step = self.step_count;
        if step == 0 || frame != self.last_frame {
            self.deltas.push(InputDelta { step, frame });
            self.last_frame = frame;
        }
        self.step_count += 1;
    }

    /// Record the same input for `steps` consecutive steps.
    pub fn record_for(&mut self, frame: InputFrame, steps: u64) {
        for _ in 0..steps {
            self.record(frame);
        }
    }

    /// Input in effect at a step. Steps before the first delta are idle.
    pub fn input_at(&self, step: u64) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.step <= step);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Number of steps recorded.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// All deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Iterate the input for every recorded step.
    pub fn frames(&self) -> impl Iterator<Item = InputFrame> + '_ {
        (0..self.step_count).map(move |step| self.input_at(step))
    }

    /// Hash of the recording for verification.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_u64(self.step_count);
        for delta in &self.deltas {
            hasher.update_u64(delta.step);
            hasher.update_u8(delta.frame.flags);
        }
        hasher.finalize()
    }
}
