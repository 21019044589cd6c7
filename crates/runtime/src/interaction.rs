//! Horizontal drag-to-rotate with a delayed return to auto rotation.

use foundation::Millis;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragSession {
    pub kind: PointerKind,
    pub start_x: f64,
    pub start_yaw_deg: f64,
}

/// Tracks one drag at a time. Vertical motion is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionController {
    sensitivity: f64,
    resume_delay_ms: f64,
    auto_rotate: bool,
    drag: Option<DragSession>,
    resume_at: Option<Millis>,
}

impl InteractionController {
    pub fn new(sensitivity: f64, resume_delay_ms: f64) -> Self {
        Self {
            sensitivity,
            resume_delay_ms,
            auto_rotate: true,
            drag: None,
            resume_at: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn pending_resume(&self) -> Option<Millis> {
        self.resume_at
    }

    /// Suspend auto rotation and anchor the drag at `x`. Any pending resume is
    /// dropped, and a second pointer while one drag is live is ignored.
    pub fn start(&mut self, kind: PointerKind, x: f64, current_yaw_deg: f64) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.auto_rotate = false;
        self.resume_at = None;
        self.drag = Some(DragSession {
            kind,
            start_x: x,
            start_yaw_deg: current_yaw_deg,
        });
        true
    }

    /// Yaw for a pointer at `x`, or `None` when no drag is active.
    pub fn move_to(&self, x: f64) -> Option<f64> {
        self.drag
            .map(|d| d.start_yaw_deg + (x - d.start_x) * self.sensitivity)
    }

    /// Finish the drag and schedule auto rotation to resume after the delay.
    pub fn end(&mut self, now: Millis) -> Option<DragSession> {
        let ended = self.drag.take()?;
        self.resume_at = Some(now.after(self.resume_delay_ms));
        Some(ended)
    }

    /// Abandon the drag without scheduling a resume.
    pub fn cancel(&mut self) {
        self.drag = None;
        self.resume_at = None;
    }

    /// Fire a due resume; returns whether auto rotation is on for this frame.
    pub fn poll(&mut self, now: Millis) -> bool {
        if let Some(deadline) = self.resume_at {
            if now.has_reached(deadline) {
                self.resume_at = None;
                self.auto_rotate = true;
            }
        }
        self.auto_rotate
    }
}
