//! Lifecycle of a single advent calendar box.
//!
//! The box moves `Locked -> Openable -> Opening -> Revealing -> Open`. A box the
//! backend already reports as open starts in `Open` and never reveals. The
//! machine is pure: callers perform the open request and schedule the reveal
//! steps, then feed the outcomes back in.

use crate::error::ApiError;

/// Delay between a confirmed open and the door swinging open
pub const DOOR_OPEN_DELAY_MS: u32 = 300;
/// Delay between a confirmed open and the box accepting clicks again
pub const REVEAL_DURATION_MS: u32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxState {
    /// Not yet allowed to open, clicks are ignored
    Locked,
    Openable,
    /// Open request in flight
    Opening,
    Revealing,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Box is open, show the image viewer. No backend call.
    ShowImage,
    /// Caller must issue the open request for this day
    SendOpenRequest,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    DoorOpened,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTimings {
    pub door_open_ms: u32,
    pub settle_ms: u32,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            door_open_ms: DOOR_OPEN_DELAY_MS,
            settle_ms: REVEAL_DURATION_MS,
        }
    }
}

/// Delayed steps to schedule after a successful open, each relative to the moment of success
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealPlan {
    pub steps: [(u32, RevealStep); 2],
}

impl RevealPlan {
    pub fn new(timings: RevealTimings) -> Self {
        Self {
            steps: [
                (timings.door_open_ms, RevealStep::DoorOpened),
                (timings.settle_ms, RevealStep::Settled),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdventBox {
    day: u32,
    can_open: bool,
    is_open: bool,
    request_in_flight: bool,
    revealing: bool,
    notify_pending: bool,
    lightbox_open: bool,
    last_error: Option<ApiError>,
}

impl AdventBox {
    pub fn new(day: u32, is_db_open: bool, can_open: bool) -> Self {
        Self {
            day,
            can_open,
            is_open: is_db_open,
            request_in_flight: false,
            revealing: false,
            notify_pending: false,
            lightbox_open: false,
            last_error: None,
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn state(&self) -> BoxState {
        if self.revealing {
            BoxState::Revealing
        } else if self.is_open {
            BoxState::Open
        } else if self.request_in_flight {
            BoxState::Opening
        } else if self.can_open {
            BoxState::Openable
        } else {
            BoxState::Locked
        }
    }

    /// Door is drawn open. Becomes true partway through the reveal, before the state settles to `Open`.
    pub fn door_open(&self) -> bool {
        self.is_open
    }

    pub fn is_locked(&self) -> bool {
        self.state() == BoxState::Locked
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    pub fn lightbox_open(&self) -> bool {
        self.lightbox_open
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// The day's image may be fetched once the door is open
    pub fn image_enabled(&self) -> bool {
        self.is_open
    }

    /// Apply fresh inputs from the parent. An already-open day skips the reveal.
    pub fn sync(&mut self, is_db_open: bool, can_open: bool) {
        self.can_open = can_open;
        if is_db_open {
            self.is_open = true;
        }
    }

    pub fn handle_click(&mut self) -> ClickOutcome {
        match self.state() {
            BoxState::Open => {
                self.lightbox_open = true;
                ClickOutcome::ShowImage
            }
            BoxState::Openable => {
                self.request_in_flight = true;
                self.last_error = None;
                ClickOutcome::SendOpenRequest
            }
            BoxState::Locked | BoxState::Opening | BoxState::Revealing => ClickOutcome::Ignored,
        }
    }

    /// The backend confirmed the open. Returns `None` when no request was in flight.
    pub fn open_succeeded(&mut self, timings: RevealTimings) -> Option<RevealPlan> {
        if !self.request_in_flight || self.revealing {
            return None;
        }
        self.revealing = true;
        self.notify_pending = true;
        Some(RevealPlan::new(timings))
    }

    /// Clears the in-flight marker so the next click retries
    pub fn open_failed(&mut self, error: ApiError) {
        if !self.request_in_flight || self.revealing {
            return;
        }
        self.request_in_flight = false;
        self.last_error = Some(error);
    }

    /// Apply a reveal step. Returns true exactly once per successful open: the parent must be notified.
    pub fn apply(&mut self, step: RevealStep) -> bool {
        match step {
            RevealStep::DoorOpened => {
                self.is_open = true;
                std::mem::take(&mut self.notify_pending)
            }
            RevealStep::Settled => {
                self.is_open = true;
                self.revealing = false;
                self.request_in_flight = false;
                std::mem::take(&mut self.notify_pending)
            }
        }
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox_open = false;
    }
}
