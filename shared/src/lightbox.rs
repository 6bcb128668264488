//! Modal image viewer state: `Closed -> Open -> Closing -> Closed`.

/// Shown until the real image has loaded
pub const PLACEHOLDER_IMAGE: &str = "placeholderimg";

/// Time the exit transition gets before the modal leaves the page
pub const FADE_OUT_MS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxPhase {
    Closed,
    Open,
    /// Fading out, no longer interactive
    Closing,
}

/// Identifies the close cycle a deferred `finish_close` belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lightbox {
    phase: LightboxPhase,
    generation: u64,
}

impl Default for Lightbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lightbox {
    pub fn new() -> Self {
        Self {
            phase: LightboxPhase::Closed,
            generation: 0,
        }
    }

    pub fn phase(&self) -> LightboxPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase == LightboxPhase::Open
    }

    /// Whether the modal is still on the page, including while fading out
    pub fn is_mounted(&self) -> bool {
        self.phase != LightboxPhase::Closed
    }

    /// Opening while fading restarts the cycle and voids the pending close
    pub fn open(&mut self) {
        if self.phase != LightboxPhase::Open {
            self.generation += 1;
            self.phase = LightboxPhase::Open;
        }
    }

    /// Starts fading out. The returned ticket must be passed to `finish_close`
    /// after [`FADE_OUT_MS`]; `None` means nothing needs scheduling.
    pub fn request_close(&mut self) -> Option<CloseTicket> {
        if self.phase != LightboxPhase::Open {
            return None;
        }
        self.phase = LightboxPhase::Closing;
        Some(CloseTicket(self.generation))
    }

    /// Returns true when the modal actually closed
    pub fn finish_close(&mut self, ticket: CloseTicket) -> bool {
        if self.phase != LightboxPhase::Closing || ticket.0 != self.generation {
            return false;
        }
        self.phase = LightboxPhase::Closed;
        true
    }

    pub fn handle_key(&mut self, key: &str) -> Option<CloseTicket> {
        if key == "Escape" {
            self.request_close()
        } else {
            None
        }
    }

    /// Clicks on the image itself do not dismiss
    pub fn backdrop_click(&mut self, target_is_backdrop: bool) -> Option<CloseTicket> {
        if target_is_backdrop {
            self.request_close()
        } else {
            None
        }
    }
}

/// Document-level side effects a modal holds while it is on screen
pub trait ModalEffects {
    fn suppress_scroll(&mut self);
    fn restore_scroll(&mut self);
}

/// Scoped ownership of [`ModalEffects`]: acquired on creation, released exactly
/// once on `release` or drop, whichever comes first.
pub struct ModalSession<E: ModalEffects> {
    effects: Option<E>,
}

impl<E: ModalEffects> ModalSession<E> {
    pub fn acquire(mut effects: E) -> Self {
        effects.suppress_scroll();
        Self {
            effects: Some(effects),
        }
    }

    pub fn is_active(&self) -> bool {
        self.effects.is_some()
    }

    pub fn release(&mut self) {
        if let Some(mut effects) = self.effects.take() {
            effects.restore_scroll();
        }
    }
}

impl<E: ModalEffects> Drop for ModalSession<E> {
    fn drop(&mut self) {
        self.release();
    }
}
