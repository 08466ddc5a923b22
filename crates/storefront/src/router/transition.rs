//! View transition state machine.
//!
//! An animated navigation moves `Idle | Entered -> Exiting -> Settled ->
//! Entered`. Instant navigations reset to `Idle` from a resting phase.
//! Events arriving out of order are rejected rather than leaving the page
//! with a half-applied class.

use std::time::Duration;

use thiserror::Error;

use crate::host::TransitionClass;

/// Where the main content is in its animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    /// No animation class applied.
    #[default]
    Idle,
    /// Outgoing view is fading; waiting for the settle window.
    Exiting,
    /// Settle window elapsed; the new view may be rendered.
    Settled,
    /// New view mounted with the entry class.
    Entered,
}

impl TransitionPhase {
    /// The class the host should show in this phase.
    #[must_use]
    pub const fn class(self) -> Option<TransitionClass> {
        match self {
            Self::Idle => None,
            Self::Exiting | Self::Settled => Some(TransitionClass::Exiting),
            Self::Entered => Some(TransitionClass::Entering),
        }
    }

    const fn is_resting(self) -> bool {
        matches!(self, Self::Idle | Self::Entered)
    }
}

/// An event that arrived in the wrong phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {event} while {phase:?}")]
pub struct TransitionError {
    pub phase: TransitionPhase,
    pub event: &'static str,
}

/// Transition driver with a configurable settle window.
#[derive(Debug, Clone)]
pub struct Transition {
    phase: TransitionPhase,
    settle: Duration,
}

impl Transition {
    #[must_use]
    pub const fn new(settle: Duration) -> Self {
        Self {
            phase: TransitionPhase::Idle,
            settle,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> TransitionPhase {
        self.phase
    }

    #[must_use]
    pub const fn settle_window(&self) -> Duration {
        self.settle
    }

    /// Begin the exit animation.
    ///
    /// # Errors
    ///
    /// Fails if another transition is in flight.
    pub const fn start(&mut self) -> Result<TransitionPhase, TransitionError> {
        self.step("start", self.phase.is_resting(), TransitionPhase::Exiting)
    }

    /// Wait out the settle window, then mark the exit as settled.
    ///
    /// # Errors
    ///
    /// Fails unless the exit animation is running.
    pub async fn settle(&mut self) -> Result<TransitionPhase, TransitionError> {
        if self.phase != TransitionPhase::Exiting {
            return Err(TransitionError {
                phase: self.phase,
                event: "settle",
            });
        }
        tokio::time::sleep(self.settle).await;
        self.phase = TransitionPhase::Settled;
        Ok(self.phase)
    }

    /// Apply the entry animation to the freshly rendered view.
    ///
    /// # Errors
    ///
    /// Fails unless the exit has settled.
    pub const fn enter(&mut self) -> Result<TransitionPhase, TransitionError> {
        self.step(
            "enter",
            matches!(self.phase, TransitionPhase::Settled),
            TransitionPhase::Entered,
        )
    }

    /// Drop every animation class for an instant render.
    ///
    /// # Errors
    ///
    /// Fails if a transition is in flight.
    pub const fn reset(&mut self) -> Result<TransitionPhase, TransitionError> {
        self.step("reset", self.phase.is_resting(), TransitionPhase::Idle)
    }

    /// Mark the initial render as entered without an exit phase.
    ///
    /// # Errors
    ///
    /// Fails if a transition is in flight.
    pub const fn enter_initial(&mut self) -> Result<TransitionPhase, TransitionError> {
        self.step(
            "enter initial view",
            self.phase.is_resting(),
            TransitionPhase::Entered,
        )
    }

    const fn step(
        &mut self,
        event: &'static str,
        allowed: bool,
        next: TransitionPhase,
    ) -> Result<TransitionPhase, TransitionError> {
        if !allowed {
            return Err(TransitionError {
                phase: self.phase,
                event,
            });
        }
        self.phase = next;
        Ok(next)
    }
}
