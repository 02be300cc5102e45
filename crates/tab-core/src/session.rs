//! Session state machine for one party's trip through the app.
//!
//! A single owned [`AppState`] advanced by [`AppState::apply`] replaces
//! shared mutable state: the transition set is closed, undefined
//! (state, event) pairs are rejected, and everything derived from the
//! state (the running [`Allocation`]) is recomputed on read instead of
//! cached. Single-threaded and synchronous by construction.

use thiserror::Error;
use tab_receipt::{Receipt, Selection, SelectionMap};
use tab_split::{allocate, Allocation};
use tracing::debug;

/// Where the party currently is in the capture-and-claim flow.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Landing screen; nothing captured or decoded yet.
    Home,
    /// Camera open, waiting for a shot.
    Capturing,
    /// Image sent to the analyzer, reply pending.
    Processing,
    /// Analyzer returned a receipt; party reviews header info.
    ConfirmInfo { receipt: Receipt },
    /// Party is claiming items and setting split counts.
    SelectItems {
        receipt: Receipt,
        selections: SelectionMap,
    },
    /// Read-only view of the computed share.
    Summary {
        receipt: Receipt,
        selections: SelectionMap,
    },
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    StartCapture,
    CancelCapture,
    ImageCaptured,
    AnalysisSucceeded(Receipt),
    AnalysisFailed,
    ConfirmReceipt,
    ToggleItem(String),
    SetSplitCount(String, u32),
    ShowSummary,
    BackToItems,
    /// A shared link was opened and decoded; the receiver skips capture.
    LinkDecoded(Receipt),
    Reset,
}

/// Rejected session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("event {event} is not allowed in state {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

impl SessionError {
    /// Stable numeric code for machine consumers.
    pub fn code(&self) -> u32 {
        match self {
            SessionError::InvalidTransition { .. } => 40,
        }
    }

    /// Short headline suitable for a UI banner.
    pub fn headline(&self) -> &'static str {
        match self {
            SessionError::InvalidTransition { .. } => "Invalid Action",
        }
    }
}

impl AppState {
    /// Stable state name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            AppState::Home => "Home",
            AppState::Capturing => "Capturing",
            AppState::Processing => "Processing",
            AppState::ConfirmInfo { .. } => "ConfirmInfo",
            AppState::SelectItems { .. } => "SelectItems",
            AppState::Summary { .. } => "Summary",
        }
    }

    /// The receipt in play, once one exists.
    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            AppState::ConfirmInfo { receipt }
            | AppState::SelectItems { receipt, .. }
            | AppState::Summary { receipt, .. } => Some(receipt),
            _ => None,
        }
    }

    /// The party's claim state, in the states where claiming exists.
    pub fn selections(&self) -> Option<&SelectionMap> {
        match self {
            AppState::SelectItems { selections, .. } | AppState::Summary { selections, .. } => {
                Some(selections)
            }
            _ => None,
        }
    }

    /// The party's current share, recomputed from scratch on every call.
    pub fn allocation(&self) -> Option<Allocation> {
        match self {
            AppState::SelectItems {
                receipt,
                selections,
            }
            | AppState::Summary {
                receipt,
                selections,
            } => Some(allocate(receipt, selections)),
            _ => None,
        }
    }

    /// Advance the session by one event.
    ///
    /// The transition set is closed: any pair not listed here is an
    /// error, not a no-op. `Reset` is the one event accepted everywhere.
    pub fn apply(self, event: AppEvent) -> Result<AppState, SessionError> {
        let from = self.name();
        let what = event.name();

        if matches!(event, AppEvent::Reset) {
            debug!(from, event = what, to = "Home", "session transition");
            return Ok(AppState::Home);
        }

        let next = match (self, event) {
            (AppState::Home, AppEvent::StartCapture) => AppState::Capturing,
            // Receiver path: a decoded share link skips capture entirely.
            (AppState::Home, AppEvent::LinkDecoded(receipt)) => AppState::SelectItems {
                receipt,
                selections: SelectionMap::new(),
            },
            (AppState::Capturing, AppEvent::CancelCapture) => AppState::Home,
            (AppState::Capturing, AppEvent::ImageCaptured) => AppState::Processing,
            (AppState::Processing, AppEvent::AnalysisSucceeded(receipt)) => {
                AppState::ConfirmInfo { receipt }
            }
            (AppState::Processing, AppEvent::AnalysisFailed) => AppState::Home,
            (AppState::ConfirmInfo { receipt }, AppEvent::ConfirmReceipt) => {
                AppState::SelectItems {
                    receipt,
                    selections: SelectionMap::new(),
                }
            }
            (
                AppState::SelectItems {
                    receipt,
                    mut selections,
                },
                AppEvent::ToggleItem(id),
            ) => {
                // First touch claims the item; later touches flip it.
                selections
                    .entry(id)
                    .and_modify(Selection::toggle)
                    .or_insert_with(Selection::claimed);
                AppState::SelectItems {
                    receipt,
                    selections,
                }
            }
            (
                AppState::SelectItems {
                    receipt,
                    mut selections,
                },
                AppEvent::SetSplitCount(id, count),
            ) => {
                selections
                    .entry(id)
                    .or_insert_with(Selection::claimed)
                    .set_split_count(count);
                AppState::SelectItems {
                    receipt,
                    selections,
                }
            }
            (
                AppState::SelectItems {
                    receipt,
                    selections,
                },
                AppEvent::ShowSummary,
            ) => AppState::Summary {
                receipt,
                selections,
            },
            (
                AppState::Summary {
                    receipt,
                    selections,
                },
                AppEvent::BackToItems,
            ) => AppState::SelectItems {
                receipt,
                selections,
            },
            (_, _) => {
                return Err(SessionError::InvalidTransition {
                    state: from,
                    event: what,
                })
            }
        };

        debug!(from, event = what, to = next.name(), "session transition");
        Ok(next)
    }
}

impl AppEvent {
    /// Stable event name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::StartCapture => "StartCapture",
            AppEvent::CancelCapture => "CancelCapture",
            AppEvent::ImageCaptured => "ImageCaptured",
            AppEvent::AnalysisSucceeded(_) => "AnalysisSucceeded",
            AppEvent::AnalysisFailed => "AnalysisFailed",
            AppEvent::ConfirmReceipt => "ConfirmReceipt",
            AppEvent::ToggleItem(_) => "ToggleItem",
            AppEvent::SetSplitCount(_, _) => "SetSplitCount",
            AppEvent::ShowSummary => "ShowSummary",
            AppEvent::BackToItems => "BackToItems",
            AppEvent::LinkDecoded(_) => "LinkDecoded",
            AppEvent::Reset => "Reset",
        }
    }
}
