use crate::{Error, Result};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Validated,
    Extracting,
    Analyzing,
    Responded,
    /// Responded with an error.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEvent {
    Validate,
    BeginExtraction,
    BeginAnalysis,
    Complete,
    Fail,
}

/// Progress of a single analyze request. Every request moves forward one step at a time and
/// may fail out of any non-terminal state.
#[derive(Debug)]
pub struct RequestLifecycle {
    state: RequestState,
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self {
            state: RequestState::Received,
        }
    }

    pub fn current_state(&self) -> RequestState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, RequestState::Responded | RequestState::Failed)
    }

    pub fn transition(&mut self, event: RequestEvent) -> Result<RequestState> {
        use RequestEvent::*;
        use RequestState::*;

        let new_state = match (self.state, event) {
            (Received, Validate) => Validated,
            (Validated, BeginExtraction) => Extracting,
            (Extracting, BeginAnalysis) => Analyzing,
            (Analyzing, Complete) => Responded,
            (state, Fail) if !matches!(state, Responded | Failed) => Failed,
            (state, event) => {
                warn!("Invalid request transition from {:?} with {:?}", state, event);
                return Err(Error::InvalidTransition {
                    current: format!("{state:?}"),
                    requested: format!("{event:?}"),
                });
            }
        };

        debug!(
            "Request state transition: {:?} -> {:?} (event: {:?})",
            self.state, new_state, event
        );
        self.state = new_state;
        Ok(new_state)
    }
}
