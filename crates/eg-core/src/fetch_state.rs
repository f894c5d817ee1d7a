//! Per-stream fetch state machine.
//!
//! One `FetchState` exists per independent data stream (current conditions
//! plus forecast, typhoon list). Only the owning model drives transitions;
//! views read it.

/// Load state for a single data stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    /// Holds the user-facing message, never raw error detail.
    Error(String),
}

impl<T> FetchState<T> {
    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// True if a new request may start from this state.
    ///
    /// Re-selection while loading is allowed too; stale results are dropped
    /// by the model, so this only reports whether the stream is settled.
    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    /// Loaded data, if the last request succeeded.
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// User-facing error message, if the last request failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// State after a request has been issued.
    pub fn on_request(self) -> Self {
        FetchState::Loading
    }

    /// State after a request has completed.
    pub fn on_complete(self, result: Result<T, String>) -> Self {
        match result {
            Ok(data) => FetchState::Success(data),
            Err(message) => FetchState::Error(message),
        }
    }
}
