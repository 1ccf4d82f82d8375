// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Generic state machine types used to model the collection lifecycle.
//! Transitions are pure: `(State, Input) → (State, Output)`, with no side
//! effects. Callers perform the side effect the output names.
//!
//! # Example
//!
//! ```rust
//! use cim_vsphere_inventory::state_machine::*;
//!
//! let (state, action) = CollectionState::Uninitialized
//!     .transition(&CollectionInput::Begin)
//!     .unwrap();
//! assert_eq!(state, CollectionState::Collecting);
//! assert_eq!(action, CollectionAction::Fetch);
//!
//! assert!(CollectionState::Cached.transition(&CollectionInput::Begin).is_err());
//! ```

pub mod collection_lifecycle;

pub use collection_lifecycle::{CollectionAction, CollectionInput, CollectionState};

pub type TransitionResult<S> = Result<S, TransitionError>;

/// Rejected transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
}

/// A state that reacts to inputs by moving to a new state and naming an action
pub trait StateMachine: Sized + Clone {
    type Input;
    type Output;

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Inputs accepted in this state
    fn valid_inputs(&self) -> Vec<Self::Input>;
}

/// One accepted transition
#[derive(Debug, Clone)]
pub struct Transition<S, I> {
    pub from: S,
    pub to: S,
    pub input: I,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// A state machine that records every accepted transition
#[derive(Debug, Clone)]
pub struct StateMachineWithHistory<FSM: StateMachine> {
    pub current: FSM,
    pub history: Vec<Transition<FSM, FSM::Input>>,
}

impl<FSM: StateMachine> StateMachineWithHistory<FSM> {
    pub fn new(initial: FSM) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    /// Apply `input`; rejected inputs leave state and history unchanged
    pub fn transition_with_history(
        &mut self,
        input: FSM::Input,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> TransitionResult<FSM::Output> {
        let (to, output) = self.current.transition(&input)?;
        let from = std::mem::replace(&mut self.current, to.clone());
        self.history.push(Transition {
            from,
            to,
            input,
            timestamp,
        });
        Ok(output)
    }

    pub fn get_history(&self) -> &[Transition<FSM, FSM::Input>] {
        &self.history
    }

    pub fn current_state(&self) -> &FSM {
        &self.current
    }
}
