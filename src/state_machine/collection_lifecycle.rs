// Copyright (c) 2025 - Cowboy AI, Inc.
//! Collection Lifecycle State Machine
//!
//! Lifecycle of one [`InventoryRepository`](crate::service::InventoryRepository).
//!
//! # State Machine Type
//!
//! This is a **Mealy Machine**: the output tells the repository whether the
//! provider must be contacted.
//!
//! # States
//!
//! - Uninitialized: nothing collected yet
//! - Collecting: a collection pass is running
//! - Cached: a snapshot is available (terminal)
//!
//! # Inputs
//!
//! - Begin: Uninitialized → Collecting
//! - Complete: Collecting → Cached
//! - Abort: Collecting → Uninitialized (provider failure)
//!
//! A cached repository never collects again: `Cached + Begin` is rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{StateMachine, TransitionError, TransitionResult};

/// Repository collection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionState {
    Uninitialized,
    Collecting,
    Cached,
}

/// Collection lifecycle input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionInput {
    /// Start a collection pass
    Begin,
    /// Collection pass produced a snapshot
    Complete,
    /// Collection pass failed
    Abort,
}

/// What the repository must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionAction {
    /// Contact the provider
    Fetch,
    /// Serve the cached snapshot
    ServeCached,
    /// Report the failure; a later call may retry
    Reset,
}

impl CollectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Collecting => "collecting",
            Self::Cached => "cached",
        }
    }

    /// Whether a snapshot is available
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached)
    }
}

impl fmt::Display for CollectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for CollectionState {
    type Input = CollectionInput;
    type Output = CollectionAction;

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use CollectionInput::*;
        use CollectionState::*;

        match (self, input) {
            (Uninitialized, Begin) => Ok((Collecting, CollectionAction::Fetch)),
            (Collecting, Complete) => Ok((Cached, CollectionAction::ServeCached)),
            (Collecting, Abort) => Ok((Uninitialized, CollectionAction::Reset)),

            (Collecting, Begin) => Err(TransitionError::PreconditionFailed(
                "a collection pass is already running".to_string(),
            )),
            (from, input) => Err(TransitionError::InvalidTransition {
                from: from.to_string(),
                to: format!("{:?}", input),
            }),
        }
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        match self {
            Self::Uninitialized => vec![CollectionInput::Begin],
            Self::Collecting => vec![CollectionInput::Complete, CollectionInput::Abort],
            Self::Cached => Vec::new(),
        }
    }
}
