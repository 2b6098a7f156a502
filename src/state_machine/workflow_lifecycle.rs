// Copyright (c) 2025 - Cowboy AI, Inc.
//! Apply/Remove Workflow Lifecycle
//!
//! # States
//!
//! ```text
//! apply:  SpecLoaded → Rendered → ManifestWritten → DryRunApplied → Applied
//!                                                 → PodsAwaited → Configured → Done
//! remove: SpecLoaded → Rendered → ManifestWritten → DryRunDeleted → Deleted
//!                                                 → CleanupVerified → Done
//! ```
//!
//! The two paths share their prefix and split on the first orchestration
//! step taken after the manifest is on disk. `Done` is terminal.

use std::fmt;

use super::{StateMachine, TransitionError, TransitionResult};

/// Where an apply or remove run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    SpecLoaded,
    Rendered,
    ManifestWritten,
    DryRunApplied,
    Applied,
    PodsAwaited,
    Configured,
    DryRunDeleted,
    Deleted,
    CleanupVerified,
    Done,
}

/// Step completed by the workflow (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStep {
    Render,
    WriteManifest,
    DryRunApply,
    Apply,
    AwaitPods,
    Configure,
    DryRunDelete,
    Delete,
    VerifyCleanup,
    Finish,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Done)
    }
}

impl StateMachine for WorkflowState {
    type Input = WorkflowStep;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use WorkflowState::*;
        use WorkflowStep::*;

        let next = match (self, input) {
            (SpecLoaded, Render) => Rendered,
            (Rendered, WriteManifest) => ManifestWritten,

            (ManifestWritten, DryRunApply) => DryRunApplied,
            (DryRunApplied, Apply) => Applied,
            (Applied, AwaitPods) => PodsAwaited,
            (PodsAwaited, Configure) => Configured,
            (Configured, Finish) => Done,

            (ManifestWritten, DryRunDelete) => DryRunDeleted,
            (DryRunDeleted, Delete) => Deleted,
            (Deleted, VerifyCleanup) => CleanupVerified,
            (CleanupVerified, Finish) => Done,

            (from, step) => {
                return Err(TransitionError::InvalidTransition {
                    from: from.to_string(),
                    to: step.to_string(),
                })
            }
        };
        Ok((next, ()))
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        use WorkflowStep::*;

        [
            Render,
            WriteManifest,
            DryRunApply,
            Apply,
            AwaitPods,
            Configure,
            DryRunDelete,
            Delete,
            VerifyCleanup,
            Finish,
        ]
        .into_iter()
        .filter(|step| self.can_transition(step))
        .collect()
    }
}
