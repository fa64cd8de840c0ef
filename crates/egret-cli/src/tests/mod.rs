//! Behavioural tests for the CLI runtime.

mod behaviour;
