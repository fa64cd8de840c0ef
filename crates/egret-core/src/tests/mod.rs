//! Behavioural tests for `egret_core`.
