// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stacked modal dialog coordination.
//!
//! Dialogs such as "forgot password" open on top of "login" instead of
//! replacing it. [`DialogStack`] holds the ordering rules; [`DialogStore`] is
//! the shared, observable owner of the session's stack.

pub mod stack;
pub mod store;

pub use stack::DialogStack;
pub use store::{AddOutcome, DialogStore};
