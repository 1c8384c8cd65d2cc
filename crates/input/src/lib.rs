//! Input: discrete events from the event source mapped to maze actions.
//!
//! # Invariants
//! - This crate knows nothing about the windowing library; the app converts
//!   platform events into [`InputEvent`] first.
//! - Unbound input maps to [`Action::Noop`], never to an error.

pub mod action;

pub use action::{Action, InputEvent, Key, map_event, normalize_pointer};
