//! Runs pick-and-place jobs.
//!
//! A [`processor::JobProcessor`] owns the job lifecycle and drives the [`sequencer::PlacementSequencer`], which
//! picks each part, aligns it using bottom vision ([`alignment::AlignmentController`]) and places it.

pub mod alignment;
pub mod config;
pub mod control;
pub mod delegate;
pub mod error;
pub mod event;
pub mod processor;
pub mod retry;
pub mod sequencer;
pub mod state;
pub mod validation;
