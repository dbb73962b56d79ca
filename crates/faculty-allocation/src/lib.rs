//! Merit-ranked allocation of students to faculty project slots.
//!
//! A roster CSV is imported into [`workflows::roster::Roster`], ranked and walked by the
//! [`workflows::allocation::AllocationEngine`], and summarised into an
//! [`workflows::allocation::AllocationReport`] that the host renders or exports.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
