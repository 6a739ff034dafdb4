//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, validation errors)
//! - `survey` - Field registry, interview state, prompt, directives, ledger
//! - `handoff` - Jobs, retry policies and the CRM record mapping

pub mod foundation;
pub mod handoff;
pub mod survey;
