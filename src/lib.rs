//! Survey Engine - Conversational structured data collection
//!
//! A language model interviews the user turn by turn, filling a configurable
//! set of named fields through tool calls. Completed interviews and uploaded
//! documents are handed off to a CRM and summarized back to the user by
//! background jobs.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
