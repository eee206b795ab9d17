//! # forumgate
//!
//! A moderation gate for forum topic and reply submission pipelines.
//!
//! Submissions from anonymous or first-time authors are held as *pending*,
//! decorated or hidden for everyone who cannot moderate, and reported to the
//! site administrator. The host calls into the gate synchronously at fixed
//! points of its pipeline:
//!
//! | host event | entry point |
//! |---|---|
//! | before a topic/reply is stored | [`ModerationGate::pre_insert`] / [`moderation::evaluate`] |
//! | after it is stored | [`ModerationGate::after_insert`] / [`moderation::on_pending_created`] |
//! | before a listing query runs | [`ModerationGate::listing_filter`] / [`moderation::augment_listing_filter`] |
//! | pending reply approved | [`ModerationGate::approve`] / [`moderation::on_approved`] |
//! | rendering permalink, title, content | [`moderation::permalink`], [`moderation::title`], [`moderation::content`] |
//!
//! The free functions in [`moderation`] are pure apart from the notifier they
//! are handed; [`ModerationGate`] wires them to a host's stores.
//!
//! Storage traits and data types live in [`forumgate_common`], re-exported here
//! as [`common`].

#![warn(missing_docs)]

pub use forumgate_common as common;

pub mod error;
mod gate;
pub mod moderation;

pub use error::{GateError, Result};
pub use gate::{ModerationGate, PendingCounts};
