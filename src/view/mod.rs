// src/view/mod.rs
//! Screen-level state built on the pipeline.

pub mod commands;
pub mod controller;

pub use commands::{ApplicantBoard, PendingStatusChange, StatusWriter};
pub use controller::{CollectionView, EmptyState, FetchTicket};
