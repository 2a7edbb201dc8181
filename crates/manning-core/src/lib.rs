//! Core types and computations for the Manning team roster.
//!
//! This crate is free of HTTP and database dependencies. It holds the roster
//! document, the pure management transforms over it, and the support
//! availability engine: the availability index and the calendar projector.

// Native `async fn` in traits; silence the advisory lint about `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod availability;
pub mod calendar;
pub mod coverage;
pub mod error;
pub mod management;
pub mod model;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
