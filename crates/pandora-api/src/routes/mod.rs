//! # Route Modules
//!
//! `info` holds the fixed endpoints; `content` is the catch-all that serves
//! every other path and method. Routers are assembled in [`crate::app`].

pub mod content;
pub mod info;
