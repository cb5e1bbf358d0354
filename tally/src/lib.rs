//! Projected model enumeration and exact model counting on top of a
//! backtrackable SAT engine.
//!
//! The engine is consumed through the [`engine::SatEngine`] adapter trait;
//! a small reference implementation ([`engine::dpll::DpllEngine`]) is
//! provided for standalone use and testing. The two entry points are
//! [`enumeration::enumerate_models`] and [`enumeration::count_models`]:
//! both run the same blocking-clause search, optionally split the search
//! space recursively over provider-chosen variable subsets, optionally
//! decompose the constraint graph into independent components, and feed
//! every model into a commit/rollback collector so that a cancelled run
//! still yields a consistent partial result.

pub mod core;
pub mod engine;
pub mod enumeration;
