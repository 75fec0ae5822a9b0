//! # Fuel Ledger Testkit
//!
//! Testing utilities for the fuel ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: helpers for building drafts and records with known
//!   dates and totals
//! - **Generators**: proptest strategies for property-based testing
//!
//! ## Fixtures
//!
//! Quickly set up test data:
//!
//! ```rust
//! use fuel_ledger_testkit::fixtures::record_totalling;
//!
//! let record = record_totalling("2024-07-01", 50.0);
//! assert_eq!(record.grand_total, 50.0);
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use fuel_ledger_testkit::generators;
//!
//! proptest! {
//!     #[test]
//!     fn totals_are_stable(draft in generators::draft()) {
//!         prop_assert_eq!(draft.totals(), draft.totals());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{draft_on, full_draft, record_for, record_totalling};
