//! End-to-end play throughs.
//!
//! These tests drive the composed `App` the way a player would, using
//! in-memory persistence and ledger adapters:
//!
//! ```bash
//! cargo test -p branchline-engine --lib e2e_tests
//! ```

pub(crate) mod e2e_helpers;
