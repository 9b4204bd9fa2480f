//! # Lottery Draw Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Cross-subsystem flows
//! │   ├── flows.rs       # draw → verify → reorg, idempotency, catch-up
//! │   └── failures.rs    # provider outages, compensation, retry budget
//! └── benches/           # Selector and block-search throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ld-tests
//!
//! # Benchmarks
//! cargo bench -p ld-tests
//! ```

pub mod integration;
