//! # Change Set Test Suite
//!
//! Cross-crate flows run against a fully wired [`cs_runtime::ChangeSetContainer`].
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── lifecycle.rs       # create → add → lock → ready → finalize
//!     ├── dependencies.rs    # dependency and metadata resolution over the demo catalog
//!     ├── concurrency.rs     # racing claims on one object
//!     └── event_delivery.rs  # bus subscribers and publish failures
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cs-tests
//! cargo test -p cs-tests integration::lifecycle
//! ```

pub mod integration;
