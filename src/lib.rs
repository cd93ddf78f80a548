//! A dual-indexed directory of student records for Rust.
//!
//! This crate provides [`Directory`], which stores records identified by a unique key (NIM)
//! and carrying a numeric ranking (GPA), and keeps two indexes over them in lock-step:
//!
//! - an identity index for O(1) average lookup by identifier
//!   ([`find_by_id`](Directory::find_by_id)), and
//! - a ranking tree for exact lookup by ranking ([`find_by_ranking`](Directory::find_by_ranking))
//!   and ascending enumeration ([`list_ordered_by_ranking`](Directory::list_ordered_by_ranking)).
//!
//! # Example
//!
//! ```
//! use student_directory::Directory;
//!
//! let mut directory = Directory::new();
//! directory.insert("20231001", "Alice", 3.75);
//! directory.insert("20231002", "Bob", 3.50);
//! directory.insert("20231003", "Charlie", 3.75);
//!
//! // Exact lookup by identifier
//! assert_eq!(directory.find_by_id("20231002").unwrap().name(), "Bob");
//!
//! // Every record with the same ranking, in insertion order
//! let top: Vec<&str> = directory.find_by_ranking(3.75).into_iter().map(|r| r.name()).collect();
//! assert_eq!(top, ["Alice", "Charlie"]);
//!
//! // Ascending by ranking
//! let all: Vec<&str> = directory.iter().map(|r| r.name()).collect();
//! assert_eq!(all, ["Bob", "Alice", "Charlie"]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Buckets, not duplicates** - Records sharing a ranking live in one tree node
//! - **Batch import** - [`import`] turns delimited text into records and reports skipped rows
//! - **`serde`** (optional) - Serialization for [`Record`], [`Tags`] and
//!   [`ImportOptions`](import::ImportOptions)
//!
//! # Implementation
//!
//! Records live in a slot arena owned by the directory; the identity index (a hash map) and
//! the ranking tree (an unbalanced binary search tree) both refer to them by handle. The tree
//! deletes nodes by in-order successor promotion and never rebalances.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod category_graph;
pub mod directory;
pub mod import;
pub mod record;

pub use category_graph::CategoryGraph;
pub use directory::Directory;
pub use record::{Record, Tags};
