// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the evaluation engine.
//!
//! Unknown subjects, resources, and fields are not errors: the evaluator
//! turns absence into a denial with a "not found" reason. These variants
//! cover infrastructure failures that the caller must surface itself.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AbacServerError>;

/// Errors raised by the evaluation engine's storage boundary.
#[derive(Debug, Error)]
pub enum AbacServerError {
	/// The attribute store failed (unreachable, corrupt, etc.)
	#[error("attribute store error: {0}")]
	Store(String),

	/// The audit sink rejected an event
	#[error("audit sink error: {0}")]
	Audit(String),
}
