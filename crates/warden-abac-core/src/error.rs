// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the ABAC core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AbacError>;

/// Errors that can occur while parsing ABAC data.
///
/// Evaluation itself never errors: malformed conditions fail to match and
/// the decision degrades toward denial. These variants only surface when
/// converting external strings into core types.
#[derive(Debug, Error)]
pub enum AbacError {
	/// Effect string is not one of the known effects
	#[error("invalid effect: {0}")]
	InvalidEffect(String),

	/// Operator string is not one of the known operators
	#[error("invalid operator: {0}")]
	InvalidOperator(String),

	/// Subject type string is not one of the known subject types
	#[error("invalid subject type: {0}")]
	InvalidSubjectType(String),

	/// Identifier is not a valid UUID
	#[error("invalid id: {0}")]
	InvalidId(#[from] uuid::Error),
}
