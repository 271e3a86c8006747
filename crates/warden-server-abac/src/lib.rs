// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-based access control evaluation service.
//!
//! Wires the pure decision engines from `warden-abac-core` to a storage
//! boundary and an optional audit sink. The [`AccessEvaluator`] facade is
//! the intended entry point:
//!
//! - [`AccessEvaluator::evaluate_access`] — resource-level allow/deny
//! - [`AccessEvaluator::evaluate_and_log`] — the same, with audit delivery
//! - [`AccessEvaluator::evaluate_field`] — single field effect
//! - [`AccessEvaluator::filter_row`] — whole-row filtering and masking
//!
//! Storage is abstracted behind [`AttributeStore`]; [`MemoryStore`] is an
//! in-memory implementation suitable for tests and embedding.

pub mod decision;
pub mod error;
pub mod evaluator;
pub mod filter;
pub mod resolver;
pub mod store;

pub use decision::{decide, Decision, NO_APPLICABLE_POLICY};
pub use error::{AbacServerError, Result};
pub use evaluator::{AccessEvaluator, AccessEvent, AuditSink, TracingAuditSink};
pub use filter::{apply_effect, field_effect, FieldDecision, FilteredRow};
pub use resolver::{applicable_field_policies, applicable_policies};
pub use store::{AttributeStore, MemoryStore};
