// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Warden attribute-based access control (ABAC) system.
//!
//! This crate provides the shared vocabulary for access decisions: attribute
//! bags, conditions and their operators, resource- and field-level policies,
//! the effect lattices, and the masking strategy registry. It is used by the
//! server-side evaluation engine (`warden-server-abac`).
//!
//! # Design Principles
//!
//! 1. **Pure evaluation**: condition matching and masking are side-effect-free
//!    functions over pre-loaded data; nothing in this crate performs I/O
//! 2. **Fail closed**: a missing attribute, an unknown operator, or an invalid
//!    pattern never raises an error — it simply fails to match, which degrades
//!    toward denial
//! 3. **Explicit attributes**: attribute bags are typed key-value structures
//!    with a fail-closed accessor, not dynamic property access
//! 4. **Serializable**: all types can be logged/audited as JSON
//!
//! # Example
//!
//! ```
//! use warden_abac_core::{AttributeBag, Condition, EvalContext, Operator, SubjectType};
//!
//! let ctx = EvalContext::new("read")
//!     .with_user(AttributeBag::new().with("department", "engineering"))
//!     .with_resource(AttributeBag::new().with("department", "engineering"));
//!
//! let condition = Condition {
//!     subject_type: SubjectType::User,
//!     attribute_name: "department".to_string(),
//!     operator: Operator::Equals,
//!     value: "Engineering".to_string(),
//! };
//!
//! // String comparisons are case-insensitive.
//! assert!(condition.matches(&ctx));
//! ```

pub mod attrs;
pub mod condition;
pub mod effect;
pub mod error;
pub mod masking;
pub mod policy;

pub use attrs::{AttributeBag, EvalContext, FieldId, ResourceId, UserId};
pub use condition::{Condition, Operator, SubjectType};
pub use effect::{Effect, FieldEffect, REDACTED_PLACEHOLDER};
pub use error::{AbacError, Result};
pub use masking::MaskingRegistry;
pub use policy::{FieldDef, FieldPolicy, PolicyId, ResourceDef, ResourcePolicy};
