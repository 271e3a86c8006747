// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy and entity definitions.
//!
//! Policies are created and updated by an external administrative surface;
//! the evaluation core only ever reads a snapshot supplied per evaluation
//! and never mutates policy or attribute data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attrs::{AttributeBag, EvalContext, FieldId, ResourceId};
use crate::condition::{all_match, Condition};
use crate::effect::{Effect, FieldEffect};

/// Unique identifier for a policy (resource- or field-level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyId(pub Uuid);

impl PolicyId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for PolicyId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for PolicyId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for PolicyId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// A resource-level access policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePolicy {
	pub id: PolicyId,
	pub name: String,
	pub description: Option<String>,
	pub effect: Effect,
	/// Higher priority evaluates first. Does not by itself determine the
	/// outcome: deny-overrides dominates.
	pub priority: i32,
	pub active: bool,
	/// Restricts the policy to one resource type; `None` applies to all.
	pub resource_type: Option<String>,
	/// AND-combined conditions; all must hold for the policy to match.
	pub conditions: Vec<Condition>,
	pub created_at: DateTime<Utc>,
}

impl ResourcePolicy {
	/// Creates an active policy with no conditions.
	pub fn new(name: impl Into<String>, effect: Effect, priority: i32) -> Self {
		Self {
			id: PolicyId::new(),
			name: name.into(),
			description: None,
			effect,
			priority,
			active: true,
			resource_type: None,
			conditions: Vec::new(),
			created_at: Utc::now(),
		}
	}

	/// Builder: restrict to a resource type.
	pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
		self.resource_type = Some(resource_type.into());
		self
	}

	/// Builder: append a condition.
	pub fn with_condition(mut self, condition: Condition) -> Self {
		self.conditions.push(condition);
		self
	}

	/// Builder: set active state.
	pub fn with_active(mut self, active: bool) -> Self {
		self.active = active;
		self
	}

	/// Returns true if the policy is scoped to (or unscoped over) the type.
	pub fn applies_to(&self, resource_type: &str) -> bool {
		match &self.resource_type {
			Some(scoped) => scoped == resource_type,
			None => true,
		}
	}

	/// Returns true if every condition holds in the context.
	pub fn matches(&self, ctx: &EvalContext) -> bool {
		all_match(&self.conditions, ctx)
	}
}

/// A field-level policy with optional masking semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPolicy {
	pub id: PolicyId,
	pub name: String,
	pub description: Option<String>,
	pub effect: FieldEffect,
	pub priority: i32,
	pub active: bool,
	/// Regular expression over field names; `None` applies to all fields.
	/// An invalid pattern never matches.
	pub field_pattern: Option<String>,
	/// Exact-match resource type filter; `None` applies to all types.
	pub resource_type: Option<String>,
	/// Literal replacement text. For `mask` effects a non-empty value
	/// overrides type-based masking; for `redact` it overrides the fixed
	/// placeholder.
	pub mask_value: Option<String>,
	pub conditions: Vec<Condition>,
	pub created_at: DateTime<Utc>,
}

impl FieldPolicy {
	/// Creates an active field policy with no selectors or conditions.
	pub fn new(name: impl Into<String>, effect: FieldEffect, priority: i32) -> Self {
		Self {
			id: PolicyId::new(),
			name: name.into(),
			description: None,
			effect,
			priority,
			active: true,
			field_pattern: None,
			resource_type: None,
			mask_value: None,
			conditions: Vec::new(),
			created_at: Utc::now(),
		}
	}

	/// Builder: set the field name pattern.
	pub fn with_field_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.field_pattern = Some(pattern.into());
		self
	}

	/// Builder: restrict to a resource type.
	pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
		self.resource_type = Some(resource_type.into());
		self
	}

	/// Builder: set the replacement text.
	pub fn with_mask_value(mut self, mask_value: impl Into<String>) -> Self {
		self.mask_value = Some(mask_value.into());
		self
	}

	/// Builder: append a condition.
	pub fn with_condition(mut self, condition: Condition) -> Self {
		self.conditions.push(condition);
		self
	}

	/// Builder: set active state.
	pub fn with_active(mut self, active: bool) -> Self {
		self.active = active;
		self
	}

	/// Returns true if the policy's selectors accept the field.
	///
	/// `field_pattern` is compiled case-insensitively; a pattern that fails
	/// to compile is treated as a non-match.
	pub fn applies_to(&self, resource_type: &str, field_name: &str) -> bool {
		if let Some(scoped) = &self.resource_type {
			if scoped != resource_type {
				return false;
			}
		}
		match &self.field_pattern {
			Some(pattern) => regex::RegexBuilder::new(pattern)
				.case_insensitive(true)
				.build()
				.map(|re| re.is_match(field_name))
				.unwrap_or(false),
			None => true,
		}
	}

	/// Returns true if every condition holds in the context.
	pub fn matches(&self, ctx: &EvalContext) -> bool {
		all_match(&self.conditions, ctx)
	}
}

/// A protected resource: its type drives policy selection, its attribute
/// bag feeds the `resource` namespace of the evaluation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDef {
	pub id: ResourceId,
	pub name: String,
	pub resource_type: String,
	pub attributes: AttributeBag,
}

impl ResourceDef {
	pub fn new(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
		Self {
			id: ResourceId::new(),
			name: name.into(),
			resource_type: resource_type.into(),
			attributes: AttributeBag::new(),
		}
	}

	/// Builder: set the attribute bag.
	pub fn with_attributes(mut self, attributes: AttributeBag) -> Self {
		self.attributes = attributes;
		self
	}
}

/// A field within a resource. The field type selects the masking strategy;
/// the attribute bag feeds the `field` namespace of the evaluation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
	pub id: FieldId,
	pub resource_id: ResourceId,
	pub name: String,
	pub field_type: String,
	pub attributes: AttributeBag,
}

impl FieldDef {
	pub fn new(
		resource_id: ResourceId,
		name: impl Into<String>,
		field_type: impl Into<String>,
	) -> Self {
		Self {
			id: FieldId::new(),
			resource_id,
			name: name.into(),
			field_type: field_type.into(),
			attributes: AttributeBag::new(),
		}
	}

	/// Builder: set the attribute bag.
	pub fn with_attributes(mut self, attributes: AttributeBag) -> Self {
		self.attributes = attributes;
		self
	}
}
