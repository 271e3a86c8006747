// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute bags and the evaluation context.
//!
//! An [`AttributeBag`] maps attribute names to single string values. Every
//! entity a policy can reference — subject, resource, field, environment —
//! carries one. Lookups are fail-closed: a missing attribute returns `None`
//! and the owning condition simply fails to match.
//!
//! An [`EvalContext`] bundles the four attribute namespaces plus the
//! requested action string for one evaluation. It is assembled by the caller
//! from a consistent read of the attribute store; the core never fetches
//! data itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::condition::SubjectType;

/// Unique identifier for a subject (user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for UserId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for UserId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for UserId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// Unique identifier for a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub Uuid);

impl ResourceId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for ResourceId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for ResourceId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for ResourceId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// Unique identifier for a field within a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(pub Uuid);

impl FieldId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for FieldId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for FieldId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for FieldId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// A mapping from attribute name to a single string value.
///
/// Values are always strings; numeric comparisons parse on demand inside
/// the operators. The accessor is fail-closed: a missing attribute yields
/// `None`, never a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(BTreeMap<String, String>);

impl AttributeBag {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self(BTreeMap::new())
	}

	/// Builder: add an attribute.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(name.into(), value.into());
		self
	}

	/// Sets an attribute, replacing any previous value.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.insert(name.into(), value.into());
	}

	/// Looks up an attribute. Missing attribute means lookup failure,
	/// never a default value.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Iterates over `(name, value)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

impl From<BTreeMap<String, String>> for AttributeBag {
	fn from(map: BTreeMap<String, String>) -> Self {
		Self(map)
	}
}

impl FromIterator<(String, String)> for AttributeBag {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Read-only view of everything a condition may reference during one
/// evaluation: the four attribute namespaces plus the action string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalContext {
	pub user: AttributeBag,
	pub resource: AttributeBag,
	pub field: AttributeBag,
	pub environment: AttributeBag,
	pub action: String,
}

impl EvalContext {
	/// Creates a context for the given action with empty attribute bags.
	pub fn new(action: impl Into<String>) -> Self {
		Self {
			action: action.into(),
			..Self::default()
		}
	}

	/// Builder: set the subject attributes.
	pub fn with_user(mut self, user: AttributeBag) -> Self {
		self.user = user;
		self
	}

	/// Builder: set the resource attributes.
	pub fn with_resource(mut self, resource: AttributeBag) -> Self {
		self.resource = resource;
		self
	}

	/// Builder: set the field attributes.
	pub fn with_field(mut self, field: AttributeBag) -> Self {
		self.field = field;
		self
	}

	/// Builder: set the environment attributes.
	pub fn with_environment(mut self, environment: AttributeBag) -> Self {
		self.environment = environment;
		self
	}

	/// Resolves the actual value a condition compares against.
	///
	/// For [`SubjectType::Action`] this is the action string regardless of
	/// the attribute name. For every other subject type it is a lookup in
	/// the matching bag. Absent values (and unknown subject types) resolve
	/// to `None`, which the evaluator treats as a failed match.
	pub fn resolve(&self, subject_type: SubjectType, attribute_name: &str) -> Option<&str> {
		match subject_type {
			SubjectType::User => self.user.get(attribute_name),
			SubjectType::Resource => self.resource.get(attribute_name),
			SubjectType::Field => self.field.get(attribute_name),
			SubjectType::Environment => self.environment.get(attribute_name),
			SubjectType::Action => Some(self.action.as_str()),
			SubjectType::Unknown => None,
		}
	}
}
