// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The storage boundary consumed by the evaluator.
//!
//! [`AttributeStore`] is the repository trait an embedder implements over
//! its own storage. Lookups return `Ok(None)` for absence; `Err` is
//! reserved for infrastructure failure. Policy listings must preserve
//! creation order — the resolver's stable sort relies on it for
//! reproducible decisions among equal priorities.
//!
//! The evaluator performs several independent lookups per decision
//! (subject, resource, fields, policies) and does not guarantee snapshot
//! consistency across them; implementations should serve one evaluation
//! from one consistent read.

use std::collections::HashMap;

use async_trait::async_trait;

use warden_abac_core::{
	AttributeBag, FieldDef, FieldId, FieldPolicy, ResourceDef, ResourceId, ResourcePolicy, UserId,
};

use crate::error::Result;

/// Read-only attribute and policy storage.
#[async_trait]
pub trait AttributeStore: Send + Sync {
	/// Attributes of a subject, or `None` if the subject is unknown.
	async fn subject_attributes(&self, id: UserId) -> Result<Option<AttributeBag>>;

	/// A resource definition, or `None` if the resource is unknown.
	async fn resource(&self, id: ResourceId) -> Result<Option<ResourceDef>>;

	/// A field definition, or `None` if the field is unknown.
	async fn field(&self, id: FieldId) -> Result<Option<FieldDef>>;

	/// All field definitions of a resource.
	async fn resource_fields(&self, id: ResourceId) -> Result<Vec<FieldDef>>;

	/// Active resource policies, optionally narrowed to a resource type,
	/// in creation order.
	async fn active_policies(&self, resource_type: Option<&str>) -> Result<Vec<ResourcePolicy>>;

	/// Active field policies, optionally narrowed to a resource type,
	/// in creation order.
	async fn active_field_policies(&self, resource_type: Option<&str>)
		-> Result<Vec<FieldPolicy>>;
}

/// Builder-style in-memory [`AttributeStore`] for tests and embedders
/// without external storage.
///
/// Policies are kept in insertion order, which the trait treats as
/// creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
	subjects: HashMap<UserId, AttributeBag>,
	resources: HashMap<ResourceId, ResourceDef>,
	fields: HashMap<FieldId, FieldDef>,
	policies: Vec<ResourcePolicy>,
	field_policies: Vec<FieldPolicy>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: add a subject with its attribute bag.
	pub fn with_subject(mut self, id: UserId, attributes: AttributeBag) -> Self {
		self.subjects.insert(id, attributes);
		self
	}

	/// Builder: add a resource definition.
	pub fn with_resource(mut self, resource: ResourceDef) -> Self {
		self.resources.insert(resource.id, resource);
		self
	}

	/// Builder: add a field definition.
	pub fn with_field(mut self, field: FieldDef) -> Self {
		self.fields.insert(field.id, field);
		self
	}

	/// Builder: append a resource policy (creation order is append order).
	pub fn with_policy(mut self, policy: ResourcePolicy) -> Self {
		self.policies.push(policy);
		self
	}

	/// Builder: append a field policy (creation order is append order).
	pub fn with_field_policy(mut self, policy: FieldPolicy) -> Self {
		self.field_policies.push(policy);
		self
	}
}

#[async_trait]
impl AttributeStore for MemoryStore {
	async fn subject_attributes(&self, id: UserId) -> Result<Option<AttributeBag>> {
		Ok(self.subjects.get(&id).cloned())
	}

	async fn resource(&self, id: ResourceId) -> Result<Option<ResourceDef>> {
		Ok(self.resources.get(&id).cloned())
	}

	async fn field(&self, id: FieldId) -> Result<Option<FieldDef>> {
		Ok(self.fields.get(&id).cloned())
	}

	async fn resource_fields(&self, id: ResourceId) -> Result<Vec<FieldDef>> {
		let mut fields: Vec<FieldDef> = self
			.fields
			.values()
			.filter(|f| f.resource_id == id)
			.cloned()
			.collect();
		// HashMap iteration order is arbitrary; keep the listing stable.
		fields.sort_by(|a, b| a.name.cmp(&b.name));
		Ok(fields)
	}

	async fn active_policies(&self, resource_type: Option<&str>) -> Result<Vec<ResourcePolicy>> {
		Ok(self
			.policies
			.iter()
			.filter(|p| p.active)
			.filter(|p| match resource_type {
				Some(rt) => p.applies_to(rt),
				None => true,
			})
			.cloned()
			.collect())
	}

	async fn active_field_policies(
		&self,
		resource_type: Option<&str>,
	) -> Result<Vec<FieldPolicy>> {
		Ok(self
			.field_policies
			.iter()
			.filter(|p| p.active)
			.filter(|p| match (&p.resource_type, resource_type) {
				(Some(scoped), Some(rt)) => scoped == rt,
				_ => true,
			})
			.cloned()
			.collect())
	}
}
