// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The evaluation facade: loads attributes and policies from the store,
//! builds the evaluation context, and runs the pure decision engines.
//!
//! Unknown subjects, resources, and fields produce denials with explicit
//! "not found" reasons — never errors. Only infrastructure failures from
//! the store or the audit sink surface as `Err`, for the caller to report
//! as its own denial with a distinguishable reason.
//!
//! Each call performs its own independent lookups; snapshot consistency
//! across them is the caller's responsibility (serve one evaluation from
//! one consistent read).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use warden_abac_core::{
	AttributeBag, EvalContext, FieldEffect, FieldId, MaskingRegistry, ResourceId, UserId,
};

use crate::decision::{decide, Decision};
use crate::error::Result;
use crate::filter::{apply_effect, field_effect, FieldDecision, FilteredRow};
use crate::resolver::{applicable_field_policies, applicable_policies};
use crate::store::AttributeStore;

/// One evaluated access decision, as handed to the audit sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
	pub subject: UserId,
	pub resource: ResourceId,
	pub action: String,
	pub decision: Decision,
	pub evaluated_at: DateTime<Utc>,
}

/// Receives evaluated decisions from [`AccessEvaluator::evaluate_and_log`].
///
/// The engine does not persist audit records itself; embedders implement
/// this trait over their own audit pipeline.
#[async_trait]
pub trait AuditSink: Send + Sync {
	async fn record(&self, event: &AccessEvent) -> Result<()>;
}

/// Audit sink that emits decisions as structured `tracing` events.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
	async fn record(&self, event: &AccessEvent) -> Result<()> {
		tracing::info!(
			subject = %event.subject,
			resource = %event.resource,
			action = %event.action,
			allowed = event.decision.allowed,
			reason = %event.decision.reason,
			"access decision"
		);
		Ok(())
	}
}

/// Evaluates access decisions against an [`AttributeStore`].
///
/// The evaluator holds no mutable state: every call loads its inputs,
/// runs the pure engines, and returns. It is safe to share across tasks.
pub struct AccessEvaluator<S> {
	store: S,
	masking: MaskingRegistry,
	audit: Option<Arc<dyn AuditSink>>,
}

impl<S: AttributeStore> AccessEvaluator<S> {
	/// Creates an evaluator with the built-in masking strategies and no
	/// audit sink.
	pub fn new(store: S) -> Self {
		Self {
			store,
			masking: MaskingRegistry::new(),
			audit: None,
		}
	}

	/// Builder: substitute the masking registry.
	pub fn with_masking(mut self, masking: MaskingRegistry) -> Self {
		self.masking = masking;
		self
	}

	/// Builder: attach an audit sink for [`Self::evaluate_and_log`].
	pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
		self.audit = Some(sink);
		self
	}

	/// Evaluates whether the subject may perform the action on the
	/// resource. No logging side effect.
	#[instrument(level = "debug", skip(self, environment), fields(
		subject = %subject,
		resource = %resource,
		action = %action,
	))]
	pub async fn evaluate_access(
		&self,
		subject: UserId,
		resource: ResourceId,
		action: &str,
		environment: AttributeBag,
	) -> Result<Decision> {
		let subject_attrs = match self.store.subject_attributes(subject).await? {
			Some(attrs) => attrs,
			None => return Ok(Decision::denied("subject not found")),
		};
		let resource_def = match self.store.resource(resource).await? {
			Some(def) => def,
			None => return Ok(Decision::denied("resource not found")),
		};

		let snapshot = self
			.store
			.active_policies(Some(&resource_def.resource_type))
			.await?;
		let ordered = applicable_policies(&snapshot, &resource_def.resource_type);

		let ctx = EvalContext::new(action)
			.with_user(subject_attrs)
			.with_resource(resource_def.attributes)
			.with_environment(environment);

		let decision = decide(&ordered, &ctx);
		tracing::debug!(allowed = decision.allowed, reason = %decision.reason, "decision");
		Ok(decision)
	}

	/// Identical computation to [`Self::evaluate_access`], additionally
	/// delivering the full decision to the configured audit sink.
	pub async fn evaluate_and_log(
		&self,
		subject: UserId,
		resource: ResourceId,
		action: &str,
		environment: AttributeBag,
	) -> Result<Decision> {
		let decision = self
			.evaluate_access(subject, resource, action, environment)
			.await?;

		if let Some(sink) = &self.audit {
			let event = AccessEvent {
				subject,
				resource,
				action: action.to_string(),
				decision: decision.clone(),
				evaluated_at: Utc::now(),
			};
			sink.record(&event).await?;
		}

		Ok(decision)
	}

	/// Evaluates the effect for a single field. Unknown subject, resource,
	/// or field all deny (fail-closed).
	#[instrument(level = "debug", skip(self, environment), fields(
		subject = %subject,
		resource = %resource,
		field = %field,
		action = %action,
	))]
	pub async fn evaluate_field(
		&self,
		subject: UserId,
		resource: ResourceId,
		field: FieldId,
		action: &str,
		environment: AttributeBag,
	) -> Result<FieldDecision> {
		let subject_attrs = match self.store.subject_attributes(subject).await? {
			Some(attrs) => attrs,
			None => return Ok(FieldDecision::deny()),
		};
		let resource_def = match self.store.resource(resource).await? {
			Some(def) => def,
			None => return Ok(FieldDecision::deny()),
		};
		let field_def = match self.store.field(field).await? {
			Some(def) => def,
			None => return Ok(FieldDecision::deny()),
		};

		let snapshot = self
			.store
			.active_field_policies(Some(&resource_def.resource_type))
			.await?;
		let ordered =
			applicable_field_policies(&snapshot, &resource_def.resource_type, &field_def.name);

		let ctx = EvalContext::new(action)
			.with_user(subject_attrs)
			.with_resource(resource_def.attributes)
			.with_field(field_def.attributes)
			.with_environment(environment);

		Ok(field_effect(&ordered, &ctx))
	}

	/// Filters a full row of field/value pairs, returning the surviving
	/// values plus a per-field effect label.
	///
	/// Row keys with no stored field definition are evaluated with an
	/// empty field bag and the generic masking type. An unknown subject
	/// or resource denies every field.
	#[instrument(level = "debug", skip(self, row, environment), fields(
		subject = %subject,
		resource = %resource,
		action = %action,
	))]
	pub async fn filter_row(
		&self,
		subject: UserId,
		resource: ResourceId,
		row: &BTreeMap<String, String>,
		action: &str,
		environment: AttributeBag,
	) -> Result<FilteredRow> {
		let deny_all = || FilteredRow {
			filtered: BTreeMap::new(),
			access_control: row
				.keys()
				.map(|name| (name.clone(), FieldEffect::Deny))
				.collect(),
		};

		let subject_attrs = match self.store.subject_attributes(subject).await? {
			Some(attrs) => attrs,
			None => return Ok(deny_all()),
		};
		let resource_def = match self.store.resource(resource).await? {
			Some(def) => def,
			None => return Ok(deny_all()),
		};

		let field_defs: BTreeMap<String, _> = self
			.store
			.resource_fields(resource)
			.await?
			.into_iter()
			.map(|def| (def.name.clone(), def))
			.collect();
		let snapshot = self
			.store
			.active_field_policies(Some(&resource_def.resource_type))
			.await?;

		let mut filtered = BTreeMap::new();
		let mut access_control = BTreeMap::new();

		for (name, raw) in row {
			let (field_bag, field_type) = match field_defs.get(name) {
				Some(def) => (def.attributes.clone(), def.field_type.as_str()),
				None => (AttributeBag::new(), ""),
			};

			let ctx = EvalContext::new(action)
				.with_user(subject_attrs.clone())
				.with_resource(resource_def.attributes.clone())
				.with_field(field_bag)
				.with_environment(environment.clone());

			let ordered =
				applicable_field_policies(&snapshot, &resource_def.resource_type, name);
			let decision = field_effect(&ordered, &ctx);

			if let Some(value) = apply_effect(&decision, raw, field_type, &self.masking) {
				filtered.insert(name.clone(), value);
			}
			access_control.insert(name.clone(), decision.effect);
		}

		Ok(FilteredRow {
			filtered,
			access_control,
		})
	}
}
