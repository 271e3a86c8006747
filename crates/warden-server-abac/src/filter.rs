// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The field filter engine: reducing ordered field policies to one of four
//! effects per field, and applying that effect to the raw value.
//!
//! Effects form a lattice ordered by strength (`Allow < Mask < Redact <
//! Deny`, see [`FieldEffect`]). The fold starts from an implicit
//! default-deny and scans in priority order:
//!
//! - `deny` and `redact` are terminal: the first match returns at once
//! - `mask` records the effect and replacement once; an already-recorded
//!   mask is never replaced, so the highest-priority mask's replacement wins
//! - `allow` records only while nothing is recorded; a recorded mask is
//!   never downgraded by a later, lower-priority allow
//!
//! A list that matches nothing leaves the field denied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use warden_abac_core::{
	EvalContext, FieldEffect, FieldPolicy, MaskingRegistry, PolicyId, REDACTED_PLACEHOLDER,
};

/// Outcome of a field-level evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecision {
	pub effect: FieldEffect,
	/// Replacement text for `Mask`/`Redact`. `None` on a mask means
	/// auto-mask by field type.
	pub mask_value: Option<String>,
	pub policy_id: Option<PolicyId>,
}

impl FieldDecision {
	/// The default-deny decision used when nothing matches.
	pub fn deny() -> Self {
		Self {
			effect: FieldEffect::Deny,
			mask_value: None,
			policy_id: None,
		}
	}
}

/// Result of filtering a full row of field/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredRow {
	/// Field values after applying effects; denied fields are absent.
	pub filtered: BTreeMap<String, String>,
	/// Per-field effect labels for transparency and auditing.
	pub access_control: BTreeMap<String, FieldEffect>,
}

/// Folds a priority-ordered field policy list into a [`FieldDecision`].
///
/// The list must already be resolved (active, selector-applicable,
/// priority descending); see the resolver.
pub fn field_effect(policies: &[&FieldPolicy], ctx: &EvalContext) -> FieldDecision {
	let mut recorded: Option<FieldDecision> = None;

	for policy in policies {
		if !policy.matches(ctx) {
			continue;
		}
		match policy.effect {
			// Terminal: nothing can override a deny.
			FieldEffect::Deny => {
				return FieldDecision {
					effect: FieldEffect::Deny,
					mask_value: None,
					policy_id: Some(policy.id),
				}
			}
			// Terminal: redaction replaces the value outright.
			FieldEffect::Redact => {
				return FieldDecision {
					effect: FieldEffect::Redact,
					mask_value: Some(
						policy
							.mask_value
							.clone()
							.unwrap_or_else(|| REDACTED_PLACEHOLDER.to_string()),
					),
					policy_id: Some(policy.id),
				}
			}
			FieldEffect::Mask => {
				let already_masked = recorded
					.as_ref()
					.map(|r| r.effect >= FieldEffect::Mask)
					.unwrap_or(false);
				if !already_masked {
					recorded = Some(FieldDecision {
						effect: FieldEffect::Mask,
						mask_value: policy.mask_value.clone(),
						policy_id: Some(policy.id),
					});
				}
			}
			// Allow only fills the initial default-deny slot: a recorded
			// mask is never downgraded.
			FieldEffect::Allow => {
				if recorded.is_none() {
					recorded = Some(FieldDecision {
						effect: FieldEffect::Allow,
						mask_value: None,
						policy_id: Some(policy.id),
					});
				}
			}
		}
	}

	recorded.unwrap_or_else(FieldDecision::deny)
}

/// Applies a decision to a raw value.
///
/// Returns `None` for `Deny` (the field is removed from the result). A
/// mask with a non-empty policy-supplied replacement uses it literally;
/// otherwise the registry masks by field type.
pub fn apply_effect(
	decision: &FieldDecision,
	raw: &str,
	field_type: &str,
	registry: &MaskingRegistry,
) -> Option<String> {
	match decision.effect {
		FieldEffect::Allow => Some(raw.to_string()),
		FieldEffect::Deny => None,
		FieldEffect::Redact => Some(
			decision
				.mask_value
				.clone()
				.unwrap_or_else(|| REDACTED_PLACEHOLDER.to_string()),
		),
		FieldEffect::Mask => match decision.mask_value.as_deref() {
			Some(literal) if !literal.is_empty() => Some(literal.to_string()),
			_ => Some(registry.mask(field_type, raw)),
		},
	}
}
