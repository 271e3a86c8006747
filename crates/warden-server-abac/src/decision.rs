// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The resource decision engine: deny-overrides over an ordered policy list.
//!
//! A matching deny terminates the scan immediately. A matching allow is
//! only recorded as a candidate — the scan continues to the end of the
//! list, because a deny with a lower priority must still be able to win.
//! Reordering allow priorities can change which allow policy a decision
//! cites, but can never convert a denial into an allowance.

use serde::{Deserialize, Serialize};

use warden_abac_core::{Effect, EvalContext, PolicyId, ResourcePolicy};

/// Reason attached to denials when no policy matched at all.
pub const NO_APPLICABLE_POLICY: &str = "no applicable policy";

/// Outcome of a resource-level evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
	pub allowed: bool,
	pub reason: String,
	pub policy_id: Option<PolicyId>,
}

impl Decision {
	/// An allowance citing the granting policy.
	pub fn allowed(policy: &ResourcePolicy) -> Self {
		Self {
			allowed: true,
			reason: format!("allowed by policy '{}'", policy.name),
			policy_id: Some(policy.id),
		}
	}

	/// A denial citing the denying policy.
	pub fn denied_by(policy: &ResourcePolicy) -> Self {
		Self {
			allowed: false,
			reason: format!("denied by policy '{}'", policy.name),
			policy_id: Some(policy.id),
		}
	}

	/// A denial with an explicit reason and no citing policy.
	pub fn denied(reason: impl Into<String>) -> Self {
		Self {
			allowed: false,
			reason: reason.into(),
			policy_id: None,
		}
	}
}

/// Folds a priority-ordered policy list into a decision.
///
/// The list must already be resolved (active, type-applicable, priority
/// descending); see the resolver. Zero matching policies deny by default.
pub fn decide(policies: &[&ResourcePolicy], ctx: &EvalContext) -> Decision {
	let mut candidate: Option<&ResourcePolicy> = None;

	for policy in policies {
		if !policy.matches(ctx) {
			continue;
		}
		match policy.effect {
			// A deny always wins, regardless of what remains.
			Effect::Deny => return Decision::denied_by(policy),
			// Record the first (highest-priority) allow and keep
			// scanning: a later deny must still be found.
			Effect::Allow => {
				if candidate.is_none() {
					candidate = Some(policy);
				}
			}
		}
	}

	match candidate {
		Some(policy) => Decision::allowed(policy),
		None => Decision::denied(NO_APPLICABLE_POLICY),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use warden_abac_core::{AttributeBag, Condition, Operator, SubjectType};

	fn ctx() -> EvalContext {
		EvalContext::new("read").with_user(
			AttributeBag::new()
				.with("department", "engineering")
				.with("clearance", "3"),
		)
	}

	fn never_matches() -> Condition {
		Condition {
			subject_type: SubjectType::User,
			attribute_name: "department".to_string(),
			operator: Operator::Equals,
			value: "sales".to_string(),
		}
	}

	#[test]
	fn no_matching_policy_denies_by_default() {
		let policies = vec![
			ResourcePolicy::new("unmatched", Effect::Allow, 10).with_condition(never_matches()),
		];
		let refs: Vec<&ResourcePolicy> = policies.iter().collect();

		let decision = decide(&refs, &ctx());
		assert!(!decision.allowed);
		assert_eq!(decision.reason, NO_APPLICABLE_POLICY);
		assert_eq!(decision.policy_id, None);
	}

	#[test]
	fn empty_list_denies_by_default() {
		let decision = decide(&[], &ctx());
		assert!(!decision.allowed);
		assert_eq!(decision.reason, NO_APPLICABLE_POLICY);
	}

	#[test]
	fn matching_allow_is_cited() {
		let allow = ResourcePolicy::new("eng-read", Effect::Allow, 10);
		let id = allow.id;
		let policies = vec![allow];
		let refs: Vec<&ResourcePolicy> = policies.iter().collect();

		let decision = decide(&refs, &ctx());
		assert!(decision.allowed);
		assert_eq!(decision.policy_id, Some(id));
	}

	#[test]
	fn deny_terminates_immediately() {
		let deny = ResourcePolicy::new("lockdown", Effect::Deny, 50);
		let deny_id = deny.id;
		let policies = vec![deny, ResourcePolicy::new("eng-read", Effect::Allow, 10)];
		let refs: Vec<&ResourcePolicy> = policies.iter().collect();

		let decision = decide(&refs, &ctx());
		assert!(!decision.allowed);
		assert_eq!(decision.policy_id, Some(deny_id));
	}

	#[test]
	fn lower_priority_deny_still_wins() {
		// Allow sits earlier in the ordered list (higher priority); the
		// scan must continue to the deny behind it.
		let allow = ResourcePolicy::new("eng-read", Effect::Allow, 90);
		let deny = ResourcePolicy::new("lockdown", Effect::Deny, 10);
		let deny_id = deny.id;
		let policies = vec![allow, deny];
		let refs: Vec<&ResourcePolicy> = policies.iter().collect();

		let decision = decide(&refs, &ctx());
		assert!(!decision.allowed);
		assert_eq!(decision.policy_id, Some(deny_id));
	}

	#[test]
	fn first_matching_allow_is_the_candidate() {
		let first = ResourcePolicy::new("specific", Effect::Allow, 40);
		let first_id = first.id;
		let policies = vec![first, ResourcePolicy::new("broad", Effect::Allow, 5)];
		let refs: Vec<&ResourcePolicy> = policies.iter().collect();

		let decision = decide(&refs, &ctx());
		assert!(decision.allowed);
		assert_eq!(decision.policy_id, Some(first_id));
	}

	#[test]
	fn non_matching_deny_is_skipped() {
		let policies = vec![
			ResourcePolicy::new("lockdown", Effect::Deny, 50).with_condition(never_matches()),
			ResourcePolicy::new("eng-read", Effect::Allow, 10),
		];
		let refs: Vec<&ResourcePolicy> = policies.iter().collect();

		let decision = decide(&refs, &ctx());
		assert!(decision.allowed);
	}

	mod properties {
		use super::*;
		use proptest::prelude::*;

		fn arb_effect() -> impl Strategy<Value = Effect> {
			prop_oneof![Just(Effect::Allow), Just(Effect::Deny)]
		}

		proptest! {
			#[test]
			fn any_matching_deny_forces_denial(
				effects in prop::collection::vec(arb_effect(), 1..12),
			) {
				let policies: Vec<ResourcePolicy> = effects
					.iter()
					.enumerate()
					.map(|(i, e)| ResourcePolicy::new(format!("p{}", i), *e, i as i32))
					.collect();
				let refs: Vec<&ResourcePolicy> = policies.iter().collect();

				let decision = decide(&refs, &ctx());
				let has_deny = effects.contains(&Effect::Deny);
				prop_assert_eq!(decision.allowed, !has_deny);
			}

			#[test]
			fn permuting_allow_priorities_never_converts_denial(
				priorities in prop::collection::vec(0i32..100, 2..8),
				rotate_by in 0usize..8,
			) {
				// One matching deny plus a pile of matching allows: the
				// result is denial for every priority assignment.
				let build = |prios: &[i32]| -> Decision {
					let mut policies: Vec<ResourcePolicy> = prios
						.iter()
						.enumerate()
						.map(|(i, p)| ResourcePolicy::new(format!("allow{}", i), Effect::Allow, *p))
						.collect();
					policies.push(ResourcePolicy::new("deny", Effect::Deny, 1));
					let refs = crate::resolver::applicable_policies(&policies, "document");
					decide(&refs, &ctx())
				};

				let original = build(&priorities);
				let mut rotated = priorities.clone();
				let len = rotated.len();
				rotated.rotate_left(rotate_by % len);
				let permuted = build(&rotated);

				prop_assert!(!original.allowed);
				prop_assert!(!permuted.allowed);
			}

			#[test]
			fn decision_is_deterministic(
				effects in prop::collection::vec(arb_effect(), 0..10),
			) {
				let policies: Vec<ResourcePolicy> = effects
					.iter()
					.enumerate()
					.map(|(i, e)| ResourcePolicy::new(format!("p{}", i), *e, (i % 3) as i32))
					.collect();
				let refs = crate::resolver::applicable_policies(&policies, "document");

				prop_assert_eq!(decide(&refs, &ctx()), decide(&refs, &ctx()));
			}
		}
	}
}
