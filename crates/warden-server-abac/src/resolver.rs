// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy resolution: selecting and ordering the policies applicable to
//! one decision.
//!
//! Resolution is pure: it filters a pre-loaded snapshot and sorts by
//! priority descending. The sort is stable, so equal-priority policies
//! keep their creation order — required for reproducible decisions.

use warden_abac_core::{FieldPolicy, ResourcePolicy};

/// Active resource policies applicable to the resource type, priority
/// descending, creation order among equals.
pub fn applicable_policies<'a>(
	policies: &'a [ResourcePolicy],
	resource_type: &str,
) -> Vec<&'a ResourcePolicy> {
	let mut applicable: Vec<&ResourcePolicy> = policies
		.iter()
		.filter(|p| p.active && p.applies_to(resource_type))
		.collect();
	// Vec::sort_by is stable: equal priorities retain input order.
	applicable.sort_by(|a, b| b.priority.cmp(&a.priority));
	applicable
}

/// Active field policies whose selectors accept the resource type and
/// field name, priority descending, creation order among equals.
pub fn applicable_field_policies<'a>(
	policies: &'a [FieldPolicy],
	resource_type: &str,
	field_name: &str,
) -> Vec<&'a FieldPolicy> {
	let mut applicable: Vec<&FieldPolicy> = policies
		.iter()
		.filter(|p| p.active && p.applies_to(resource_type, field_name))
		.collect();
	applicable.sort_by(|a, b| b.priority.cmp(&a.priority));
	applicable
}

#[cfg(test)]
mod tests {
	use super::*;
	use warden_abac_core::{Effect, FieldEffect};

	#[test]
	fn sorts_by_priority_descending() {
		let policies = vec![
			ResourcePolicy::new("low", Effect::Allow, 10),
			ResourcePolicy::new("high", Effect::Deny, 50),
			ResourcePolicy::new("mid", Effect::Allow, 25),
		];

		let ordered = applicable_policies(&policies, "document");
		let names: Vec<&str> = ordered.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, ["high", "mid", "low"]);
	}

	#[test]
	fn equal_priorities_keep_creation_order() {
		let policies = vec![
			ResourcePolicy::new("first", Effect::Allow, 10),
			ResourcePolicy::new("second", Effect::Allow, 10),
			ResourcePolicy::new("third", Effect::Allow, 10),
		];

		let ordered = applicable_policies(&policies, "document");
		let names: Vec<&str> = ordered.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, ["first", "second", "third"]);
	}

	#[test]
	fn inactive_and_foreign_types_are_excluded() {
		let policies = vec![
			ResourcePolicy::new("inactive", Effect::Deny, 99).with_active(false),
			ResourcePolicy::new("other-type", Effect::Deny, 99).with_resource_type("record"),
			ResourcePolicy::new("kept", Effect::Allow, 1),
		];

		let ordered = applicable_policies(&policies, "document");
		let names: Vec<&str> = ordered.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, ["kept"]);
	}

	#[test]
	fn field_policies_filter_by_pattern_and_type() {
		let policies = vec![
			FieldPolicy::new("ssn-only", FieldEffect::Mask, 30).with_field_pattern("^ssn$"),
			FieldPolicy::new("employee-only", FieldEffect::Redact, 20)
				.with_resource_type("employee"),
			FieldPolicy::new("everything", FieldEffect::Allow, 10),
		];

		let for_ssn = applicable_field_policies(&policies, "employee", "ssn");
		let names: Vec<&str> = for_ssn.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, ["ssn-only", "employee-only", "everything"]);

		let for_email_elsewhere = applicable_field_policies(&policies, "contractor", "email");
		let names: Vec<&str> = for_email_elsewhere.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, ["everything"]);
	}

	mod properties {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn ordering_is_deterministic(priorities in prop::collection::vec(-100i32..100, 0..20)) {
				let policies: Vec<ResourcePolicy> = priorities
					.iter()
					.enumerate()
					.map(|(i, p)| ResourcePolicy::new(format!("p{}", i), Effect::Allow, *p))
					.collect();

				let first: Vec<&str> = applicable_policies(&policies, "document")
					.iter()
					.map(|p| p.name.as_str())
					.collect();
				let second: Vec<&str> = applicable_policies(&policies, "document")
					.iter()
					.map(|p| p.name.as_str())
					.collect();
				prop_assert_eq!(first, second);
			}

			#[test]
			fn output_is_sorted_descending(priorities in prop::collection::vec(-100i32..100, 0..20)) {
				let policies: Vec<ResourcePolicy> = priorities
					.iter()
					.enumerate()
					.map(|(i, p)| ResourcePolicy::new(format!("p{}", i), Effect::Allow, *p))
					.collect();

				let ordered = applicable_policies(&policies, "document");
				for pair in ordered.windows(2) {
					prop_assert!(pair[0].priority >= pair[1].priority);
				}
			}
		}
	}
}
