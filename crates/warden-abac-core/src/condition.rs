// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Condition matching: the single primitive shared by the resource decision
//! engine and the field filter engine.
//!
//! A [`Condition`] tests one attribute of one namespace against an expected
//! value. Matching is pure and fail-closed: absent attributes, unknown
//! operators or subject types, unparseable numbers, and invalid regular
//! expressions all evaluate to `false` — never to an error.

use serde::{Deserialize, Serialize};

use crate::attrs::EvalContext;
use crate::error::AbacError;

/// Which namespace of the evaluation context a condition reads.
///
/// Strings arriving from storage that name no known namespace deserialize
/// into [`SubjectType::Unknown`], which never resolves a value, so the
/// owning policy simply fails to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
	User,
	Resource,
	Field,
	Environment,
	Action,
	#[serde(other)]
	Unknown,
}

impl SubjectType {
	pub fn as_str(&self) -> &'static str {
		match self {
			SubjectType::User => "user",
			SubjectType::Resource => "resource",
			SubjectType::Field => "field",
			SubjectType::Environment => "environment",
			SubjectType::Action => "action",
			SubjectType::Unknown => "unknown",
		}
	}
}

impl std::str::FromStr for SubjectType {
	type Err = AbacError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"user" => Ok(SubjectType::User),
			"resource" => Ok(SubjectType::Resource),
			"field" => Ok(SubjectType::Field),
			"environment" => Ok(SubjectType::Environment),
			"action" => Ok(SubjectType::Action),
			other => Err(AbacError::InvalidSubjectType(other.to_string())),
		}
	}
}

/// Comparison operators usable in conditions.
///
/// Unknown operator strings deserialize into [`Operator::Unknown`], which
/// evaluates to `false` for every input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
	Equals,
	NotEquals,
	Contains,
	In,
	GreaterThan,
	LessThan,
	Matches,
	#[serde(other)]
	Unknown,
}

impl Operator {
	pub fn as_str(&self) -> &'static str {
		match self {
			Operator::Equals => "equals",
			Operator::NotEquals => "not_equals",
			Operator::Contains => "contains",
			Operator::In => "in",
			Operator::GreaterThan => "greater_than",
			Operator::LessThan => "less_than",
			Operator::Matches => "matches",
			Operator::Unknown => "unknown",
		}
	}

	/// Tests an actual value against an expected value.
	///
	/// String comparisons are case-insensitive. `in` splits the expected
	/// value on commas and trims each entry. Numeric operators parse both
	/// sides as `f64`; a parse failure yields `false`. `matches` compiles
	/// the expected value as a case-insensitive regular expression; an
	/// invalid pattern yields `false`.
	pub fn evaluate(&self, actual: &str, expected: &str) -> bool {
		match self {
			Operator::Equals => actual.to_lowercase() == expected.to_lowercase(),
			Operator::NotEquals => actual.to_lowercase() != expected.to_lowercase(),
			Operator::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
			Operator::In => {
				let needle = actual.to_lowercase();
				expected
					.split(',')
					.map(|entry| entry.trim().to_lowercase())
					.any(|entry| entry == needle)
			}
			Operator::GreaterThan => match (actual.parse::<f64>(), expected.parse::<f64>()) {
				(Ok(a), Ok(e)) => a > e,
				_ => false,
			},
			Operator::LessThan => match (actual.parse::<f64>(), expected.parse::<f64>()) {
				(Ok(a), Ok(e)) => a < e,
				_ => false,
			},
			Operator::Matches => regex::RegexBuilder::new(expected)
				.case_insensitive(true)
				.build()
				.map(|re| re.is_match(actual))
				.unwrap_or(false),
			Operator::Unknown => false,
		}
	}
}

impl std::str::FromStr for Operator {
	type Err = AbacError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"equals" => Ok(Operator::Equals),
			"not_equals" => Ok(Operator::NotEquals),
			"contains" => Ok(Operator::Contains),
			"in" => Ok(Operator::In),
			"greater_than" => Ok(Operator::GreaterThan),
			"less_than" => Ok(Operator::LessThan),
			"matches" => Ok(Operator::Matches),
			other => Err(AbacError::InvalidOperator(other.to_string())),
		}
	}
}

/// One condition of a policy. All conditions of a policy must hold (AND)
/// for the policy to match.
///
/// The expected value is always compared literally; a value that happens to
/// name another entity's attribute is not resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
	pub subject_type: SubjectType,
	pub attribute_name: String,
	pub operator: Operator,
	pub value: String,
}

impl Condition {
	/// Evaluates this condition against the context.
	///
	/// Returns `false` when the referenced attribute is absent.
	pub fn matches(&self, ctx: &EvalContext) -> bool {
		match ctx.resolve(self.subject_type, &self.attribute_name) {
			Some(actual) => self.operator.evaluate(actual, &self.value),
			None => false,
		}
	}
}

/// Evaluates a condition list with AND logic. An empty list holds trivially.
pub fn all_match(conditions: &[Condition], ctx: &EvalContext) -> bool {
	conditions.iter().all(|cond| cond.matches(ctx))
}
