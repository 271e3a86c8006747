// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy effects.
//!
//! Resource policies carry a binary [`Effect`]. Field policies carry a
//! [`FieldEffect`] drawn from a four-level lattice ordered by strength:
//! `Allow < Mask < Redact < Deny`. The ordering is structural (derived
//! `Ord`), so effect precedence in the filter engine is an invariant of the
//! type rather than a consequence of branch ordering.

use serde::{Deserialize, Serialize};

use crate::error::AbacError;

/// Replacement text used for redacted values when the policy supplies none.
pub const REDACTED_PLACEHOLDER: &str = "***REDACTED***";

/// Effect of a resource-level policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
	Allow,
	Deny,
}

impl Effect {
	pub fn as_str(&self) -> &'static str {
		match self {
			Effect::Allow => "allow",
			Effect::Deny => "deny",
		}
	}
}

impl std::fmt::Display for Effect {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for Effect {
	type Err = AbacError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"allow" => Ok(Effect::Allow),
			"deny" => Ok(Effect::Deny),
			other => Err(AbacError::InvalidEffect(other.to_string())),
		}
	}
}

/// Effect of a field-level policy, ordered by strength.
///
/// The derived ordering is the precedence used by the field filter engine:
/// a stronger recorded effect is never replaced by a weaker one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldEffect {
	Allow,
	Mask,
	Redact,
	Deny,
}

impl FieldEffect {
	pub fn as_str(&self) -> &'static str {
		match self {
			FieldEffect::Allow => "allow",
			FieldEffect::Mask => "mask",
			FieldEffect::Redact => "redact",
			FieldEffect::Deny => "deny",
		}
	}
}

impl std::fmt::Display for FieldEffect {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for FieldEffect {
	type Err = AbacError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"allow" => Ok(FieldEffect::Allow),
			"mask" => Ok(FieldEffect::Mask),
			"redact" => Ok(FieldEffect::Redact),
			"deny" => Ok(FieldEffect::Deny),
			other => Err(AbacError::InvalidEffect(other.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn field_effects_order_by_strength() {
		assert!(FieldEffect::Allow < FieldEffect::Mask);
		assert!(FieldEffect::Mask < FieldEffect::Redact);
		assert!(FieldEffect::Redact < FieldEffect::Deny);
	}

	#[test]
	fn max_reduction_picks_strongest() {
		let effects = [FieldEffect::Allow, FieldEffect::Redact, FieldEffect::Mask];
		assert_eq!(effects.iter().max(), Some(&FieldEffect::Redact));
	}

	#[test]
	fn effect_parse_roundtrip() {
		for s in ["allow", "deny"] {
			let effect: Effect = s.parse().unwrap();
			assert_eq!(effect.as_str(), s);
		}
		assert!("masked".parse::<Effect>().is_err());
	}

	#[test]
	fn field_effect_parse_roundtrip() {
		for s in ["allow", "mask", "redact", "deny"] {
			let effect: FieldEffect = s.parse().unwrap();
			assert_eq!(effect.as_str(), s);
		}
		assert!("obscure".parse::<FieldEffect>().is_err());
	}

	#[test]
	fn serde_uses_snake_case() {
		assert_eq!(
			serde_json::to_string(&FieldEffect::Redact).unwrap(),
			r#""redact""#
		);
	}
}
