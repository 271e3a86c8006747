// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Masking strategies: deterministic, type-specific value obscuring.
//!
//! The [`MaskingRegistry`] maps a field type (e.g. `ssn`, `email`) to a pure
//! transformation of the raw value. The registry is an injected, immutable
//! mapping rather than a process-wide table, so embedders and tests can
//! substitute custom strategies. A policy-supplied literal replacement
//! always takes precedence over type-based masking; that override lives in
//! the filter engine, not here.
//!
//! All strategies are deterministic and side-effect free, which allows
//! exact-output testing.

use std::collections::BTreeMap;

/// A pure masking transformation.
pub type MaskFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Registry of masking strategies keyed by field type (case-insensitive).
///
/// Unregistered field types fall back to the generic strategy, which keeps
/// the first and last character and masks the interior.
pub struct MaskingRegistry {
	strategies: BTreeMap<String, MaskFn>,
	fallback: MaskFn,
}

impl MaskingRegistry {
	/// Creates a registry with the built-in strategies: `ssn`,
	/// `credit_card`, `phone`, `email`, `salary`, and `currency`.
	pub fn new() -> Self {
		Self::empty()
			.with_strategy("ssn", mask_ssn)
			.with_strategy("credit_card", mask_credit_card)
			.with_strategy("phone", mask_phone)
			.with_strategy("email", mask_email)
			.with_strategy("salary", mask_currency)
			.with_strategy("currency", mask_currency)
	}

	/// Creates a registry with no type-specific strategies, only the
	/// generic fallback.
	pub fn empty() -> Self {
		Self {
			strategies: BTreeMap::new(),
			fallback: Box::new(mask_generic),
		}
	}

	/// Builder: register (or replace) the strategy for a field type.
	pub fn with_strategy(
		mut self,
		field_type: impl Into<String>,
		strategy: impl Fn(&str) -> String + Send + Sync + 'static,
	) -> Self {
		self.strategies
			.insert(field_type.into().to_lowercase(), Box::new(strategy));
		self
	}

	/// Builder: replace the fallback strategy for unregistered types.
	pub fn with_fallback(
		mut self,
		strategy: impl Fn(&str) -> String + Send + Sync + 'static,
	) -> Self {
		self.fallback = Box::new(strategy);
		self
	}

	/// Masks a value according to the strategy registered for its field
	/// type, falling back to the generic strategy.
	pub fn mask(&self, field_type: &str, value: &str) -> String {
		match self.strategies.get(&field_type.to_lowercase()) {
			Some(strategy) => strategy(value),
			None => (self.fallback)(value),
		}
	}

	/// Field types with a registered strategy.
	pub fn registered_types(&self) -> impl Iterator<Item = &str> {
		self.strategies.keys().map(String::as_str)
	}
}

impl Default for MaskingRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for MaskingRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MaskingRegistry")
			.field("types", &self.strategies.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// `***-**-6789` — keeps the last four characters of the value.
fn mask_ssn(value: &str) -> String {
	let chars: Vec<char> = value.chars().collect();
	if chars.len() < 4 {
		return "***-**-****".to_string();
	}
	let last_four: String = chars[chars.len() - 4..].iter().collect();
	format!("***-**-{}", last_four)
}

/// `****-****-****-1111` — keeps the last four digits.
fn mask_credit_card(value: &str) -> String {
	let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
	if digits.len() < 4 {
		return "****-****-****-****".to_string();
	}
	format!("****-****-****-{}", &digits[digits.len() - 4..])
}

/// `***-***-4567` — keeps the last four digits behind a fixed prefix.
fn mask_phone(value: &str) -> String {
	let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
	if digits.len() < 4 {
		return "***-***-****".to_string();
	}
	format!("***-***-{}", &digits[digits.len() - 4..])
}

/// `*****@example.com` — keeps the domain, masks the local part with a
/// fixed-width mask so its length is not disclosed.
fn mask_email(value: &str) -> String {
	match value.split_once('@') {
		Some((_, domain)) => format!("*****@{}", domain),
		None => "*****@*****.***".to_string(),
	}
}

/// Buckets the numeric magnitude behind a masked currency symbol.
///
/// Non-numeric input yields the generic masked bucket.
fn mask_currency(value: &str) -> String {
	let cleaned: String = value
		.chars()
		.filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
		.collect();
	match cleaned.parse::<f64>() {
		Ok(amount) if amount < 50_000.0 => "$*** (<50k)".to_string(),
		Ok(amount) if amount <= 100_000.0 => "$*** (50k-100k)".to_string(),
		Ok(_) => "$*** (>100k)".to_string(),
		Err(_) => "$*** (masked)".to_string(),
	}
}

/// Keeps the first and last character, masks the interior with up to five
/// asterisks. Values of two characters or fewer collapse to `***`.
fn mask_generic(value: &str) -> String {
	let chars: Vec<char> = value.chars().collect();
	if chars.len() <= 2 {
		return "***".to_string();
	}
	let interior = "*".repeat((chars.len() - 2).min(5));
	format!("{}{}{}", chars[0], interior, chars[chars.len() - 1])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ssn_keeps_last_four() {
		let registry = MaskingRegistry::new();
		assert_eq!(registry.mask("ssn", "123-45-6789"), "***-**-6789");
		assert_eq!(registry.mask("ssn", "987654321"), "***-**-4321");
	}

	#[test]
	fn short_ssn_is_fully_masked() {
		let registry = MaskingRegistry::new();
		assert_eq!(registry.mask("ssn", "123"), "***-**-****");
		assert_eq!(registry.mask("ssn", ""), "***-**-****");
	}

	#[test]
	fn credit_card_keeps_last_four_digits() {
		let registry = MaskingRegistry::new();
		assert_eq!(
			registry.mask("credit_card", "4111-1111-1111-1111"),
			"****-****-****-1111"
		);
		assert_eq!(
			registry.mask("credit_card", "4111111111111234"),
			"****-****-****-1234"
		);
		assert_eq!(registry.mask("credit_card", "12"), "****-****-****-****");
	}

	#[test]
	fn phone_keeps_last_four_digits() {
		let registry = MaskingRegistry::new();
		assert_eq!(registry.mask("phone", "(555) 123-4567"), "***-***-4567");
		assert_eq!(registry.mask("phone", "ext 12"), "***-***-****");
	}

	#[test]
	fn email_keeps_domain() {
		let registry = MaskingRegistry::new();
		assert_eq!(
			registry.mask("email", "jane.doe@example.com"),
			"*****@example.com"
		);
		assert_eq!(registry.mask("email", "not-an-email"), "*****@*****.***");
	}

	#[test]
	fn salary_buckets_by_magnitude() {
		let registry = MaskingRegistry::new();
		assert_eq!(registry.mask("salary", "42000"), "$*** (<50k)");
		assert_eq!(registry.mask("salary", "$75,000"), "$*** (50k-100k)");
		assert_eq!(registry.mask("salary", "100000"), "$*** (50k-100k)");
		assert_eq!(registry.mask("salary", "250000.50"), "$*** (>100k)");
		assert_eq!(registry.mask("currency", "90000"), "$*** (50k-100k)");
	}

	#[test]
	fn non_numeric_salary_is_generic_bucket() {
		let registry = MaskingRegistry::new();
		assert_eq!(registry.mask("salary", "competitive"), "$*** (masked)");
	}

	#[test]
	fn unknown_type_uses_generic_strategy() {
		let registry = MaskingRegistry::new();
		assert_eq!(registry.mask("nickname", "jonathan"), "j*****n");
		assert_eq!(registry.mask("nickname", "abcd"), "a**d");
	}

	#[test]
	fn generic_interior_caps_at_five_asterisks() {
		let registry = MaskingRegistry::new();
		assert_eq!(
			registry.mask("note", "a-very-long-free-text-value"),
			"a*****e"
		);
	}

	#[test]
	fn short_values_collapse_to_fixed_mask() {
		let registry = MaskingRegistry::new();
		assert_eq!(registry.mask("note", "ab"), "***");
		assert_eq!(registry.mask("note", "a"), "***");
		assert_eq!(registry.mask("note", ""), "***");
	}

	#[test]
	fn type_lookup_is_case_insensitive() {
		let registry = MaskingRegistry::new();
		assert_eq!(registry.mask("SSN", "123-45-6789"), "***-**-6789");
	}

	#[test]
	fn custom_strategy_replaces_builtin() {
		let registry = MaskingRegistry::new().with_strategy("ssn", |_| "suppressed".to_string());
		assert_eq!(registry.mask("ssn", "123-45-6789"), "suppressed");
		// Other built-ins are untouched.
		assert_eq!(registry.mask("phone", "5551234567"), "***-***-4567");
	}

	#[test]
	fn empty_registry_only_has_fallback() {
		let registry = MaskingRegistry::empty();
		assert_eq!(registry.registered_types().count(), 0);
		assert_eq!(registry.mask("ssn", "123-45-6789"), "1*****9");
	}

	mod properties {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn masking_is_deterministic(
				field_type in "[a-z_]{1,12}",
				value in "[ -~]{0,40}",
			) {
				let registry = MaskingRegistry::new();
				prop_assert_eq!(
					registry.mask(&field_type, &value),
					registry.mask(&field_type, &value)
				);
			}

			#[test]
			fn ssn_output_never_contains_leading_digits(value in "[0-9]{9,11}") {
				let registry = MaskingRegistry::new();
				let masked = registry.mask("ssn", &value);
				let last_four: String = value.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
				prop_assert_eq!(masked, format!("***-**-{}", last_four));
			}

			#[test]
			fn generic_mask_never_reveals_interior(value in "[a-z]{3,30}") {
				let registry = MaskingRegistry::new();
				let masked = registry.mask("free_text", &value);
				let first = value.chars().next().unwrap();
				let last = value.chars().last().unwrap();
				prop_assert!(masked.starts_with(first));
				prop_assert!(masked.ends_with(last));
				prop_assert!(masked[1..masked.len() - 1].chars().all(|c| c == '*'));
			}
		}
	}
}
