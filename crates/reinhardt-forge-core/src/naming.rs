//! Deterministic accessor names for component identifiers.
//!
//! Identifiers are Rust paths such as `crate::mail::Mailer`. The mangled
//! form is a valid Rust identifier that can be used as an accessor name:
//!
//! | Input | Output |
//! |-------|--------|
//! | ASCII letter, digit (not leading) | unchanged |
//! | `::` | `__` |
//! | `_` | `_0` |
//! | other ASCII character | `_xHH` |
//! | non-ASCII character | `_uHHHHHH` |
//!
//! A name that would be a Rust keyword (`type`, `self`) has its first
//! letter written as `_xHH` instead, so `type` becomes `_x74ype`.
//!
//! Every `_` in the output starts one of these escapes, so the encoding is a
//! prefix code and distinct identifiers never share a name.

use std::fmt::Write as _;

const EMPTY: &str = "_e";

/// Strict, reserved and weak keywords that can not name a method.
const KEYWORDS: &[&str] = &[
	"Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
	"crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
	"impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
	"ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
	"unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Returns the accessor name of `id`.
pub fn mangle(id: &str) -> String {
	if id.is_empty() {
		return EMPTY.to_string();
	}

	let mut out = String::with_capacity(id.len() + 8);
	let mut chars = id.chars().peekable();
	while let Some(ch) = chars.next() {
		match ch {
			':' if chars.peek() == Some(&':') => {
				chars.next();
				out.push_str("__");
			}
			'_' => out.push_str("_0"),
			c if c.is_ascii_alphabetic() => out.push(c),
			c if c.is_ascii_digit() && !out.is_empty() => out.push(c),
			c if c.is_ascii() => {
				let _ = write!(out, "_x{:02X}", c as u32);
			}
			c => {
				let _ = write!(out, "_u{:06X}", c as u32);
			}
		}
	}

	if KEYWORDS.contains(&out.as_str()) {
		// Keywords are all ASCII letters.
		let first = out.remove(0);
		out.insert_str(0, &format!("_x{:02X}", first as u32));
	}
	out
}

/// Recovers the identifier from an accessor name produced by [`mangle`].
///
/// Returns `None` when `hash` is not a valid mangled name.
pub fn demangle(hash: &str) -> Option<String> {
	if hash == EMPTY {
		return Some(String::new());
	}

	let mut out = String::with_capacity(hash.len());
	let mut chars = hash.chars();
	while let Some(ch) = chars.next() {
		if ch != '_' {
			if !ch.is_ascii_alphanumeric() {
				return None;
			}
			out.push(ch);
			continue;
		}
		match chars.next()? {
			'_' => out.push_str("::"),
			'0' => out.push('_'),
			'x' => out.push(read_hex(&mut chars, 2)?),
			'u' => out.push(read_hex(&mut chars, 6)?),
			_ => return None,
		}
	}
	Some(out)
}

fn read_hex(chars: &mut std::str::Chars<'_>, width: usize) -> Option<char> {
	let digits: String = chars.by_ref().take(width).collect();
	if digits.len() != width {
		return None;
	}
	u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("crate::mail::Mailer", "crate__mail__Mailer")]
	#[case("app::smtp_transport::Transport", "app__smtp_0transport__Transport")]
	#[case("app::Repo<User>", "app__Repo_x3CUser_x3E")]
	#[case("app::V2", "app__V2")]
	#[case("2fa::Token", "_x32fa__Token")]
	#[case("app::Café", "app__Caf_u0000E9")]
	#[case("", "_e")]
	#[case("type", "_x74ype")]
	#[case("self", "_x73elf")]
	#[case("Self", "_x53elf")]
	#[case("crate", "_x63rate")]
	#[case("app::type", "app__type")]
	#[case("types", "types")]
	fn test_mangle(#[case] id: &str, #[case] expected: &str) {
		// Act
		let hash = mangle(id);

		// Assert
		assert_eq!(hash, expected);
		assert_eq!(demangle(&hash).as_deref(), Some(id));
	}

	#[rstest]
	fn test_mangle_separates_colon_pairs_from_underscores() {
		// Arrange
		let path = "a::b";
		let underscored = "a__b";

		// Act
		let first = mangle(path);
		let second = mangle(underscored);

		// Assert
		assert_ne!(first, second);
		assert_eq!(second, "a_0_0b");
	}

	#[rstest]
	#[case("a_")]
	#[case("a_q")]
	#[case("a_x4")]
	#[case("a-b")]
	fn test_demangle_rejects_malformed_names(#[case] hash: &str) {
		// Act
		let result = demangle(hash);

		// Assert
		assert!(result.is_none(), "expected '{hash}' to be rejected");
	}
}
