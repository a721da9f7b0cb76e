//! Label and avatar presentation rules for graph nodes.

use super::types::{Entity, Role};

/// Suffix appended to shortened labels.
pub const ELLIPSIS: &str = "...";
/// Upper bound on characters dropped while shortening one label.
pub const MAX_TRUNCATE_ITERATIONS: usize = 100;

/// Per-role drawing constants.
#[derive(Clone, Copy, Debug)]
pub struct RoleStyle {
	/// Radius of the node disc.
	pub circle_radius: f64,
	/// Radius the avatar is clipped to.
	pub avatar_radius: f64,
	/// Outline color.
	pub stroke: &'static str,
	/// Outline width.
	pub stroke_width: f64,
	/// Canvas font of the name label.
	pub label_font: &'static str,
	/// Distance from the node center down to the label baseline.
	pub label_offset: f64,
	/// Widest the label may measure before it is shortened.
	pub label_max_width: f64,
	/// Canvas font of the fallback glyph.
	pub glyph_font: &'static str,
	/// Label used when the entity has no display name.
	pub default_label: &'static str,
}

/// Style of the focal node.
pub const FOCAL_STYLE: RoleStyle = RoleStyle {
	circle_radius: 24.0,
	avatar_radius: 22.0,
	stroke: "#ff6b6b",
	stroke_width: 2.0,
	label_font: "bold 11px sans-serif",
	label_offset: 38.0,
	label_max_width: 70.0,
	glyph_font: "16px sans-serif",
	default_label: "User",
};

/// Style of related nodes.
pub const RELATED_STYLE: RoleStyle = RoleStyle {
	circle_radius: 18.0,
	avatar_radius: 16.0,
	stroke: "#4dabf7",
	stroke_width: 1.0,
	label_font: "9px sans-serif",
	label_offset: 32.0,
	label_max_width: 60.0,
	glyph_font: "12px sans-serif",
	default_label: "Connection",
};

/// Style for `role`.
pub fn style_for(role: Role) -> &'static RoleStyle {
	match role {
		Role::Focal => &FOCAL_STYLE,
		Role::Related => &RELATED_STYLE,
	}
}

/// Display name, or the role's placeholder.
pub fn display_label(entity: &Entity) -> &str {
	match entity.display_name.as_deref() {
		Some(name) if !name.trim().is_empty() => name,
		_ => style_for(entity.role).default_label,
	}
}

/// Shortens `text` until `measure` says it fits in `max_width`.
///
/// Drops one character per step and appends [`ELLIPSIS`]. Stops after
/// [`MAX_TRUNCATE_ITERATIONS`] steps or when a single character is left, so a
/// `measure` that never shrinks still terminates. Once truncation starts the
/// result always ends in the ellipsis.
pub fn truncate_label(text: &str, max_width: f64, mut measure: impl FnMut(&str) -> f64) -> String {
	if measure(text) <= max_width {
		return text.to_owned();
	}
	let mut kept: Vec<char> = text.chars().collect();
	let mut label = String::new();
	for _ in 0..MAX_TRUNCATE_ITERATIONS {
		if kept.len() > 1 {
			kept.pop();
		}
		label = kept.iter().collect::<String>() + ELLIPSIS;
		if kept.len() <= 1 || measure(&label) <= max_width {
			break;
		}
	}
	label
}

/// Character drawn in place of a missing avatar.
pub fn fallback_glyph(display_name: Option<&str>) -> String {
	display_name
		.and_then(|n| n.trim().chars().next())
		.map(|c| c.to_uppercase().collect())
		.unwrap_or_else(|| "U".to_owned())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn width(s: &str) -> f64 {
		s.chars().count() as f64 * 6.0
	}

	#[test]
	fn short_labels_pass_through() {
		assert_eq!(truncate_label("alice", 60.0, width), "alice");
	}

	#[test]
	fn long_labels_end_in_ellipsis_and_fit() {
		let out = truncate_label("a very long display name indeed", 60.0, width);
		assert!(out.ends_with(ELLIPSIS));
		assert!(width(&out) <= 60.0);
		assert_eq!(out, "a very ...");
	}

	#[test]
	fn constant_measure_terminates() {
		let mut calls = 0;
		let out = truncate_label("x".repeat(500).as_str(), 10.0, |_| {
			calls += 1;
			1000.0
		});
		assert!(out.ends_with(ELLIPSIS));
		assert!(calls <= MAX_TRUNCATE_ITERATIONS + 1);
	}

	#[test]
	fn tiny_names_still_get_an_ellipsis() {
		let out = truncate_label("ab", 1.0, |_| 50.0);
		assert_eq!(out, "a...");
	}

	#[test]
	fn multibyte_names_truncate_on_char_boundaries() {
		let out = truncate_label("ééééééééééééééé", 30.0, width);
		assert_eq!(out, "éé...");
	}

	#[test]
	fn glyph_uses_first_letter_uppercased() {
		assert_eq!(fallback_glyph(Some("bob")), "B");
		assert_eq!(fallback_glyph(Some("  émile")), "É");
		assert_eq!(fallback_glyph(Some("")), "U");
		assert_eq!(fallback_glyph(None), "U");
	}

	#[test]
	fn placeholder_label_depends_on_role() {
		assert_eq!(display_label(&Entity::new("1", Role::Focal)), "User");
		assert_eq!(display_label(&Entity::new("2", Role::Related)), "Connection");
		assert_eq!(
			display_label(&Entity::new("3", Role::Related).with_name("Zed")),
			"Zed"
		);
	}
}
