//! Colors, the group palette and page-level visual style.

use std::collections::HashMap;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parses `#rgb`, `#rrggbb`, `rgb(..)` and `rgba(..)`.
	pub fn parse(css: &str) -> Option<Self> {
		let css = css.trim();
		if let Some(hex) = css.strip_prefix('#') {
			if !hex.is_ascii() {
				return None;
			}
			let channel = |s: &str| u8::from_str_radix(s, 16).ok();
			return match hex.len() {
				3 => {
					let mut rgb = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
					Some(Self::rgb(rgb.next()??, rgb.next()??, rgb.next()??))
				}
				6 => Some(Self::rgb(
					channel(&hex[0..2])?,
					channel(&hex[2..4])?,
					channel(&hex[4..6])?,
				)),
				_ => None,
			};
		}

		let inner = css
			.strip_prefix("rgba(")
			.or_else(|| css.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
		if parts.len() < 3 {
			return None;
		}
		let a = match parts.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Self::rgba(
			parts[0].parse().ok()?,
			parts[1].parse().ok()?,
			parts[2].parse().ok()?,
			a,
		))
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fill and border of a node, normal and highlighted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeColor {
	pub background: Color,
	pub border: Color,
	pub highlight: Color,
}

impl NodeColor {
	const fn hex(background: u32, border: u32, highlight: u32) -> Self {
		const fn unpack(v: u32) -> Color {
			Color::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
		}
		Self {
			background: unpack(background),
			border: unpack(border),
			highlight: unpack(highlight),
		}
	}

	/// Colors for a node that sets its own `color`.
	pub fn from_background(background: Color) -> Self {
		Self {
			background,
			border: background.darken(0.3),
			highlight: background.lerp(Color::rgb(255, 255, 255), 0.4),
		}
	}
}

const GROUP_SWATCHES: [NodeColor; 10] = [
	NodeColor::hex(0x97C2FC, 0x2B7CE9, 0xD2E5FF), // blue
	NodeColor::hex(0xFFFF00, 0xFFA500, 0xFFFFA3), // yellow
	NodeColor::hex(0xFB7E81, 0xFA0A10, 0xFFAFB1), // red
	NodeColor::hex(0x7BE141, 0x41A906, 0xA1EC76), // green
	NodeColor::hex(0xEB7DF4, 0xE129F0, 0xF0B3F5), // magenta
	NodeColor::hex(0xAD85E4, 0x7C29F0, 0xD3BDF0), // purple
	NodeColor::hex(0xFFA807, 0xC37F00, 0xFFCA66), // orange
	NodeColor::hex(0x6E6EFD, 0x4220FB, 0x9B9BFD), // dark blue
	NodeColor::hex(0xFFC0CB, 0xFD5A77, 0xFFD1D9), // pink
	NodeColor::hex(0xC2FABC, 0x4AD63A, 0xE6FFE3), // mint
];

/// Hands out swatches to groups in order of first appearance.
#[derive(Clone, Debug, Default)]
pub struct GroupPalette {
	assigned: HashMap<String, usize>,
}

impl GroupPalette {
	/// Color for a node with no group.
	pub const DEFAULT: NodeColor = GROUP_SWATCHES[0];

	pub fn color_for(&mut self, group: Option<&str>) -> NodeColor {
		let Some(group) = group else {
			return Self::DEFAULT;
		};
		let next = self.assigned.len();
		let slot = *self.assigned.entry(group.to_string()).or_insert(next);
		GROUP_SWATCHES[slot % GROUP_SWATCHES.len()]
	}
}

/// Page-level style not covered by the network options.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub shadow: Color,
	pub shadow_blur: f64,
	pub shadow_offset: f64,
	/// Outline drawn behind label text.
	pub label_halo: Color,
	pub edge_label_color: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			shadow: Color::rgba(0, 0, 0, 0.5),
			shadow_blur: 10.0,
			shadow_offset: 5.0,
			label_halo: Color::rgb(255, 255, 255),
			edge_label_color: Color::rgb(0x34, 0x34, 0x34),
		}
	}
}
