use thiserror::Error;

/// A point in layout space (canvas pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Creates a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
	}
}

/// Which side of the star graph an entity sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
	/// The profile the graph is centered on.
	Focal,
	/// A profile linked to the focal one.
	Related,
}

/// A profile as the layout consumes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
	/// Unique identifier; entities with an empty id are skipped.
	pub id: String,
	/// Name shown under the node.
	pub display_name: Option<String>,
	/// Avatar image drawn inside the node.
	pub avatar_url: Option<String>,
	/// Focal or related.
	pub role: Role,
}

impl Entity {
	/// Creates an entity without a name or avatar.
	pub fn new(id: impl Into<String>, role: Role) -> Self {
		Self {
			id: id.into(),
			display_name: None,
			avatar_url: None,
			role,
		}
	}

	/// Builder: set the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.display_name = Some(name.into());
		self
	}

	/// Builder: set the avatar URL.
	pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
		self.avatar_url = Some(url.into());
		self
	}

	pub(crate) fn has_valid_id(&self) -> bool {
		!self.id.trim().is_empty()
	}
}

/// An undirected focal↔related edge, by node index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	/// Index of the focal node.
	pub source: usize,
	/// Index of the related node.
	pub target: usize,
}

/// Simulation state of one laid-out entity.
#[derive(Clone, Debug)]
pub struct SimNode {
	/// The entity this node draws.
	pub entity: Entity,
	/// Current position.
	pub position: Point,
	pub(crate) vx: f64,
	pub(crate) vy: f64,
	/// Fixed position, set for the focal node and for any node being dragged.
	pub pin: Option<Point>,
	/// Collision radius.
	pub radius: f64,
}

impl SimNode {
	pub(crate) fn new(entity: Entity, position: Point, radius: f64) -> Self {
		Self {
			entity,
			position,
			vx: 0.0,
			vy: 0.0,
			pin: None,
			radius,
		}
	}

	/// Current velocity.
	pub fn velocity(&self) -> (f64, f64) {
		(self.vx, self.vy)
	}
}

/// Tuning for [`LayoutEngine`](super::LayoutEngine).
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Width of the drawing surface; the center is its midpoint.
	pub width: f64,
	/// Height of the drawing surface.
	pub height: f64,
	/// Maximum number of related entities laid out.
	pub max_related: usize,
	/// Rest length of every link.
	pub link_distance: f64,
	/// Link spring strength.
	pub link_strength: f64,
	/// Pairwise charge; negative repels.
	pub charge: f64,
	/// Pull of every node toward the center.
	pub centering_strength: f64,
	/// Collision radius of the focal node.
	pub focal_radius: f64,
	/// Collision radius of related nodes.
	pub related_radius: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Simulation stops heating below this alpha.
	pub alpha_min: f64,
	/// Alpha held while a drag is active.
	pub drag_alpha_target: f64,
	/// Ticks run before the first paint.
	pub settle_iterations: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			width: 300.0,
			height: 250.0,
			max_related: 8,
			link_distance: 100.0,
			link_strength: 1.0,
			charge: -200.0,
			centering_strength: 0.05,
			focal_radius: 40.0,
			related_radius: 30.0,
			velocity_decay: 0.4,
			alpha_min: 0.001,
			drag_alpha_target: 0.3,
			settle_iterations: 10,
		}
	}
}

impl LayoutConfig {
	/// Config for a surface of the given size, other fields defaulted.
	pub fn sized(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			..Self::default()
		}
	}

	/// Center of the surface.
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	/// Collision radius for a role.
	pub fn radius_for(&self, role: Role) -> f64 {
		match role {
			Role::Focal => self.focal_radius,
			Role::Related => self.related_radius,
		}
	}

	/// Per-tick alpha decay that cools the simulation in roughly 300 ticks.
	pub fn alpha_decay(&self) -> f64 {
		1.0 - self.alpha_min.powf(1.0 / 300.0)
	}

	/// Rejects configurations the simulation cannot run with.
	pub fn validate(&self) -> Result<(), LayoutError> {
		positive("width", self.width)?;
		positive("height", self.height)?;
		positive("link_distance", self.link_distance)?;
		positive("focal_radius", self.focal_radius)?;
		positive("related_radius", self.related_radius)?;
		if !self.link_strength.is_finite() || self.link_strength < 0.0 {
			return Err(LayoutError::NotPositive {
				field: "link_strength",
				value: self.link_strength,
			});
		}
		if !self.charge.is_finite() {
			return Err(LayoutError::NotFinite { field: "charge" });
		}
		if !self.centering_strength.is_finite() || self.centering_strength < 0.0 {
			return Err(LayoutError::NotPositive {
				field: "centering_strength",
				value: self.centering_strength,
			});
		}
		if !(self.velocity_decay > 0.0 && self.velocity_decay <= 1.0) {
			return Err(LayoutError::OutOfRange {
				field: "velocity_decay",
				value: self.velocity_decay,
			});
		}
		if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
			return Err(LayoutError::OutOfRange {
				field: "alpha_min",
				value: self.alpha_min,
			});
		}
		if !(0.0..=1.0).contains(&self.drag_alpha_target) {
			return Err(LayoutError::OutOfRange {
				field: "drag_alpha_target",
				value: self.drag_alpha_target,
			});
		}
		Ok(())
	}
}

fn positive(field: &'static str, value: f64) -> Result<(), LayoutError> {
	if !value.is_finite() {
		return Err(LayoutError::NotFinite { field });
	}
	if value <= 0.0 {
		return Err(LayoutError::NotPositive { field, value });
	}
	Ok(())
}

/// Layout configuration rejected at construction.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
	/// A field must be a finite number.
	#[error("{field} must be finite")]
	NotFinite {
		/// Offending field.
		field: &'static str,
	},
	/// A field must be strictly positive.
	#[error("{field} must be positive, got {value}")]
	NotPositive {
		/// Offending field.
		field: &'static str,
		/// Rejected value.
		value: f64,
	},
	/// A field is outside its allowed range.
	#[error("{field} out of range: {value}")]
	OutOfRange {
		/// Offending field.
		field: &'static str,
		/// Rejected value.
		value: f64,
	},
}
