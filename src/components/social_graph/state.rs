use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use log::{debug, warn};

use super::forces;
use super::types::{Entity, LayoutConfig, LayoutError, Link, Point, Role, SimNode};

/// Force-directed placement of one focal entity and its related entities.
///
/// The focal node is pinned to the center of the surface; every related node
/// is linked to it and settles at roughly `link_distance` while repelling
/// its siblings. Construction runs `settle_iterations` ticks so the first
/// paint is already close to converged.
pub struct LayoutEngine {
	config: LayoutConfig,
	center: Point,
	nodes: Vec<SimNode>,
	links: Vec<Link>,
	overflow: usize,
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	dragging: Option<usize>,
}

/// The related entities that get a node next to `focal`, in input order.
///
/// Drops entities with a blank id and any id already seen, the focal's own
/// included. An empty result means there is no graph to draw.
pub fn distinct_related(focal: &Entity, related: Vec<Entity>) -> Vec<Entity> {
	let mut seen = HashSet::new();
	seen.insert(focal.id.clone());
	related
		.into_iter()
		.filter(|e| {
			if !e.has_valid_id() {
				warn!("skipping related entity without an id");
				return false;
			}
			if !seen.insert(e.id.clone()) {
				warn!("skipping duplicate entity {}", e.id);
				return false;
			}
			true
		})
		.collect()
}

impl LayoutEngine {
	/// Builds and pre-settles a layout.
	///
	/// Entities with an empty id, or an id already taken, are skipped. If the
	/// focal entity is skipped nothing is laid out.
	pub fn new(
		focal: Entity,
		related: Vec<Entity>,
		config: LayoutConfig,
	) -> Result<Self, LayoutError> {
		config.validate()?;
		let center = config.center();
		let mut engine = Self {
			center,
			nodes: Vec::new(),
			links: Vec::new(),
			overflow: 0,
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: config.alpha_decay(),
			dragging: None,
			config,
		};

		if !focal.has_valid_id() {
			warn!("focal entity has no id, nothing to lay out");
			return Ok(engine);
		}

		let valid = distinct_related(&focal, related);
		engine.overflow = valid.len().saturating_sub(engine.config.max_related);

		let mut focal_node = SimNode::new(
			Entity {
				role: Role::Focal,
				..focal
			},
			center,
			engine.config.radius_for(Role::Focal),
		);
		focal_node.pin = Some(center);
		engine.nodes.push(focal_node);

		let shown = valid.len().min(engine.config.max_related);
		for (i, entity) in valid.into_iter().take(shown).enumerate() {
			let angle = i as f64 * 2.0 * PI / shown as f64;
			let position = Point::new(
				center.x + engine.config.link_distance * angle.cos(),
				center.y + engine.config.link_distance * angle.sin(),
			);
			engine.nodes.push(SimNode::new(
				Entity {
					role: Role::Related,
					..entity
				},
				position,
				engine.config.radius_for(Role::Related),
			));
			engine.links.push(Link {
				source: 0,
				target: i + 1,
			});
		}

		debug!(
			"layout: {} related nodes, {} overflow",
			engine.links.len(),
			engine.overflow
		);
		engine.settle(engine.config.settle_iterations);
		Ok(engine)
	}

	/// Runs `n` ticks without rendering.
	pub fn settle(&mut self, n: usize) {
		for _ in 0..n {
			self.advance();
		}
	}

	/// One integration step of the combined forces.
	pub fn advance(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		let alpha = self.alpha;
		let cfg = &self.config;

		forces::centering(&mut self.nodes, self.center, cfg.centering_strength, alpha);
		forces::links(
			&mut self.nodes,
			&self.links,
			cfg.link_distance,
			cfg.link_strength,
			alpha,
		);
		forces::repulsion(&mut self.nodes, cfg.charge, alpha);
		forces::collision(&mut self.nodes, 1.0);

		let keep = 1.0 - cfg.velocity_decay;
		for node in &mut self.nodes {
			if let Some(pin) = node.pin {
				node.position = pin;
				node.vx = 0.0;
				node.vy = 0.0;
			} else {
				node.vx *= keep;
				node.vy *= keep;
				node.position.x += node.vx;
				node.position.y += node.vy;
			}
		}
	}

	/// Position of every laid-out entity, keyed by id.
	pub fn positions(&self) -> HashMap<String, Point> {
		self.nodes
			.iter()
			.map(|n| (n.entity.id.clone(), n.position))
			.collect()
	}

	/// Laid-out nodes; index 0 is the focal node when present.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Focal↔related links.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Related entities that were valid but not laid out.
	pub fn overflow(&self) -> usize {
		self.overflow
	}

	/// Whether there is anything worth drawing.
	pub fn should_render(&self) -> bool {
		!self.links.is_empty()
	}

	/// Current simulation heat.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// The center the focal node is pinned to.
	pub fn center(&self) -> Point {
		self.center
	}

	/// True once the simulation has cooled and nothing is being dragged.
	pub fn is_settled(&self) -> bool {
		self.dragging.is_none() && self.alpha < self.config.alpha_min
	}

	/// Topmost node whose radius contains `(x, y)`.
	pub fn node_at(&self, x: f64, y: f64) -> Option<&str> {
		let p = Point::new(x, y);
		self.nodes
			.iter()
			.rev()
			.find(|n| n.position.distance(p) <= n.radius)
			.map(|n| n.entity.id.as_str())
	}

	fn index_of(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.entity.id == id)
	}

	/// Pins `id` where it is and reheats the simulation.
	pub fn begin_drag(&mut self, id: &str) {
		let Some(idx) = self.index_of(id) else {
			return;
		};
		if let Some(prev) = self.dragging.filter(|&prev| prev != idx) {
			let prev_id = self.nodes[prev].entity.id.clone();
			self.end_drag(&prev_id);
		}
		let node = &mut self.nodes[idx];
		node.pin = Some(node.position);
		self.dragging = Some(idx);
		self.alpha_target = self.config.drag_alpha_target;
		if self.alpha < self.alpha_target {
			self.alpha = self.alpha_target;
		}
	}

	/// Moves the dragged node to the pointer.
	pub fn drag(&mut self, id: &str, x: f64, y: f64) {
		let Some(idx) = self.index_of(id) else {
			return;
		};
		let p = Point::new(x, y);
		let node = &mut self.nodes[idx];
		node.pin = Some(p);
		node.position = p;
	}

	/// Releases a drag. Related nodes are freed; the focal node goes back to
	/// the center.
	pub fn end_drag(&mut self, id: &str) {
		let Some(idx) = self.index_of(id) else {
			return;
		};
		let center = self.center;
		let node = &mut self.nodes[idx];
		match node.entity.role {
			Role::Focal => {
				node.pin = Some(center);
				node.position = center;
				node.vx = 0.0;
				node.vy = 0.0;
			}
			Role::Related => node.pin = None,
		}
		if self.dragging == Some(idx) {
			self.dragging = None;
		}
		self.alpha_target = 0.0;
	}

	/// Recenters the layout on a resized surface.
	pub fn resize(&mut self, width: f64, height: f64) {
		if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
			warn!("ignoring invalid layout size {width}x{height}");
			return;
		}
		self.config.width = width;
		self.config.height = height;
		self.center = self.config.center();
		let center = self.center;
		for node in &mut self.nodes {
			if node.entity.role == Role::Focal && self.dragging.is_none() {
				node.pin = Some(center);
				node.position = center;
			}
		}
		self.alpha = self.alpha.max(self.config.drag_alpha_target);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn related(n: usize) -> Vec<Entity> {
		(0..n)
			.map(|i| Entity::new(format!("r{i}"), Role::Related).with_name(format!("Friend {i}")))
			.collect()
	}

	fn engine(n: usize) -> LayoutEngine {
		LayoutEngine::new(
			Entity::new("me", Role::Focal),
			related(n),
			LayoutConfig::default(),
		)
		.expect("valid config")
	}

	#[test]
	fn focal_is_pinned_at_center() {
		let e = engine(3);
		assert_eq!(e.nodes()[0].entity.role, Role::Focal);
		assert_eq!(e.nodes()[0].position, e.center());
	}

	#[test]
	fn role_is_forced_from_position_in_input() {
		let e = LayoutEngine::new(
			Entity::new("me", Role::Related),
			vec![Entity::new("a", Role::Focal)],
			LayoutConfig::default(),
		)
		.unwrap();
		assert_eq!(e.nodes()[0].entity.role, Role::Focal);
		assert_eq!(e.nodes()[1].entity.role, Role::Related);
	}

	#[test]
	fn skips_malformed_and_duplicate_entities() {
		let mut input = related(3);
		input.insert(1, Entity::new("  ", Role::Related));
		input.push(Entity::new("r0", Role::Related));
		input.push(Entity::new("me", Role::Related));
		let e = LayoutEngine::new(Entity::new("me", Role::Focal), input, LayoutConfig::default())
			.unwrap();
		assert_eq!(e.links().len(), 3);
		assert_eq!(e.overflow(), 0);
	}

	#[test]
	fn invalid_focal_yields_empty_layout() {
		let e = LayoutEngine::new(Entity::new("", Role::Focal), related(4), LayoutConfig::default())
			.unwrap();
		assert!(e.positions().is_empty());
		assert!(!e.should_render());
	}

	#[test]
	fn rejects_bad_config() {
		let cfg = LayoutConfig {
			link_distance: -1.0,
			..LayoutConfig::default()
		};
		let err = LayoutEngine::new(Entity::new("me", Role::Focal), related(1), cfg)
			.err()
			.unwrap();
		assert!(matches!(err, LayoutError::NotPositive { field: "link_distance", .. }));

		let cfg = LayoutConfig {
			velocity_decay: 0.0,
			..LayoutConfig::default()
		};
		assert!(cfg.validate().is_err());
	}

	#[test]
	fn cools_down_eventually() {
		let mut e = engine(5);
		assert!(!e.is_settled());
		e.settle(400);
		assert!(e.is_settled());
	}

	#[test]
	fn drag_reheats_and_holds_heat() {
		let mut e = engine(2);
		e.settle(400);
		e.begin_drag("r0");
		assert!(!e.is_settled());
		e.drag("r0", 10.0, 20.0);
		e.settle(500);
		assert!(e.alpha() > 0.2);
		assert_eq!(e.positions()["r0"], Point::new(10.0, 20.0));
		e.end_drag("r0");
		e.settle(500);
		assert!(e.is_settled());
		assert_ne!(e.positions()["r0"], Point::new(10.0, 20.0));
	}

	#[test]
	fn node_at_hits_within_radius() {
		let e = engine(1);
		let c = e.center();
		assert_eq!(e.node_at(c.x + 5.0, c.y), Some("me"));
		assert_eq!(e.node_at(-500.0, -500.0), None);
	}

	#[test]
	fn unknown_ids_are_ignored() {
		let mut e = engine(2);
		let before = e.positions();
		e.begin_drag("nope");
		e.drag("nope", 1.0, 1.0);
		e.end_drag("nope");
		assert_eq!(before, e.positions());
	}

	#[test]
	fn resize_recenters_focal() {
		let mut e = engine(2);
		e.resize(600.0, 400.0);
		assert_eq!(e.positions()["me"], Point::new(300.0, 200.0));
		e.advance();
		assert_eq!(e.positions()["me"], Point::new(300.0, 200.0));
	}

	#[test]
	fn self_only_network_has_nothing_to_draw() {
		let me = Entity::new("me", Role::Focal);
		assert!(distinct_related(&me, vec![Entity::new("me", Role::Related)]).is_empty());
		let e = LayoutEngine::new(me, vec![Entity::new("me", Role::Related)], LayoutConfig::default())
			.unwrap();
		assert!(!e.should_render());
		assert_eq!(e.nodes().len(), 1);
	}

	#[test]
	fn distinct_related_keeps_first_seen_order() {
		let me = Entity::new("me", Role::Focal);
		let kept = distinct_related(
			&me,
			vec![
				Entity::new("b", Role::Related),
				Entity::new("me", Role::Related),
				Entity::new("a", Role::Related),
				Entity::new("b", Role::Related),
			],
		);
		let ids: Vec<&str> = kept.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, ["b", "a"]);
	}

	#[test]
	fn new_drag_releases_the_previous_node() {
		let mut e = engine(3);
		e.begin_drag("r0");
		e.begin_drag("r1");
		let pin = |e: &LayoutEngine, id: &str| {
			e.nodes().iter().find(|n| n.entity.id == id).and_then(|n| n.pin)
		};
		assert!(pin(&e, "r0").is_none());
		assert!(pin(&e, "r1").is_some());
		e.end_drag("r1");
		assert!(e.nodes().iter().skip(1).all(|n| n.pin.is_none()));
	}

	#[test]
	fn nodes_take_radius_from_role() {
		let e = engine(1);
		let cfg = LayoutConfig::default();
		assert_eq!(e.nodes()[0].radius, cfg.radius_for(Role::Focal));
		assert_eq!(e.nodes()[1].radius, cfg.radius_for(Role::Related));
	}
}
