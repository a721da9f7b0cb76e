//! The four layout forces.
//!
//! Each force reads positions and adds into velocities; none of them moves a
//! node. Integration (and pin handling) happens afterwards in
//! [`LayoutEngine::advance`](super::LayoutEngine::advance), so the forces can
//! be applied in any order within a tick.

use super::types::{Link, Point, SimNode};

/// Minimum squared distance used by the repulsion force.
const MIN_DISTANCE_SQ: f64 = 1.0;

/// Tiny deterministic offset used to separate coincident points.
pub(crate) fn jiggle(seed: usize) -> f64 {
	let j = ((seed as f64 + 1.0) * 0.618_033_988_749_895).fract() - 0.5;
	if j == 0.0 { 1e-7 } else { j * 1e-6 }
}

/// Pulls every node toward `center`.
pub fn centering(nodes: &mut [SimNode], center: Point, strength: f64, alpha: f64) {
	let k = strength * alpha;
	for node in nodes.iter_mut() {
		node.vx += (center.x - node.position.x) * k;
		node.vy += (center.y - node.position.y) * k;
	}
}

/// Springs every link toward `distance`, splitting the correction between the
/// endpoints by degree so the hub barely moves.
pub fn links(nodes: &mut [SimNode], links: &[Link], distance: f64, strength: f64, alpha: f64) {
	let mut degree = vec![0usize; nodes.len()];
	for link in links {
		degree[link.source] += 1;
		degree[link.target] += 1;
	}

	for (i, link) in links.iter().enumerate() {
		let (s, t) = (link.source, link.target);
		let mut x = nodes[t].position.x + nodes[t].vx - nodes[s].position.x - nodes[s].vx;
		let mut y = nodes[t].position.y + nodes[t].vy - nodes[s].position.y - nodes[s].vy;
		if x == 0.0 {
			x = jiggle(i);
		}
		if y == 0.0 {
			y = jiggle(i + 1);
		}
		let l = (x * x + y * y).sqrt();
		let k = (l - distance) / l * alpha * strength;
		x *= k;
		y *= k;

		let bias = degree[s] as f64 / (degree[s] + degree[t]) as f64;
		nodes[t].vx -= x * bias;
		nodes[t].vy -= y * bias;
		nodes[s].vx += x * (1.0 - bias);
		nodes[s].vy += y * (1.0 - bias);
	}
}

/// Charge between every pair of nodes, magnitude falling off with distance.
/// A negative `charge` repels.
pub fn repulsion(nodes: &mut [SimNode], charge: f64, alpha: f64) {
	let n = nodes.len();
	for i in 0..n {
		for j in (i + 1)..n {
			let mut dx = nodes[j].position.x - nodes[i].position.x;
			let mut dy = nodes[j].position.y - nodes[i].position.y;
			if dx == 0.0 && dy == 0.0 {
				dx = jiggle(i * n + j);
				dy = jiggle(j * n + i);
			}
			let mut l = dx * dx + dy * dy;
			if l < MIN_DISTANCE_SQ {
				l = (MIN_DISTANCE_SQ * l).sqrt();
			}
			let w = charge * alpha / l;
			nodes[i].vx += dx * w;
			nodes[i].vy += dy * w;
			nodes[j].vx -= dx * w;
			nodes[j].vy -= dy * w;
		}
	}
}

/// Pushes apart any pair whose predicted positions overlap their radii.
/// Independent of alpha: overlaps are resolved even on a cold simulation.
pub fn collision(nodes: &mut [SimNode], strength: f64) {
	let n = nodes.len();
	for i in 0..n {
		let ri = nodes[i].radius;
		let ri2 = ri * ri;
		let xi = nodes[i].position.x + nodes[i].vx;
		let yi = nodes[i].position.y + nodes[i].vy;
		for j in (i + 1)..n {
			let rj = nodes[j].radius;
			let r = ri + rj;
			let mut x = xi - nodes[j].position.x - nodes[j].vx;
			let mut y = yi - nodes[j].position.y - nodes[j].vy;
			let mut l = x * x + y * y;
			if l >= r * r {
				continue;
			}
			if x == 0.0 {
				x = jiggle(i * n + j);
				l += x * x;
			}
			if y == 0.0 {
				y = jiggle(j * n + i);
				l += y * y;
			}
			let l = l.sqrt();
			let k = (r - l) / l * strength;
			x *= k;
			y *= k;
			let share = rj * rj / (ri2 + rj * rj);
			nodes[i].vx += x * share;
			nodes[i].vy += y * share;
			nodes[j].vx -= x * (1.0 - share);
			nodes[j].vy -= y * (1.0 - share);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::social_graph::types::{Entity, Role};

	fn node(id: &str, x: f64, y: f64, radius: f64) -> SimNode {
		SimNode::new(Entity::new(id, Role::Related), Point::new(x, y), radius)
	}

	#[test]
	fn centering_pulls_toward_center() {
		let mut nodes = vec![node("a", 0.0, 0.0, 10.0)];
		centering(&mut nodes, Point::new(100.0, 50.0), 0.1, 1.0);
		assert!((nodes[0].vx - 10.0).abs() < 1e-9);
		assert!((nodes[0].vy - 5.0).abs() < 1e-9);
	}

	#[test]
	fn repulsion_pushes_pair_apart_symmetrically() {
		let mut nodes = vec![node("a", 0.0, 0.0, 1.0), node("b", 10.0, 0.0, 1.0)];
		repulsion(&mut nodes, -200.0, 1.0);
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
		assert!((nodes[0].vx + nodes[1].vx).abs() < 1e-9);
	}

	#[test]
	fn repulsion_separates_coincident_nodes() {
		let mut nodes = vec![node("a", 5.0, 5.0, 1.0), node("b", 5.0, 5.0, 1.0)];
		repulsion(&mut nodes, -200.0, 1.0);
		assert!(nodes[0].vx != 0.0 || nodes[0].vy != 0.0);
		assert!(nodes[0].vx.is_finite() && nodes[0].vy.is_finite());
	}

	#[test]
	fn stretched_link_pulls_endpoints_together() {
		let mut nodes = vec![node("hub", 0.0, 0.0, 1.0), node("leaf", 300.0, 0.0, 1.0)];
		let l = [Link { source: 0, target: 1 }];
		links(&mut nodes, &l, 100.0, 1.0, 1.0);
		assert!(nodes[1].vx < 0.0);
		assert!(nodes[0].vx > 0.0);
	}

	#[test]
	fn compressed_link_pushes_endpoints_apart() {
		let mut nodes = vec![node("hub", 0.0, 0.0, 1.0), node("leaf", 20.0, 0.0, 1.0)];
		let l = [Link { source: 0, target: 1 }];
		links(&mut nodes, &l, 100.0, 1.0, 1.0);
		assert!(nodes[1].vx > 0.0);
	}

	#[test]
	fn hub_moves_less_than_leaves() {
		let mut nodes = vec![
			node("hub", 0.0, 0.0, 1.0),
			node("a", 300.0, 0.0, 1.0),
			node("b", -300.0, 1.0, 1.0),
			node("c", 0.0, 300.0, 1.0),
		];
		let l = [
			Link { source: 0, target: 1 },
			Link { source: 0, target: 2 },
			Link { source: 0, target: 3 },
		];
		links(&mut nodes, &l, 100.0, 1.0, 1.0);
		assert!(nodes[1].vx.abs() > nodes[0].vx.abs());
	}

	#[test]
	fn collision_only_touches_overlapping_pairs() {
		let mut nodes = vec![node("a", 0.0, 0.0, 30.0), node("b", 100.0, 0.0, 30.0)];
		collision(&mut nodes, 1.0);
		assert_eq!(nodes[0].velocity(), (0.0, 0.0));

		let mut nodes = vec![node("a", 0.0, 0.0, 30.0), node("b", 40.0, 0.0, 30.0)];
		collision(&mut nodes, 1.0);
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
		// equal radii split the correction evenly and fully resolve it
		let gap = (40.0 + nodes[1].vx) - nodes[0].vx;
		assert!((gap - 60.0).abs() < 1e-9);
	}

	#[test]
	fn jiggle_is_tiny_and_nonzero() {
		for seed in 0..100 {
			let j = jiggle(seed);
			assert!(j != 0.0);
			assert!(j.abs() <= 1e-6);
		}
	}
}
