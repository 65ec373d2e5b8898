//! Initial node placement.
//!
//! Without a hierarchy nodes start on a ring around the origin and the force
//! simulation spreads them out. With the hierarchical layout enabled, nodes are
//! assigned levels and laid out as a forest; positions are final.

use std::collections::VecDeque;
use std::f64::consts::PI;

use super::options::{Direction, HierarchicalOptions, SortMethod};

/// Evenly spaced positions on a circle of the given radius.
pub fn ring_layout(count: usize, radius: f64) -> Vec<(f64, f64)> {
	(0..count)
		.map(|i| {
			let angle = (i as f64) * 2.0 * PI / count as f64;
			(radius * angle.cos(), radius * angle.sin())
		})
		.collect()
}

/// Result of level assignment: per node its level, BFS parent and tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Levels {
	pub level: Vec<usize>,
	pub parent: Vec<Option<usize>>,
	/// Trees in discovery order, each listing its nodes in BFS order.
	pub trees: Vec<Vec<usize>>,
}

/// Assigns hierarchy levels to `count` nodes connected by `edges` (index pairs).
pub fn assign_levels(count: usize, edges: &[(usize, usize)], method: SortMethod) -> Levels {
	let mut outgoing = vec![Vec::new(); count];
	let mut undirected = vec![Vec::new(); count];
	let mut in_degree = vec![0usize; count];
	for &(from, to) in edges {
		outgoing[from].push(to);
		undirected[from].push(to);
		undirected[to].push(from);
		in_degree[to] += 1;
	}

	let (neighbors, order): (&[Vec<usize>], Vec<usize>) = match method {
		SortMethod::HubSize => {
			let mut order: Vec<usize> = (0..count).collect();
			// Stable sort keeps index order among equal hubs.
			order.sort_by(|&a, &b| undirected[b].len().cmp(&undirected[a].len()));
			(undirected.as_slice(), order)
		}
		SortMethod::Directed => {
			let (mut roots, rest): (Vec<usize>, Vec<usize>) =
				(0..count).partition(|&i| in_degree[i] == 0);
			// Cycles without a source still need a root.
			roots.extend(rest);
			(outgoing.as_slice(), roots)
		}
	};

	let mut level = vec![0; count];
	let mut parent = vec![None; count];
	let mut visited = vec![false; count];
	let mut trees = Vec::new();

	for root in order {
		if visited[root] {
			continue;
		}
		visited[root] = true;
		let mut tree = Vec::new();
		let mut queue = VecDeque::from([root]);
		while let Some(node) = queue.pop_front() {
			tree.push(node);
			for &next in &neighbors[node] {
				if !visited[next] {
					visited[next] = true;
					level[next] = level[node] + 1;
					parent[next] = Some(node);
					queue.push_back(next);
				}
			}
		}
		trees.push(tree);
	}

	Levels {
		level,
		parent,
		trees,
	}
}

/// Positions for a hierarchical layout, centered on the origin.
pub fn hierarchical_layout(
	count: usize,
	edges: &[(usize, usize)],
	options: &HierarchicalOptions,
) -> Vec<(f64, f64)> {
	let levels = assign_levels(count, edges, options.sort_method);
	// position on the spread axis, per node
	let mut along = vec![0.0; count];
	let mut offset = 0.0;

	for tree in &levels.trees {
		let depth = tree.iter().map(|&n| levels.level[n]).max().unwrap_or(0);
		let mut rows: Vec<Vec<usize>> = vec![Vec::new(); depth + 1];
		for &n in tree {
			rows[levels.level[n]].push(n);
		}

		for row in &rows {
			for (i, &n) in row.iter().enumerate() {
				along[n] = offset + i as f64 * options.node_spacing;
			}
		}

		if options.parent_centralization {
			for lvl in (0..depth).rev() {
				for &n in &rows[lvl] {
					let children: Vec<f64> = rows[lvl + 1]
						.iter()
						.filter(|&&c| levels.parent[c] == Some(n))
						.map(|&c| along[c])
						.collect();
					if !children.is_empty() {
						along[n] = children.iter().sum::<f64>() / children.len() as f64;
					}
				}
				separate_row(&rows[lvl], &mut along, options.node_spacing);
			}
		}

		let max = tree.iter().map(|&n| along[n]).fold(offset, f64::max);
		offset = max + options.tree_spacing;
	}

	let sep = options.level_separation;
	let mut positions: Vec<(f64, f64)> = (0..count)
		.map(|n| {
			let depth = levels.level[n] as f64 * sep;
			match options.direction {
				Direction::UpDown => (along[n], depth),
				Direction::DownUp => (along[n], -depth),
				Direction::LeftRight => (depth, along[n]),
				Direction::RightLeft => (-depth, along[n]),
			}
		})
		.collect();

	center(&mut positions);
	positions
}

/// Pushes nodes of a row apart, left to right, so neighbors keep `spacing`.
fn separate_row(row: &[usize], along: &mut [f64], spacing: f64) {
	let mut sorted = row.to_vec();
	sorted.sort_by(|&a, &b| along[a].total_cmp(&along[b]));
	for pair in sorted.windows(2) {
		let (left, right) = (pair[0], pair[1]);
		if along[right] - along[left] < spacing {
			along[right] = along[left] + spacing;
		}
	}
}

fn center(positions: &mut [(f64, f64)]) {
	if positions.is_empty() {
		return;
	}
	let (mut min_x, mut max_x, mut min_y, mut max_y) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
	for &(x, y) in positions.iter() {
		min_x = min_x.min(x);
		max_x = max_x.max(x);
		min_y = min_y.min(y);
		max_y = max_y.max(y);
	}
	let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
	for p in positions.iter_mut() {
		p.0 -= cx;
		p.1 -= cy;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn options(direction: Direction, sort_method: SortMethod) -> HierarchicalOptions {
		HierarchicalOptions {
			enabled: true,
			direction,
			sort_method,
			..HierarchicalOptions::default()
		}
	}

	#[test]
	fn test_ring_layout() {
		let ring = ring_layout(4, 10.0);
		assert_eq!(ring.len(), 4);
		assert!((ring[0].0 - 10.0).abs() < 1e-9);
		assert!((ring[1].1 - 10.0).abs() < 1e-9);
		assert!(ring_layout(0, 10.0).is_empty());
	}

	#[test]
	fn test_hubsize_roots_at_most_connected() {
		// star around node 2, plus a leaf hanging off node 0
		let edges = [(0, 2), (1, 2), (3, 2), (4, 0)];
		let levels = assign_levels(5, &edges, SortMethod::HubSize);

		assert_eq!(levels.level, vec![1, 1, 0, 1, 2]);
		assert_eq!(levels.parent[4], Some(0));
		assert_eq!(levels.trees.len(), 1);
		assert_eq!(levels.trees[0][0], 2);
	}

	#[test]
	fn test_directed_follows_edge_direction() {
		let edges = [(1, 0), (0, 2)];
		let levels = assign_levels(3, &edges, SortMethod::Directed);

		assert_eq!(levels.level, vec![1, 0, 2]);
	}

	#[test]
	fn test_directed_cycle_still_gets_a_root() {
		let edges = [(0, 1), (1, 0)];
		let levels = assign_levels(2, &edges, SortMethod::Directed);

		assert_eq!(levels.trees, vec![vec![0, 1]]);
		assert_eq!(levels.level, vec![0, 1]);
	}

	#[test]
	fn test_disconnected_nodes_form_separate_trees() {
		let levels = assign_levels(3, &[(0, 1)], SortMethod::HubSize);
		assert_eq!(levels.trees.len(), 2);
		assert_eq!(levels.level[2], 0);
	}

	#[test]
	fn test_up_down_levels_are_separated() {
		let opts = options(Direction::UpDown, SortMethod::Directed);
		let positions = hierarchical_layout(3, &[(0, 1), (0, 2)], &opts);

		assert_eq!(positions[1].1 - positions[0].1, opts.level_separation);
		assert_eq!(positions[1].1, positions[2].1);
		assert_eq!((positions[2].0 - positions[1].0).abs(), opts.node_spacing);
		// parent centered over its two children
		assert!((positions[0].0 - (positions[1].0 + positions[2].0) / 2.0).abs() < 1e-9);
	}

	#[test]
	fn test_left_right_swaps_axes() {
		let opts = options(Direction::LeftRight, SortMethod::Directed);
		let positions = hierarchical_layout(2, &[(0, 1)], &opts);

		assert_eq!(positions[1].0 - positions[0].0, opts.level_separation);
		assert_eq!(positions[0].1, positions[1].1);
	}

	#[test]
	fn test_trees_are_spaced_apart() {
		let opts = options(Direction::UpDown, SortMethod::HubSize);
		let positions = hierarchical_layout(2, &[], &opts);

		assert_eq!(positions[1].0 - positions[0].0, opts.tree_spacing);
	}

	#[test]
	fn test_empty_layout() {
		let opts = options(Direction::UpDown, SortMethod::HubSize);
		assert!(hierarchical_layout(0, &[], &opts).is_empty());
	}
}
