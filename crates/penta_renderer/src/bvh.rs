//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over object bounding boxes. Nodes hold indices into the
//! scene's object arena, so the tree borrows nothing and is freely shared
//! between render threads once built.

use crate::accel::{nearest_hit, Accel, ObjectHit};
use crate::scene::Object;
use penta_math::{Aabb, Interval, Ray};

/// Maximum objects per leaf node before splitting.
pub const LEAF_MAX_SIZE: usize = 3;

/// BVH node - either a branch with two children or a leaf with object indices.
#[derive(Debug)]
enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of objects.
    Leaf { objects: Vec<usize>, bbox: Aabb },
    /// Built over no objects.
    Empty,
}

/// An object index with its cached bounds.
#[derive(Debug, Clone, Copy)]
struct BuildItem {
    index: usize,
    bounds: Aabb,
    center: [f32; 4],
}

#[derive(Debug, Default)]
struct BuildStats {
    nodes: usize,
    depth: usize,
    median_fallbacks: usize,
}

#[derive(Debug)]
pub struct BvhAccel {
    root: BvhNode,
    node_count: usize,
    depth: usize,
}

impl BvhAccel {
    pub fn build(objects: &[Object]) -> Self {
        let items: Vec<BuildItem> = objects
            .iter()
            .enumerate()
            .map(|(index, object)| {
                let bounds = object.geometry.bounds();
                BuildItem {
                    index,
                    bounds,
                    center: bounds.center().to_array(),
                }
            })
            .collect();

        let mut stats = BuildStats::default();
        let root = if items.is_empty() {
            BvhNode::Empty
        } else {
            Self::build_node(items, 1, &mut stats)
        };

        log::debug!(
            "BVH over {} objects: {} nodes, depth {}, {} median splits",
            objects.len(),
            stats.nodes,
            stats.depth,
            stats.median_fallbacks
        );

        Self {
            root,
            node_count: stats.nodes,
            depth: stats.depth,
        }
    }

    /// Number of branch and leaf nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Length of the longest root-to-leaf path, counting both ends.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Recursive construction.
    ///
    /// Splits at the midpoint of the node box's longest axis. When every
    /// center falls on one side, sorts along that axis and splits at the
    /// median index instead, so both halves are non-empty.
    fn build_node(mut items: Vec<BuildItem>, depth: usize, stats: &mut BuildStats) -> BvhNode {
        stats.nodes += 1;
        stats.depth = stats.depth.max(depth);

        let bbox = items
            .iter()
            .fold(Aabb::EMPTY, |acc, item| Aabb::surrounding(&acc, &item.bounds));

        if items.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects: items.iter().map(|item| item.index).collect(),
                bbox,
            };
        }

        let axis = bbox.longest_axis();
        let midpoint = bbox.center()[axis];
        let goes_left = |item: &BuildItem| item.center[axis] < midpoint;

        let left_count = items.iter().filter(|item| goes_left(*item)).count();
        let (left_items, right_items) = if left_count == 0 || left_count == items.len() {
            stats.median_fallbacks += 1;
            log::trace!("median split of {} objects on axis {axis}", items.len());
            items.sort_unstable_by(|a, b| a.center[axis].total_cmp(&b.center[axis]));
            let right = items.split_off(items.len() / 2);
            (items, right)
        } else {
            items.into_iter().partition(goes_left)
        };

        let left = Self::build_node(left_items, depth + 1, stats);
        let right = Self::build_node(right_items, depth + 1, stats);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    fn intersect_node(node: &BvhNode, objects: &[Object], ray: &Ray) -> Option<ObjectHit> {
        match node {
            BvhNode::Empty => None,

            BvhNode::Leaf { objects: indices, bbox } => {
                if !bbox.hit(ray, Interval::POSITIVE) {
                    return None;
                }
                nearest_hit(objects, indices.iter().copied(), ray)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, Interval::POSITIVE) {
                    return None;
                }
                let hit_left = Self::intersect_node(left, objects, ray);
                let hit_right = Self::intersect_node(right, objects, ray);
                match (hit_left, hit_right) {
                    (Some(l), Some(r)) => Some(if r.t < l.t { r } else { l }),
                    (l, r) => l.or(r),
                }
            }
        }
    }
}

impl Accel for BvhAccel {
    fn intersect(&self, objects: &[Object], ray: &Ray) -> Option<ObjectHit> {
        Self::intersect_node(&self.root, objects, ray)
    }
}
