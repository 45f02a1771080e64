// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Vellum Scene.
//!
//! ## Feature
//!
//! Enable with `scene_adapter`.
//!
//! ## Notes
//!
//! These helpers turn scene hit tests into responder hits. Paths start at the
//! queried root container and carry per-node local points, so the router never
//! needs to walk parents for them. [`SceneParents`] covers the remaining case
//! of a captured node with no fresh hit.

use kurbo::Point;
use vellum_scene::{NodeId, Result, Scene};

use crate::types::{Localizer, ParentLookup, ResolvedHit};

/// Parent lookup backed by a scene. Stale identifiers have no parent.
#[derive(Copy, Clone, Debug)]
pub struct SceneParents<'a>(pub &'a Scene);

impl ParentLookup<NodeId> for SceneParents<'_> {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.0.parent(*node).ok().flatten()
    }
}

/// Build the hit for the front-most leaf under `pt`, given in `root`'s local
/// space.
///
/// Returns `Ok(None)` when nothing under `root` covers the point.
pub fn top_hit_for_point(
    scene: &Scene,
    root: NodeId,
    pt: Point,
) -> Result<Option<ResolvedHit<NodeId>>> {
    Ok(scene.hit_path(root, pt)?.map(|hit| ResolvedHit {
        node: hit.node,
        path: Some(hit.path),
        localizer: Localizer::new(hit.local),
    }))
}

/// Build a hit for `node` regardless of whether it covers `pt`.
///
/// Used to keep feeding a captured node its local coordinates while the
/// pointer wanders off it. The path runs from `root` down to `node`.
pub fn hit_for_node(
    scene: &Scene,
    root: NodeId,
    node: NodeId,
    pt: Point,
) -> Result<ResolvedHit<NodeId>> {
    let full = scene.path_to_root(node)?;
    let start = full.iter().position(|n| *n == root).unwrap_or(0);
    let path = full[start..].to_vec();
    let points = path
        .iter()
        .map(|n| scene.map_point_down(root, *n, pt))
        .collect::<Result<Vec<_>>>()?;
    Ok(ResolvedHit {
        node,
        path: Some(path),
        localizer: Localizer::new(points),
    })
}

#[cfg(test)]
mod tests {
    use vellum_scene::{LocalNode, Shape};

    use super::*;

    #[test]
    fn top_hit_carries_path_and_locals() {
        let scene = Scene::new();
        let root = scene.insert(LocalNode::new(Shape::container()));
        let group = scene
            .insert_into(root, LocalNode::new(Shape::container()).at(10.0, 10.0))
            .unwrap();
        let leaf = scene
            .insert_into(group, LocalNode::new(Shape::rect(5.0, 5.0)))
            .unwrap();

        let hit = top_hit_for_point(&scene, root, Point::new(12.0, 13.0))
            .unwrap()
            .unwrap();
        assert_eq!(hit.node, leaf);
        assert_eq!(hit.path, Some(vec![root, group, leaf]));
        assert_eq!(hit.localizer.at(2), Some(Point::new(2.0, 3.0)));
        assert!(
            top_hit_for_point(&scene, root, Point::new(0.0, 0.0))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn node_hit_follows_pointer_off_the_node() {
        let scene = Scene::new();
        let root = scene.insert(LocalNode::new(Shape::container()));
        let leaf = scene
            .insert_into(root, LocalNode::new(Shape::rect(5.0, 5.0)).at(10.0, 0.0))
            .unwrap();
        let hit = hit_for_node(&scene, root, leaf, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(hit.path, Some(vec![root, leaf]));
        assert_eq!(hit.localizer.at(0), Some(Point::new(50.0, 50.0)));
        assert_eq!(hit.localizer.at(1), Some(Point::new(40.0, 50.0)));
    }

    #[test]
    fn parents_come_from_the_scene() {
        let scene = Scene::new();
        let root = scene.insert(LocalNode::new(Shape::container()));
        let leaf = scene
            .insert_into(root, LocalNode::new(Shape::oval(1.0, 1.0)))
            .unwrap();
        let parents = SceneParents(&scene);
        assert_eq!(parents.parent_of(&leaf), Some(root));
        assert_eq!(parents.parent_of(&root), None);
        scene.destroy(leaf).unwrap();
        assert_eq!(parents.parent_of(&leaf), None);
    }
}
