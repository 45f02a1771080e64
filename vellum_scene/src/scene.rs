// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene arena: node storage, containment structure, z-order, bounds,
//! hit testing, and painting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kurbo::{Affine, Point, Rect, Size, Vec2};
use parking_lot::{Mutex, RwLock};
use peniko::Color;
use tracing::{debug, trace, warn};

use crate::error::{Result, SceneError};
use crate::font::{ApproximateMetrics, FontMetrics, ImageResolver, NoImages};
use crate::node::{NodeState, Slot};
use crate::shape::ShapeCx;
use crate::surface::{StateOp, Surface};
use crate::types::{Hit, LocalNode, NodeFlags, NodeId, SceneOptions, ZOrder};

/// Callback invoked whenever the scene requests a repaint.
pub type RepaintNotifier = Arc<dyn Fn() + Send + Sync>;

/// Generational slot storage.
#[derive(Default)]
struct Slab {
    slots: Vec<Option<Arc<Slot>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl Slab {
    fn get(&self, id: NodeId) -> Option<Arc<Slot>> {
        if self.generations.get(id.idx()) != Some(&id.generation()) {
            return None;
        }
        self.slots.get(id.idx())?.clone()
    }

    fn insert(&mut self, slot: Slot) -> NodeId {
        let slot = Arc::new(slot);
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] = self.generations[idx].wrapping_add(1).max(1);
            self.slots[idx] = Some(slot);
            idx
        } else {
            self.slots.push(Some(slot));
            self.generations.push(1);
            self.slots.len() - 1
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        NodeId::new(idx as u32, self.generations[idx])
    }

    fn free(&mut self, id: NodeId) -> Option<Arc<Slot>> {
        self.get(id)?;
        let slot = self.slots[id.idx()].take();
        self.free_list.push(id.idx());
        slot
    }

    fn live(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }
}

/// A retained scene: an arena of nodes linked into container trees.
///
/// Every operation takes `&self`. Node state sits behind a per-node lock and
/// each container's child list behind its own lock, so a render pass over one
/// container does not block structural edits to a sibling container.
/// Structural edits (add, remove, destroy) are serialized among themselves so
/// that the cycle check and the relink happen as one step.
///
/// Points passed to [`Scene::contains`] are in the node's parent space. Points
/// passed to [`Scene::element_at`] and [`Scene::hit_path`] are in the
/// container's own local space, the space its children are positioned in.
pub struct Scene {
    slab: RwLock<Slab>,
    options: SceneOptions,
    metrics: Arc<dyn FontMetrics>,
    images: Arc<dyn ImageResolver>,
    repaint: AtomicBool,
    notifier: RwLock<Option<RepaintNotifier>>,
    // Taken before any child-list lock; traversals never take it.
    structure: Mutex<()>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let slab = self.slab.read();
        f.debug_struct("Scene")
            .field("live", &slab.live())
            .field("free_list", &slab.free_list.len())
            .field("options", &self.options)
            .field("repaint", &self.repaint.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with default options, approximate font metrics,
    /// and no image store.
    pub fn new() -> Self {
        Self::with_options(SceneOptions::default())
    }

    /// Create an empty scene with the given options.
    pub fn with_options(options: SceneOptions) -> Self {
        Self {
            slab: RwLock::new(Slab::default()),
            options,
            metrics: Arc::new(ApproximateMetrics::default()),
            images: Arc::new(NoImages),
            repaint: AtomicBool::new(false),
            notifier: RwLock::new(None),
            structure: Mutex::new(()),
        }
    }

    /// Use `metrics` for label geometry.
    #[must_use]
    pub fn with_font_metrics(mut self, metrics: Arc<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Use `images` to resolve the natural size of image nodes.
    #[must_use]
    pub fn with_image_resolver(mut self, images: Arc<dyn ImageResolver>) -> Self {
        self.images = images;
        self
    }

    /// Scene-wide options.
    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.slab.read().live()
    }

    // --- lifecycle ---

    /// Insert a new, unowned node.
    pub fn insert(&self, local: LocalNode) -> NodeId {
        let kind = local.shape.kind();
        let id = self.slab.write().insert(Slot::new(local));
        debug!(?id, kind, "inserted node");
        id
    }

    /// Insert a new node and add it to `container` in one step.
    pub fn insert_into(&self, container: NodeId, local: LocalNode) -> Result<NodeId> {
        let id = self.insert(local);
        if let Err(err) = self.add(container, id) {
            self.free_subtree(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slab.read().get(id).is_some()
    }

    /// Detach `id` from its container and free it together with its subtree.
    ///
    /// Every outstanding identifier for the freed nodes becomes stale.
    pub fn destroy(&self, id: NodeId) -> Result<()> {
        let structure = self.structure.lock();
        let slot = self.slot(id)?;
        let parent = slot.state.lock().parent;
        if let Some(parent) = parent {
            let parent_slot = self.slot(parent)?;
            self.check_editable(&parent_slot, parent, "destroy")?;
            self.child_list(&parent_slot, parent)?
                .lock()
                .retain(|c| *c != id);
        }
        self.free_subtree(id);
        drop(structure);
        debug!(?id, "destroyed node");
        self.request_repaint();
        Ok(())
    }

    fn free_subtree(&self, id: NodeId) {
        let Some(slot) = self.slab.write().free(id) else {
            return;
        };
        if let Some(list) = &slot.children {
            let children = core::mem::take(&mut *list.lock());
            for child in children {
                self.free_subtree(child);
            }
        }
    }

    /// Copy `id` into a new, unowned node.
    ///
    /// Containers are copied deeply: every descendant gets a fresh copy, so
    /// editing the copy never touches the original.
    pub fn duplicate(&self, id: NodeId) -> Result<NodeId> {
        let slot = self.slot(id)?;
        let state = slot.state.lock().detached_copy();
        let children = slot.children.as_ref().map(|list| list.lock().clone());
        let copy = self.slab.write().insert(Slot::from_state(state));
        if let Some(children) = children {
            let copy_slot = self.slot(copy)?;
            for child in children {
                let child_copy = self.duplicate(child)?;
                self.child_list(&copy_slot, copy)?.lock().push(child_copy);
                self.slot(child_copy)?.state.lock().parent = Some(copy);
            }
        }
        debug!(original = ?id, ?copy, "duplicated node");
        Ok(copy)
    }

    // --- structure ---

    /// Add `node` to the front of `container`.
    ///
    /// A node owned by another container is moved. A node already in
    /// `container` is moved to the front. Adding a container to itself or to
    /// one of its descendants fails with [`SceneError::StructuralConsistency`].
    pub fn add(&self, container: NodeId, node: NodeId) -> Result<()> {
        self.attach(container, node, None)
    }

    /// Add `node` to `container` and position it at `(x, y)`.
    pub fn add_at(&self, container: NodeId, node: NodeId, x: f64, y: f64) -> Result<()> {
        self.attach(container, node, Some(Point::new(x, y)))
    }

    fn attach(&self, container: NodeId, node: NodeId, position: Option<Point>) -> Result<()> {
        let structure = self.structure.lock();
        let container_slot = self.slot(container)?;
        let node_slot = self.slot(node)?;
        self.check_editable(&container_slot, container, "add")?;
        if self.is_ancestor_or_self(node, container) {
            warn!(?container, ?node, "rejected add: containment cycle");
            return Err(SceneError::StructuralConsistency { container, node });
        }
        let old_parent = node_slot.state.lock().parent;
        if let Some(old) = old_parent.filter(|p| *p != container) {
            let old_slot = self.slot(old)?;
            self.check_editable(&old_slot, old, "remove")?;
            self.child_list(&old_slot, old)?
                .lock()
                .retain(|c| *c != node);
        }
        {
            let mut list = self.child_list(&container_slot, container)?.lock();
            list.retain(|c| *c != node);
            list.push(node);
            let mut state = node_slot.state.lock();
            state.parent = Some(container);
            if let Some(p) = position {
                state.position = p;
            }
        }
        drop(structure);
        debug!(?container, ?node, "added node");
        self.request_repaint();
        Ok(())
    }

    /// Remove `node` from `container`. Returns `false` if it was not a child.
    pub fn remove(&self, container: NodeId, node: NodeId) -> Result<bool> {
        let structure = self.structure.lock();
        let slot = self.slot(container)?;
        self.check_editable(&slot, container, "remove")?;
        let removed = {
            let mut list = self.child_list(&slot, container)?.lock();
            let before = list.len();
            list.retain(|c| *c != node);
            list.len() != before
        };
        if removed {
            let child = self.slab.read().get(node);
            if let Some(child) = child {
                child.state.lock().parent = None;
            }
            drop(structure);
            debug!(?container, ?node, "removed node");
            self.request_repaint();
        }
        Ok(removed)
    }

    /// Remove every child of `container`.
    pub fn remove_all(&self, container: NodeId) -> Result<()> {
        let structure = self.structure.lock();
        let slot = self.slot(container)?;
        self.check_editable(&slot, container, "remove_all")?;
        let children = core::mem::take(&mut *self.child_list(&slot, container)?.lock());
        for child in &children {
            let child = self.slab.read().get(*child);
            if let Some(child) = child {
                child.state.lock().parent = None;
            }
        }
        drop(structure);
        debug!(?container, count = children.len(), "removed all children");
        self.request_repaint();
        Ok(())
    }

    /// Mark `container` complete. Adding or removing children fails afterwards.
    pub fn seal(&self, container: NodeId) -> Result<()> {
        let slot = self.slot(container)?;
        self.child_list(&slot, container)?;
        slot.state.lock().flags |= NodeFlags::SEALED;
        debug!(?container, "sealed container");
        Ok(())
    }

    /// Whether `container` has been sealed.
    pub fn is_sealed(&self, container: NodeId) -> Result<bool> {
        self.read(container, |s| s.flags.contains(NodeFlags::SEALED))
    }

    /// The container currently holding `id`, if any.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.read(id, |s| s.parent)
    }

    /// Snapshot of the children of `container`, back to front.
    pub fn children(&self, container: NodeId) -> Result<Vec<NodeId>> {
        let slot = self.slot(container)?;
        Ok(self.child_list(&slot, container)?.lock().clone())
    }

    /// Number of children in `container`.
    pub fn element_count(&self, container: NodeId) -> Result<usize> {
        let slot = self.slot(container)?;
        Ok(self.child_list(&slot, container)?.lock().len())
    }

    /// Child at `index` (0 is farthest back).
    pub fn element(&self, container: NodeId, index: usize) -> Result<Option<NodeId>> {
        let slot = self.slot(container)?;
        Ok(self.child_list(&slot, container)?.lock().get(index).copied())
    }

    /// Identifiers from the outermost ancestor down to `id` (inclusive).
    pub fn path_to_root(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.read(n, |s| s.parent)?;
        }
        out.reverse();
        Ok(out)
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == candidate {
                return true;
            }
            match self.read(id, |s| s.parent).ok().flatten() {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    // --- z-order ---

    /// Move `id` within its container. Returns `true` if the order changed.
    ///
    /// Unowned nodes and requests that are already satisfied are no-ops.
    pub fn reorder(&self, id: NodeId, order: ZOrder) -> Result<bool> {
        let Some(parent) = self.parent(id)? else {
            trace!(?id, ?order, "reorder of unowned node ignored");
            return Ok(false);
        };
        let parent_slot = self.slot(parent)?;
        let moved = {
            let mut list = self.child_list(&parent_slot, parent)?.lock();
            let Some(i) = list.iter().position(|c| *c == id) else {
                return Ok(false);
            };
            let last = list.len() - 1;
            match order {
                ZOrder::Front if i < last => {
                    let n = list.remove(i);
                    list.push(n);
                    true
                }
                ZOrder::Back if i > 0 => {
                    let n = list.remove(i);
                    list.insert(0, n);
                    true
                }
                ZOrder::Forward if i < last => {
                    list.swap(i, i + 1);
                    true
                }
                ZOrder::Backward if i > 0 => {
                    list.swap(i, i - 1);
                    true
                }
                _ => false,
            }
        };
        if moved {
            debug!(?id, ?order, "reordered node");
            self.request_repaint();
        }
        Ok(moved)
    }

    /// Paint `id` above all of its siblings.
    pub fn send_to_front(&self, id: NodeId) -> Result<()> {
        self.reorder(id, ZOrder::Front).map(drop)
    }

    /// Paint `id` below all of its siblings.
    pub fn send_to_back(&self, id: NodeId) -> Result<()> {
        self.reorder(id, ZOrder::Back).map(drop)
    }

    /// Swap `id` with the sibling painted just above it.
    pub fn send_forward(&self, id: NodeId) -> Result<()> {
        self.reorder(id, ZOrder::Forward).map(drop)
    }

    /// Swap `id` with the sibling painted just below it.
    pub fn send_backward(&self, id: NodeId) -> Result<()> {
        self.reorder(id, ZOrder::Backward).map(drop)
    }

    // --- geometry queries ---

    /// Bounding box of `id` in its parent's space.
    ///
    /// Containers report the union of their children; an empty container
    /// reports a zero-size box at its position.
    pub fn bounds(&self, id: NodeId) -> Result<Rect> {
        let slot = self.slot(id)?;
        let position = slot.state.lock().position;
        Ok(self
            .bounds_under(&slot, Affine::IDENTITY)
            .unwrap_or_else(|| Rect::from_origin_size(position, Size::ZERO)))
    }

    fn bounds_under(&self, slot: &Slot, ctm: Affine) -> Option<Rect> {
        let mut state = slot.state.lock();
        let full = ctm * state.full_transform();
        match &slot.children {
            None => {
                let filled = state.is_filled();
                state.shape.local_bounds(full, filled, &self.cx())
            }
            Some(list) => {
                drop(state);
                let list = list.lock();
                list.iter()
                    .filter_map(|c| self.slab.read().get(*c))
                    .filter_map(|child| self.bounds_under(&child, full))
                    .reduce(|a, b| a.union(b))
            }
        }
    }

    /// Whether `id` covers `point`, given in its parent's space.
    ///
    /// Invisible nodes, stale identifiers, and nodes whose transform cannot be
    /// inverted contain nothing. A container contains a point when any of its
    /// children does.
    pub fn contains(&self, id: NodeId, point: Point) -> bool {
        let slot = self.slab.read().get(id);
        slot.is_some_and(|slot| self.probe(id, &slot, point).is_some())
    }

    /// Containment test that also returns the point in `id`'s local space.
    fn probe(&self, id: NodeId, slot: &Slot, point: Point) -> Option<Point> {
        let mut state = slot.state.lock();
        if !state.is_visible() {
            return None;
        }
        let local = match state.to_local(point) {
            Ok(local) => local,
            Err(err) => {
                trace!(?id, %err, "point not contained");
                return None;
            }
        };
        let hit = match &slot.children {
            None => {
                let (filled, line_width) = (state.is_filled(), state.line_width);
                state
                    .shape
                    .local_contains(local, filled, line_width, &self.cx())
            }
            Some(list) => {
                drop(state);
                list.lock().iter().rev().any(|c| self.contains(*c, local))
            }
        };
        hit.then_some(local)
    }

    /// Front-most visible child of `container` covering `point`.
    pub fn element_at(&self, container: NodeId, point: Point) -> Result<Option<NodeId>> {
        let slot = self.slot(container)?;
        let list = self.child_list(&slot, container)?.lock();
        Ok(list.iter().rev().copied().find(|c| self.contains(*c, point)))
    }

    /// Resolve the chain of nodes under `point`, descending through nested
    /// containers to the front-most leaf.
    ///
    /// Returns `None` when no child of `container` covers the point.
    pub fn hit_path(&self, container: NodeId, point: Point) -> Result<Option<Hit>> {
        let mut owner = self.slot(container)?;
        self.child_list(&owner, container)?;
        let mut path = vec![container];
        let mut local = vec![point];
        let mut point = point;
        while let Some(list) = owner.children.as_ref() {
            let found = list.lock().iter().rev().find_map(|c| {
                let child = self.slab.read().get(*c)?;
                let p = self.probe(*c, &child, point)?;
                Some((*c, child, p))
            });
            let Some((id, child, p)) = found else {
                break;
            };
            path.push(id);
            local.push(p);
            point = p;
            owner = child;
        }
        if path.len() == 1 {
            return Ok(None);
        }
        let node = path[path.len() - 1];
        Ok(Some(Hit { node, path, local }))
    }

    /// Map a point from `id`'s local space to the space its outermost
    /// ancestor is positioned in, by adding the positions along the parent
    /// chain. Own transforms are not applied.
    pub fn to_container_space(&self, id: NodeId, point: Point) -> Result<Point> {
        Ok(point + self.accumulated_offset(id)?)
    }

    /// Inverse of [`Scene::to_container_space`].
    pub fn to_local_space(&self, id: NodeId, point: Point) -> Result<Point> {
        Ok(point - self.accumulated_offset(id)?)
    }

    /// Map `point`, given in `ancestor`'s local space, into `id`'s local space
    /// through every position and transform on the way down.
    ///
    /// Unlike [`Scene::to_local_space`] this honors transforms, so it agrees
    /// with the local points reported by [`Scene::hit_path`].
    pub fn map_point_down(&self, ancestor: NodeId, id: NodeId, point: Point) -> Result<Point> {
        let path = self.path_to_root(id)?;
        let Some(start) = path.iter().position(|n| *n == ancestor) else {
            return Err(SceneError::InvalidOperation {
                op: "map_point_down",
                reason: "not an ancestor",
            });
        };
        path[start + 1..]
            .iter()
            .try_fold(point, |p, n| self.read(*n, |s| s.to_local(p))?)
    }

    fn accumulated_offset(&self, id: NodeId) -> Result<Vec2> {
        let mut offset = Vec2::ZERO;
        let mut cur = Some(id);
        while let Some(n) = cur {
            let (position, parent) = self.read(n, |s| (s.position, s.parent))?;
            offset += position.to_vec2();
            cur = parent;
        }
        Ok(offset)
    }

    // --- paint ---

    /// Paint `id` and, for containers, its visible descendants back to front.
    ///
    /// Each node is painted inside a save/restore pair under
    /// `translate(position) · transform`, with its resolved color and line width.
    pub fn paint(&self, id: NodeId, surface: &mut dyn Surface) -> Result<()> {
        let slot = self.slot(id)?;
        let parent = slot.state.lock().parent;
        let inherited = match parent {
            Some(parent) => self.color(parent)?,
            None => self.options.default_color,
        };
        self.paint_slot(&slot, surface, inherited);
        Ok(())
    }

    fn paint_slot(&self, slot: &Slot, surface: &mut dyn Surface, inherited: Color) {
        let mut state = slot.state.lock();
        if !state.is_visible() {
            return;
        }
        let stroke = state.color.unwrap_or(inherited);
        let fill = state
            .is_filled()
            .then(|| state.fill_color.unwrap_or(stroke));
        surface.state(StateOp::Save);
        surface.state(StateOp::Transform(state.full_transform()));
        surface.state(StateOp::SetColor(stroke));
        surface.state(StateOp::SetStrokeWidth(state.line_width));
        match &slot.children {
            None => {
                state.shape.paint(surface, stroke, fill, &self.cx());
                drop(state);
            }
            Some(list) => {
                drop(state);
                for child in list.lock().iter() {
                    let child = self.slab.read().get(*child);
                    if let Some(child) = child {
                        self.paint_slot(&child, surface, stroke);
                    }
                }
            }
        }
        surface.state(StateOp::Restore);
    }

    // --- repaint signalling ---

    /// Raise the "redraw needed" flag and notify the registered callback.
    pub fn request_repaint(&self) {
        self.repaint.store(true, Ordering::Release);
        trace!("repaint requested");
        let notifier = self.notifier.read().clone();
        if let Some(notify) = notifier {
            notify();
        }
    }

    /// Clear and return the "redraw needed" flag.
    pub fn take_repaint_request(&self) -> bool {
        self.repaint.swap(false, Ordering::AcqRel)
    }

    /// Install or clear the callback run on every repaint request.
    pub fn set_repaint_notifier(&self, notifier: Option<RepaintNotifier>) {
        *self.notifier.write() = notifier;
    }

    // --- internals ---

    pub(crate) fn slot(&self, id: NodeId) -> Result<Arc<Slot>> {
        self.slab.read().get(id).ok_or(SceneError::StaleNode(id))
    }

    fn child_list<'a>(&self, slot: &'a Slot, id: NodeId) -> Result<&'a Mutex<Vec<NodeId>>> {
        slot.children
            .as_ref()
            .ok_or(SceneError::NotAContainer(id))
    }

    fn check_editable(&self, slot: &Slot, id: NodeId, op: &'static str) -> Result<()> {
        self.child_list(slot, id)?;
        if slot.state.lock().flags.contains(NodeFlags::SEALED) {
            warn!(container = ?id, op, "rejected edit of sealed container");
            return Err(SceneError::InvalidOperation {
                op,
                reason: "container is sealed",
            });
        }
        Ok(())
    }

    pub(crate) fn cx(&self) -> ShapeCx<'_> {
        ShapeCx {
            metrics: &*self.metrics,
            images: &*self.images,
            default_font: &self.options.default_font,
            tolerance: self.options.tolerance,
        }
    }

    /// Run `f` against the state of `id`.
    pub(crate) fn read<R>(&self, id: NodeId, f: impl FnOnce(&mut NodeState) -> R) -> Result<R> {
        let slot = self.slot(id)?;
        let r = f(&mut slot.state.lock());
        Ok(r)
    }

    /// Run a mutation against the state of `id`, then request a repaint.
    pub(crate) fn update<R>(
        &self,
        id: NodeId,
        op: &'static str,
        f: impl FnOnce(&mut NodeState) -> Result<R>,
    ) -> Result<R> {
        let slot = self.slot(id)?;
        let r = f(&mut slot.state.lock());
        match &r {
            Ok(_) => self.request_repaint(),
            Err(err) => warn!(?id, op, %err, "rejected node update"),
        }
        r
    }
}
