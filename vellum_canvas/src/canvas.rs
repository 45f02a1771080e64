// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use kurbo::{Point, Rect, Size};
use tracing::{debug, trace, warn};
use vellum_responder::adapters::scene::{hit_for_node, top_hit_for_point};
use vellum_responder::pointer::{NodeEvent, PointerRouter, deliver};
use vellum_responder::types::{Outcome, PointerEvent};
use vellum_scene::{
    DrawOp, LocalNode, NodeId, RepaintNotifier, Result, Scene, Shape, StateOp, Surface,
};

use crate::options::{CanvasOptions, RepaintPolicy};

/// A scene bound to a host surface.
///
/// The canvas owns a [`Scene`] and the root container every visible node hangs
/// from. Host pointer coordinates are the root container's local space.
pub struct Canvas {
    scene: Arc<Scene>,
    root: NodeId,
    options: CanvasOptions,
    pointer: PointerRouter<NodeId>,
    on_repaint: Option<RepaintNotifier>,
}

impl core::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("scene", &self.scene)
            .field("root", &self.root)
            .field("options", &self.options)
            .field("pointer", &self.pointer)
            .field("on_repaint", &self.on_repaint.is_some())
            .finish()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasOptions::default())
    }
}

impl Canvas {
    /// Create a canvas with a fresh scene built from `options.scene`.
    pub fn new(options: CanvasOptions) -> Self {
        let scene = Scene::with_options(options.scene.clone());
        Self::from_scene(scene, options)
    }

    /// Bind an existing scene, for example one with custom font metrics.
    ///
    /// `options.scene` is ignored; the scene keeps its own options.
    pub fn from_scene(scene: Scene, options: CanvasOptions) -> Self {
        let root = scene.insert(LocalNode::new(Shape::container()));
        debug!(?root, size = ?options.size, policy = ?options.repaint, "canvas created");
        Self {
            scene: Arc::new(scene),
            root,
            options,
            pointer: PointerRouter::new(),
            on_repaint: None,
        }
    }

    /// The owned scene. Clone the `Arc` to edit it from another thread.
    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    /// The root container.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Current options.
    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    // --- root container ---

    /// Create a node directly on the canvas, in front of everything else.
    pub fn insert(&self, local: LocalNode) -> Result<NodeId> {
        self.scene.insert_into(self.root, local)
    }

    /// Add `node` in front of everything else.
    pub fn add(&self, node: NodeId) -> Result<()> {
        self.scene.add(self.root, node)
    }

    /// Add `node` in front of everything else, positioned at `(x, y)`.
    pub fn add_at(&self, node: NodeId, x: f64, y: f64) -> Result<()> {
        self.scene.add_at(self.root, node, x, y)
    }

    /// Take `node` off the canvas. Returns `false` if it was not on it.
    pub fn remove(&self, node: NodeId) -> Result<bool> {
        self.scene.remove(self.root, node)
    }

    /// Take every node off the canvas.
    pub fn remove_all(&self) -> Result<()> {
        self.scene.remove_all(self.root)
    }

    /// Front-most top-level node under `point`.
    pub fn element_at(&self, point: Point) -> Result<Option<NodeId>> {
        self.scene.element_at(self.root, point)
    }

    /// Top-level nodes, back to front.
    pub fn elements(&self) -> Result<Vec<NodeId>> {
        self.scene.children(self.root)
    }

    // --- size and paint ---

    /// Canvas size in host-surface units.
    pub fn size(&self) -> Size {
        self.options.size
    }

    /// Track a host resize. The whole canvas needs repainting afterwards.
    pub fn resize(&mut self, size: Size) {
        if size != self.options.size {
            debug!(?size, "canvas resized");
            self.options.size = size;
            self.scene.request_repaint();
        }
    }

    /// Change the background color.
    pub fn set_background(&mut self, color: peniko::Color) {
        self.options.background = color;
        self.scene.request_repaint();
    }

    /// Clear to the background color, then paint the whole scene.
    ///
    /// Consumes any pending repaint request.
    pub fn paint(&self, surface: &mut dyn Surface) -> Result<()> {
        let _ = self.scene.take_repaint_request();
        surface.state(StateOp::Save);
        surface.state(StateOp::SetColor(self.options.background));
        surface.draw(DrawOp::FillRect(Rect::from_origin_size(
            Point::ORIGIN,
            self.options.size,
        )));
        surface.state(StateOp::Restore);
        self.scene.paint(self.root, surface)
    }

    // --- repaint policy ---

    /// Register the host's repaint callback.
    pub fn on_repaint(&mut self, callback: impl Fn() + Send + Sync + 'static) {
        self.on_repaint = Some(Arc::new(callback));
        self.install_notifier();
    }

    /// Switch repaint policy.
    pub fn set_repaint_policy(&mut self, policy: RepaintPolicy) {
        debug!(?policy, "repaint policy changed");
        self.options.repaint = policy;
        self.install_notifier();
    }

    /// Clear and return the scene's "redraw needed" flag.
    pub fn take_repaint_request(&self) -> bool {
        self.scene.take_repaint_request()
    }

    /// Per-frame hook for [`RepaintPolicy::Coalesced`]: run the repaint
    /// callback once if anything changed since the last flush or paint.
    ///
    /// Returns `true` if a repaint was requested. Under
    /// [`RepaintPolicy::Immediate`] the callback already ran, so this only
    /// reports and clears the flag.
    pub fn flush(&self) -> bool {
        let pending = self.scene.take_repaint_request();
        if pending && self.options.repaint == RepaintPolicy::Coalesced {
            trace!("coalesced repaint");
            if let Some(notify) = &self.on_repaint {
                notify();
            }
        }
        pending
    }

    fn install_notifier(&self) {
        let notifier = match self.options.repaint {
            RepaintPolicy::Immediate => self.on_repaint.clone(),
            RepaintPolicy::Coalesced => None,
        };
        self.scene.set_repaint_notifier(notifier);
    }

    // --- pointer ---

    /// Route one host pointer event and return the node events it produced,
    /// in delivery order.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Vec<NodeEvent<NodeId>> {
        let mut hits = Vec::with_capacity(1);
        match top_hit_for_point(&self.scene, self.root, event.position) {
            Ok(Some(hit)) => hits.push(hit),
            Ok(None) => {}
            Err(err) => warn!(%err, "pointer hit test failed"),
        }
        let mut captured_hit = None;
        if let Some(captured) = self.pointer.captured() {
            if !self.scene.is_alive(captured) {
                debug!(?captured, "captured node is gone; dropping press");
                self.pointer.cancel_press();
            } else {
                match hit_for_node(&self.scene, self.root, captured, event.position) {
                    Ok(hit) => captured_hit = Some(hit),
                    Err(err) => trace!(?captured, %err, "no local point for captured node"),
                }
            }
        }
        self.pointer.handle_with_captured(event, &hits, captured_hit)
    }

    /// Route one host pointer event straight into `handler`.
    ///
    /// Returns `true` if a handler consumed the event.
    pub fn dispatch_pointer(
        &mut self,
        event: &PointerEvent,
        handler: impl FnMut(&NodeEvent<NodeId>) -> Outcome,
    ) -> bool {
        let events = self.handle_pointer(event);
        deliver(&events, handler)
    }

    /// The hovered root→leaf path.
    pub fn hovered(&self) -> &[NodeId] {
        self.pointer.hovered()
    }

    /// The node captured by the active press, if any.
    pub fn captured(&self) -> Option<NodeId> {
        self.pointer.captured()
    }
}
