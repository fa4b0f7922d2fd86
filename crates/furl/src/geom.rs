//! Positions, sizes and compound-aware bounding boxes.
//!
//! A node's `position` is its center. Leaves, collapsed containers, placeholders and group
//! representatives are measured from their own position and size; an expanded container is the
//! union of its children's boxes grown by the compound padding.

use crate::model::{ElementGraph, NodeData};
use furl_graph::alg;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            min_x: center.x - size.width / 2.0,
            min_y: center.y - size.height / 2.0,
            max_x: center.x + size.width / 2.0,
            max_y: center.y + size.height / 2.0,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn size(&self) -> Size {
        Size::new(self.max_x - self.min_x, self.max_y - self.min_y)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn pad(&self, padding: f64) -> Rect {
        Rect {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }

    /// Strict overlap; boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// Bounding box of `id`, following live children of expanded containers.
///
/// Nesting is walked with an explicit stack. A child already on the stack (a parent cycle) is
/// skipped.
pub fn bounding_box(g: &ElementGraph, id: &str, padding: f64) -> Option<Rect> {
    let node = g.node(id)?;
    let Some(children) = expanded_children(g, id) else {
        return Some(own_rect(node));
    };

    let mut visiting: BTreeSet<&str> = BTreeSet::new();
    visiting.insert(id);
    let mut stack = vec![Frame {
        id,
        children,
        next: 0,
        acc: None,
    }];
    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = frame.children.get(frame.next) {
            frame.next += 1;
            let Some(data) = g.node(child) else {
                continue;
            };
            if visiting.contains(child) {
                continue;
            }
            match expanded_children(g, child) {
                Some(grand) => {
                    visiting.insert(child);
                    stack.push(Frame {
                        id: child,
                        children: grand,
                        next: 0,
                        acc: None,
                    });
                }
                None => frame.acc = union_opt(frame.acc, Some(own_rect(data))),
            }
            continue;
        }

        let done = stack.pop()?;
        visiting.remove(done.id);
        let rect = match done.acc {
            Some(r) => r.pad(padding),
            None => own_rect(g.node(done.id)?),
        };
        match stack.last_mut() {
            Some(parent) => parent.acc = union_opt(parent.acc, Some(rect)),
            None => return Some(rect),
        }
    }
    None
}

/// A container being measured: its visible children and the union of those measured so far.
struct Frame<'a> {
    id: &'a str,
    children: Vec<&'a str>,
    next: usize,
    acc: Option<Rect>,
}

/// Visible children of `id` when it is an expanded container.
fn expanded_children<'a>(g: &'a ElementGraph, id: &str) -> Option<Vec<&'a str>> {
    let node = g.node(id)?;
    let children = g.children(id);
    if node.collapsed_children.is_some() || children.is_empty() {
        return None;
    }
    Some(
        children
            .into_iter()
            .filter(|c| g.node(c).is_some_and(|n| !n.hidden))
            .collect(),
    )
}

fn own_rect(node: &NodeData) -> Rect {
    Rect::from_center(node.position, node.size)
}

fn union_opt(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (a, b) => a.or(b),
    }
}

/// Rendered center of `id`.
pub fn position(g: &ElementGraph, id: &str, padding: f64) -> Option<Point> {
    bounding_box(g, id, padding).map(|r| r.center())
}

/// Translates `nodes` by `delta` without moving any node twice.
///
/// Only the top-most members of `nodes` are considered. An expanded container has no position of
/// its own, so it is moved by moving its children; every other node is translated directly.
pub fn move_nodes(g: &mut ElementGraph, delta: Point, nodes: &[String]) {
    if delta.is_zero() {
        return;
    }
    let top = alg::top_most(g, nodes);
    let mut moved = BTreeSet::new();
    move_top_most(g, delta, &top, &mut moved);
}

fn move_top_most(g: &mut ElementGraph, delta: Point, nodes: &[String], moved: &mut BTreeSet<String>) {
    let mut pending: Vec<String> = nodes.iter().rev().cloned().collect();
    while let Some(id) = pending.pop() {
        if !moved.insert(id.clone()) {
            continue;
        }
        let expanded = g
            .node(&id)
            .is_some_and(|n| n.collapsed_children.is_none())
            && g.has_children(&id);
        if expanded {
            pending.extend(g.children(&id).into_iter().rev().map(str::to_string));
        } else if let Some(node) = g.node_mut(&id) {
            node.position = node.position + delta;
        }
    }
}
