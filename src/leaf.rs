use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::constants::*;
use crate::draw::{DrawEvent, DrawSink};
use crate::geometry::{Point, Rect};

/// Handle to a node in the tree's arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafId(usize);

/// A node in the BSP tree. Either a terminal region (optionally holding a
/// room) or a branch with two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// The region this node covers
    pub bounds: Rect,
    /// Left/top child after a split
    left_child: Option<LeafId>,
    /// Right/bottom child after a split
    right_child: Option<LeafId>,
    /// The room carved in this region (terminal nodes only)
    room: Option<Rect>,
}

impl Leaf {
    fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            left_child: None,
            right_child: None,
            room: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.left_child.is_none() && self.right_child.is_none()
    }

    pub fn room(&self) -> Option<Rect> {
        self.room
    }
}

/// The BSP tree. Nodes live in an arena and refer to each other by [`LeafId`],
/// so the whole structure is plain data that can be serialized or walked
/// without pointer chasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BspTree {
    config: DungeonConfig,
    nodes: Vec<Leaf>,
}

impl BspTree {
    /// A tree containing a single terminal root covering the whole area.
    pub fn new(config: DungeonConfig) -> Self {
        let root = Leaf::new(Rect::new(0, 0, config.width, config.height));
        Self {
            config,
            nodes: vec![root],
        }
    }

    pub fn root(&self) -> LeafId {
        LeafId(0)
    }

    pub fn node(&self, id: LeafId) -> &Leaf {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: LeafId) -> (Option<LeafId>, Option<LeafId>) {
        let node = &self.nodes[id.0];
        (node.left_child, node.right_child)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Leaf> {
        self.nodes.iter()
    }

    pub fn rooms(&self) -> impl Iterator<Item = Rect> + '_ {
        self.nodes.iter().filter_map(|node| node.room)
    }

    pub fn room_count(&self) -> usize {
        self.rooms().count()
    }

    pub fn config(&self) -> DungeonConfig {
        self.config
    }

    /// Attempt to subdivide the region owned by `id` into two children.
    ///
    /// Fails (returning false) when the node was already split or when the
    /// chosen dimension leaves no room for two minimum-sized children. Both
    /// outcomes are normal control flow, not errors.
    pub fn split(&mut self, id: LeafId, rng: &mut impl Rng) -> bool {
        let node = &self.nodes[id.0];
        if node.left_child.is_some() || node.right_child.is_some() {
            return false;
        }
        let bounds = node.bounds;

        // Stretched regions are always cut across their long axis; anything
        // closer to square gets a coin flip.
        let horizontal = if bounds.width as f32 >= bounds.height as f32 * FORCED_SPLIT_RATIO {
            false
        } else if bounds.height as f32 >= bounds.width as f32 * FORCED_SPLIT_RATIO {
            true
        } else {
            rng.gen_bool(self.config.tiebreak_chance)
        };

        let dimension = if horizontal { bounds.height } else { bounds.width };
        let max = dimension - self.config.min_leaf_size;
        if max <= self.config.min_leaf_size {
            return false;
        }

        let offset = rng.gen_range(self.config.min_leaf_size..=max);
        self.attach_children(id, horizontal, offset);
        true
    }

    /// Install two children cut at `offset` along the chosen axis. The
    /// children's bounds exactly tile the parent's.
    fn attach_children(&mut self, id: LeafId, horizontal: bool, offset: i32) {
        let bounds = self.nodes[id.0].bounds;
        let (first, second) = if horizontal {
            (
                Rect::new(bounds.x, bounds.y, bounds.width, offset),
                Rect::new(bounds.x, bounds.y + offset, bounds.width, bounds.height - offset),
            )
        } else {
            (
                Rect::new(bounds.x, bounds.y, offset, bounds.height),
                Rect::new(bounds.x + offset, bounds.y, bounds.width - offset, bounds.height),
            )
        };

        let left = self.push(Leaf::new(first));
        let right = self.push(Leaf::new(second));
        let node = &mut self.nodes[id.0];
        node.left_child = Some(left);
        node.right_child = Some(right);
    }

    fn push(&mut self, leaf: Leaf) -> LeafId {
        let id = LeafId(self.nodes.len());
        self.nodes.push(leaf);
        id
    }

    /// Recursively place rooms in terminal regions and connect sibling
    /// subtrees with corridors, emitting a draw event as each rectangle is
    /// finished.
    pub fn create_rooms(&mut self, id: LeafId, rng: &mut impl Rng, sink: &mut impl DrawSink) {
        let (left, right) = self.children(id);
        if left.is_some() || right.is_some() {
            if let Some(left) = left {
                self.create_rooms(left, rng, sink);
            }
            if let Some(right) = right {
                self.create_rooms(right, rng, sink);
            }
            // A lone child (splits always set both, but tolerate the shape)
            // gets no corridor.
            if let (Some(left), Some(right)) = (left, right) {
                let left_room = self.get_room(left, rng);
                let right_room = self.get_room(right, rng);
                if let (Some(left_room), Some(right_room)) = (left_room, right_room) {
                    self.create_corridor(&left_room, &right_room, rng, sink);
                }
            }
        } else {
            self.place_room(id, rng, sink);
        }
    }

    /// Place one room strictly inside a terminal region, keeping at least
    /// [`ROOM_MARGIN`] from every edge.
    fn place_room(&mut self, id: LeafId, rng: &mut impl Rng, sink: &mut impl DrawSink) {
        let bounds = self.nodes[id.0].bounds;
        let max_width = bounds.width - ROOM_MARGIN * 2;
        let max_height = bounds.height - ROOM_MARGIN * 2;
        if max_width < MIN_ROOM_SIZE || max_height < MIN_ROOM_SIZE {
            return; // Region too small for a room
        }

        let room_width = rng.gen_range(MIN_ROOM_SIZE..=max_width);
        let room_height = rng.gen_range(MIN_ROOM_SIZE..=max_height);
        let room_x = rng.gen_range(ROOM_MARGIN..=bounds.width - room_width - ROOM_MARGIN);
        let room_y = rng.gen_range(ROOM_MARGIN..=bounds.height - room_height - ROOM_MARGIN);

        let room = Rect::new(bounds.x + room_x, bounds.y + room_y, room_width, room_height);
        self.nodes[id.0].room = Some(room);
        sink.emit(DrawEvent {
            rect: room,
            color: COLOR_ROOM,
            filled: true,
        });
    }

    /// Return a room somewhere in this subtree, tie-breaking at random when
    /// both children offer one. Repeated calls can return different rooms,
    /// which varies where corridors attach.
    pub fn get_room(&self, id: LeafId, rng: &mut impl Rng) -> Option<Rect> {
        let node = &self.nodes[id.0];
        if let Some(room) = node.room {
            return Some(room);
        }

        let left_room = node.left_child.and_then(|child| self.get_room(child, rng));
        let right_room = node.right_child.and_then(|child| self.get_room(child, rng));

        match (left_room, right_room) {
            (None, None) => None,
            (Some(room), None) | (None, Some(room)) => Some(room),
            (Some(left_room), Some(right_room)) => {
                if rng.gen_bool(self.config.tiebreak_chance) {
                    Some(left_room)
                } else {
                    Some(right_room)
                }
            }
        }
    }

    /// Connect two rooms with an L-shaped corridor (or a single straight
    /// segment when the chosen endpoints share an axis), emitting each
    /// segment as a draw event.
    pub fn create_corridor(
        &self,
        left: &Rect,
        right: &Rect,
        rng: &mut impl Rng,
        sink: &mut impl DrawSink,
    ) {
        let point1 = interior_point(left, rng);
        let point2 = interior_point(right, rng);
        let dx = point2.x - point1.x;
        let dy = point2.y - point1.y;

        // The bend coin only exists for true L shapes.
        let horizontal_first = if dx != 0 && dy != 0 {
            rng.gen_bool(self.config.tiebreak_chance)
        } else {
            false
        };

        for rect in corridor_segments(point1, point2, horizontal_first) {
            sink.emit(DrawEvent {
                rect,
                color: COLOR_CORRIDOR,
                filled: true,
            });
        }
    }
}

/// Pick a corridor endpoint from a room's interior (one cell in from every
/// wall). Valid for any room at least 3 cells wide and tall.
fn interior_point(room: &Rect, rng: &mut impl Rng) -> Point {
    let x = rng.gen_range(room.x + 1..=room.x + room.width - 2);
    let y = rng.gen_range(room.y + 1..=room.y + room.height - 2);
    Point::new(x, y)
}

/// The one or two unit-wide rectangles linking `p1` to `p2`.
///
/// For a true L shape, `horizontal_first` picks the bend corner: when true
/// the corridor leaves `p1` along its row and turns at `(p2.x, p1.y)`, when
/// false it leaves along its column and turns at `(p1.x, p2.y)`. Coincident
/// points produce nothing.
fn corridor_segments(p1: Point, p2: Point, horizontal_first: bool) -> Vec<Rect> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let h_leg = |y: i32| Rect::new(p1.x.min(p2.x), y, dx.abs(), 1);
    let v_leg = |x: i32| Rect::new(x, p1.y.min(p2.y), 1, dy.abs());

    match (dx, dy) {
        (0, 0) => vec![],
        (_, 0) => vec![h_leg(p1.y)],
        (0, _) => vec![v_leg(p1.x)],
        _ if horizontal_first => vec![h_leg(p1.y), v_leg(p2.x)],
        _ => vec![v_leg(p1.x), h_leg(p2.y)],
    }
}
