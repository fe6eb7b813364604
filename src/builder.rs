//! Tree growth: repeatedly split terminal regions until the layout settles,
//! then hand off to room and corridor generation.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, trace};

use crate::config::{ConfigError, DungeonConfig};
use crate::draw::DrawSink;
use crate::leaf::BspTree;

/// Drives one full generation run: a growth loop over a FIFO work queue,
/// followed by a single room/corridor pass from the root.
#[derive(Clone)]
pub struct TreeBuilder {
    config: DungeonConfig,
}

impl TreeBuilder {
    pub fn new(config: DungeonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> DungeonConfig {
        self.config
    }

    /// Generate a dungeon, emitting room and corridor draw events to `sink`
    /// as they are finalized. The returned tree is complete and read-only.
    pub fn build(&self, rng: &mut impl Rng, sink: &mut impl DrawSink) -> BspTree {
        let mut tree = BspTree::new(self.config);
        self.grow(&mut tree, rng);

        let root = tree.root();
        tree.create_rooms(root, rng, sink);
        debug!(
            nodes = tree.len(),
            rooms = tree.room_count(),
            "generation finished"
        );
        tree
    }

    /// The growth fixed point. Each round drains the queue of still-terminal
    /// nodes; children created mid-round join the same round at the back of
    /// the queue. Nodes that decline or fail to split wait in `pending` and
    /// are retried next round. The loop stops after the first round with no
    /// successful split.
    fn grow(&self, tree: &mut BspTree, rng: &mut impl Rng) {
        let mut queue = VecDeque::new();
        queue.push_back(tree.root());
        let mut pending = Vec::new();

        loop {
            let mut splits = 0;
            while let Some(id) = queue.pop_front() {
                let bounds = tree.node(id).bounds;
                let forced =
                    bounds.width > self.config.max_leaf_size || bounds.height > self.config.max_leaf_size;
                if !forced && !rng.gen_bool(self.config.split_chance) {
                    pending.push(id);
                    continue;
                }

                if tree.split(id, rng) {
                    splits += 1;
                    let (left, right) = tree.children(id);
                    if let Some(left) = left {
                        queue.push_back(left);
                    }
                    if let Some(right) = right {
                        queue.push_back(right);
                    }
                    trace!(?bounds, forced, "split region");
                } else {
                    pending.push(id);
                }
            }

            if splits == 0 {
                break;
            }
            trace!(splits, retries = pending.len(), "growth round done");
            queue.extend(pending.drain(..));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COLOR_CORRIDOR, COLOR_ROOM};
    use crate::draw::{DrawEvent, DrawQueue};
    use crate::geometry::Rect;
    use crate::leaf::LeafId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn build(width: i32, height: i32, seed: u64) -> (BspTree, Vec<DrawEvent>) {
        let builder = TreeBuilder::new(DungeonConfig::new(width, height))
            .expect("config is valid");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut queue = DrawQueue::new();
        let tree = builder.build(&mut rng, &mut queue);
        (tree, queue.drain().collect())
    }

    /// Every tree node id, root first.
    fn walk(tree: &BspTree) -> Vec<LeafId> {
        let mut ids = vec![tree.root()];
        let mut index = 0;
        while index < ids.len() {
            let (left, right) = tree.children(ids[index]);
            ids.extend(left);
            ids.extend(right);
            index += 1;
        }
        ids
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(TreeBuilder::new(DungeonConfig::new(0, 10)).is_err());
    }

    #[test]
    fn test_growth_reaches_fixed_point() {
        for seed in 0..8 {
            let (tree, _) = build(80, 60, seed);
            for id in walk(&tree) {
                let node = tree.node(id);
                if node.is_terminal() {
                    // No oversized region survives the growth loop
                    assert!(node.bounds.width <= 20);
                    assert!(node.bounds.height <= 20);
                }
            }
        }
    }

    #[test]
    fn test_branches_always_have_two_children() {
        let (tree, _) = build(80, 60, 4);
        for id in walk(&tree) {
            let (left, right) = tree.children(id);
            assert_eq!(left.is_some(), right.is_some());
        }
    }

    #[test]
    fn test_children_tile_their_parent() {
        let (tree, _) = build(64, 48, 17);
        for id in walk(&tree) {
            let parent = tree.node(id).bounds;
            let (Some(left), Some(right)) = tree.children(id) else {
                continue;
            };
            let a = tree.node(left).bounds;
            let b = tree.node(right).bounds;
            assert!(a.width >= 1 && a.height >= 1);
            assert!(b.width >= 1 && b.height >= 1);
            assert_eq!(a.width * a.height + b.width * b.height, parent.width * parent.height);
            if a.width == parent.width {
                assert_eq!((a.x, a.y), (parent.x, parent.y));
                assert_eq!((b.x, b.y), (parent.x, parent.y + a.height));
                assert_eq!(b.width, parent.width);
                assert_eq!(a.height + b.height, parent.height);
            } else {
                assert_eq!((a.x, a.y), (parent.x, parent.y));
                assert_eq!((b.x, b.y), (parent.x + a.width, parent.y));
                assert_eq!(a.height, parent.height);
                assert_eq!(b.height, parent.height);
                assert_eq!(a.width + b.width, parent.width);
            }
        }
    }

    #[test]
    fn test_rooms_only_on_terminal_nodes() {
        let (tree, _) = build(64, 48, 23);
        for id in walk(&tree) {
            let node = tree.node(id);
            if !node.is_terminal() {
                assert_eq!(node.room(), None);
            }
        }
    }

    #[test]
    fn test_every_room_is_drawn_and_corridors_are_thin() {
        let (tree, events) = build(64, 48, 29);
        let rooms: Vec<Rect> = tree.rooms().collect();
        assert!(!rooms.is_empty());

        for room in &rooms {
            assert!(events.iter().any(|e| e.filled && e.rect == *room && e.color == COLOR_ROOM));
        }
        for event in &events {
            assert!(event.filled);
            if !rooms.contains(&event.rect) {
                assert_eq!(event.color, COLOR_CORRIDOR);
                assert!(event.rect.width == 1 || event.rect.height == 1);
            }
        }
    }

    #[test]
    fn test_same_seed_reproduces_everything() {
        let (tree_a, events_a) = build(40, 30, 42);
        let (tree_b, events_b) = build(40, 30, 42);
        assert_eq!(tree_a, tree_b);
        assert_eq!(events_a, events_b);

        let json_a = serde_json::to_string(&tree_a).expect("tree serializes");
        let json_b = serde_json::to_string(&tree_b).expect("tree serializes");
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn test_walkable_area_is_connected() {
        for seed in [1, 8, 77] {
            let (tree, events) = build(48, 36, seed);
            let config = tree.config();

            // Rasterize every filled event into a cell grid
            let mut open = vec![false; (config.width * config.height) as usize];
            let cell = |x: i32, y: i32| (y * config.width + x) as usize;
            for event in &events {
                for y in event.rect.y..event.rect.bottom() {
                    for x in event.rect.x..event.rect.right() {
                        open[cell(x, y)] = true;
                    }
                }
            }

            // Flood fill from the first room. Corridor legs can meet their
            // bend corner-to-corner, so diagonal steps count as adjacent.
            let rooms: Vec<Rect> = tree.rooms().collect();
            assert!(rooms.len() > 1, "expected multiple rooms for seed {seed}");
            let mut reached = vec![false; open.len()];
            let mut frontier = VecDeque::new();
            let start = rooms[0].center();
            reached[cell(start.0, start.1)] = true;
            frontier.push_back(start);
            while let Some((x, y)) = frontier.pop_front() {
                for ny in y - 1..=y + 1 {
                    for nx in x - 1..=x + 1 {
                        if nx < 0 || ny < 0 || nx >= config.width || ny >= config.height {
                            continue;
                        }
                        let idx = cell(nx, ny);
                        if open[idx] && !reached[idx] {
                            reached[idx] = true;
                            frontier.push_back((nx, ny));
                        }
                    }
                }
            }

            // Every cell of every room is reachable from the first room
            for room in &rooms {
                for y in room.y..room.bottom() {
                    for x in room.x..room.right() {
                        assert!(reached[cell(x, y)], "unreached room cell ({x},{y}) seed {seed}");
                    }
                }
            }
        }
    }
}
