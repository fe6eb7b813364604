//! Tuning constants organized by category.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.

use glam::Vec3;

// =============================================================================
// GENERATION
// =============================================================================

/// Smallest dimension a child region may have after a split
pub const DEFAULT_MIN_LEAF_SIZE: i32 = 6;
/// Regions with a dimension above this are always split further
pub const DEFAULT_MAX_LEAF_SIZE: i32 = 20;
/// Chance that a non-forced region attempts a split each pass
pub const DEFAULT_SPLIT_CHANCE: f64 = 0.75;
/// Chance used for all coin-flip tie-breaks (orientation, room pick, bend)
pub const DEFAULT_TIEBREAK_CHANCE: f64 = 0.5;
/// Aspect ratio at which the split orientation stops being a coin flip
pub const FORCED_SPLIT_RATIO: f32 = 1.25;
/// Smallest room dimension
pub const MIN_ROOM_SIZE: i32 = 3;
/// Margin kept between a room and its region's edges
pub const ROOM_MARGIN: i32 = 1;
/// Default dungeon width in cells
pub const DEFAULT_DUNGEON_WIDTH: i32 = 40;
/// Default dungeon height in cells
pub const DEFAULT_DUNGEON_HEIGHT: i32 = 30;

// =============================================================================
// PALETTE
// =============================================================================

/// Window clear color
pub const COLOR_BACKGROUND: Vec3 = Vec3::new(0.0, 0.0, 0.0);
/// Partition outline color
pub const COLOR_OUTLINE: Vec3 = Vec3::new(0.5, 0.5, 0.5);
/// Room fill color
pub const COLOR_ROOM: Vec3 = Vec3::new(1.0, 1.0, 1.0);
/// Corridor fill color
pub const COLOR_CORRIDOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);

// =============================================================================
// CAMERA
// =============================================================================

/// Default zoom level (pixels per grid cell)
pub const CAMERA_DEFAULT_ZOOM: f32 = 16.0;
/// Minimum zoom level
pub const CAMERA_MIN_ZOOM: f32 = 2.0;
/// Maximum zoom level
pub const CAMERA_MAX_ZOOM: f32 = 128.0;
/// Zoom speed multiplier per scroll unit
pub const CAMERA_ZOOM_FACTOR: f32 = 1.1;
/// Smoothing factor for zoom interpolation (lower = smoother)
pub const CAMERA_ZOOM_SMOOTHING: f32 = 0.85;
/// Velocity damping factor (lower = more friction)
pub const CAMERA_VELOCITY_DAMPING: f32 = 0.90;
/// Velocity threshold below which camera stops
pub const CAMERA_VELOCITY_THRESHOLD: f32 = 0.001;
/// Zoom difference threshold for snapping
pub const CAMERA_ZOOM_SNAP_THRESHOLD: f32 = 0.01;
/// Momentum multiplier when releasing pan
pub const CAMERA_MOMENTUM_SCALE: f32 = 2.0;
/// Fraction of the viewport the dungeon fills when first framed
pub const CAMERA_FIT_MARGIN: f32 = 0.9;

// =============================================================================
// VIEWER / WINDOW
// =============================================================================

/// Default window width
pub const WINDOW_DEFAULT_WIDTH: u32 = 1280;
/// Default window height
pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
/// Seconds between revealing consecutive draw events
pub const REVEAL_INTERVAL: f32 = 0.04;
/// Cap on per-frame delta time (seconds)
pub const MAX_FRAME_DT: f32 = 0.25;

// =============================================================================
// EXPORT
// =============================================================================

/// Default pixels per cell for PNG export
pub const EXPORT_DEFAULT_CELL_PX: u32 = 8;
