/// Upper bound on the device pixel ratio honoured by the viewport sizer.
/// Higher-density displays render at 2x to bound bitmap memory.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// ============================================
// Terrain map
// ============================================

/// Elevation grid dimensions (cells sampled at c / cols, r / rows)
pub const TERRAIN_COLS: usize = 48;
pub const TERRAIN_ROWS: usize = 24;

/// Iso-levels traced by marching squares
pub const CONTOUR_LEVELS: [f64; 7] = [0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];

/// Spacing of the architectural overlay grid in CSS pixels
pub const TERRAIN_GRID_SPACING: f64 = 40.0;

/// Scan line sweep speed in CSS pixels per second
pub const SCAN_LINE_SPEED: f64 = 30.0;

// ============================================
// Mesh network
// ============================================

/// Seconds for one signal particle to traverse the whole path
pub const SIGNAL_CYCLE_SECONDS: f64 = 4.0;

/// Particles travelling the signal path, evenly staggered
pub const SIGNAL_PARTICLES: usize = 3;

/// Nominal per-hop latency printed in the overlay
pub const HOP_LATENCY_MS: usize = 12;

pub const MESH_GRID_SPACING: f64 = 32.0;

// ============================================
// Ambient background
// ============================================

pub const AMBIENT_SHAPES: usize = 18;
pub const AMBIENT_MOTES: usize = 40;
pub const AMBIENT_GRID_LINES: usize = 12;

/// Shapes may drift this far (CSS px) past an edge before wrapping
pub const SHAPE_WRAP_MARGIN: f64 = 100.0;

/// Motes recycle once they rise this far (CSS px) above the top edge
pub const MOTE_WRAP_MARGIN: f64 = 10.0;

/// Animation speeds are authored per 60 Hz frame
pub const FRAMES_PER_SECOND: f64 = 60.0;

/// Largest elapsed-time gap (seconds) applied in one step; longer gaps
/// (background tabs) are truncated instead of teleporting entities.
pub const MAX_STEP_SECONDS: f64 = 0.25;

// ============================================
// Constellation (hero)
// ============================================

pub const CONSTELLATION_STARS: usize = 30;

/// Stars closer than this (CSS px) are linked
pub const CONSTELLATION_LINK_DISTANCE: f64 = 150.0;

// ============================================
// Signal grid (call to action)
// ============================================

pub const SIGNAL_GRID_SPACING: f64 = 40.0;
pub const SIGNAL_GRID_RINGS: usize = 5;

/// Typeface used for every overlay label
pub const MONO_FONT: &str = "\"JetBrains Mono\", monospace";
