// Color alias layered on glam.
//
// glam's Vec3 is a plain value type and already provides reflect, lerp and
// component-wise products, so the tracer uses it directly.

use glam::Vec3;

/// Color type alias (RGB in x, y, z).
///
/// Colors are not clamped while light is accumulated; values above 1.0 are
/// legal until the pixel is written out.
pub type Color = Vec3;
