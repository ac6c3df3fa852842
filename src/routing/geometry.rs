use crate::ir::Component;

use super::Obstacle;

/// Tolerance for treating two coordinates as equal.
pub(super) const EPS: f32 = 1e-3;

/// One bounding rectangle per component, in input order.
///
/// Components whose image size is not known yet contribute a zero-size
/// rectangle at their anchor.
pub fn obstacle_bounds(components: &[Component]) -> Vec<Obstacle> {
    components
        .iter()
        .map(|component| {
            let (width, height) = component.size();
            Obstacle {
                id: component.id.clone(),
                x1: component.x,
                y1: component.y,
                x2: component.x + width,
                y2: component.y + height,
            }
        })
        .collect()
}

pub(super) fn same_point(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() <= EPS && (a.1 - b.1).abs() <= EPS
}

pub(super) fn is_horizontal(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.1 - b.1).abs() <= EPS && (a.0 - b.0).abs() > EPS
}

pub(super) fn is_vertical(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() <= EPS && (a.1 - b.1).abs() > EPS
}

/// Tests a segment against the obstacles by walking it in unit steps.
///
/// Every integer offset along the segment is checked plus the far endpoint,
/// with inclusive rectangle bounds. Zero-length segments never hit, and
/// neither do segments or obstacles with non-finite coordinates.
pub fn segment_hits_obstacles(a: (f32, f32), b: (f32, f32), obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|obstacle| segment_hits_obstacle(a, b, obstacle))
}

/// Upper bound on samples walked for one segment/obstacle pair.
const MAX_SAMPLES: usize = 1 << 20;

pub(super) fn segment_hits_obstacle(a: (f32, f32), b: (f32, f32), obstacle: &Obstacle) -> bool {
    let coords = [a.0, a.1, b.0, b.1, obstacle.x1, obstacle.y1, obstacle.x2, obstacle.y2];
    if same_point(a, b) || !coords.iter().all(|v| v.is_finite()) {
        return false;
    }
    // Cheap reject before sampling.
    if a.0.max(b.0) < obstacle.x1
        || a.0.min(b.0) > obstacle.x2
        || a.1.max(b.1) < obstacle.y1
        || a.1.min(b.1) > obstacle.y2
    {
        return false;
    }
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len = dx.abs().max(dy.abs());

    // Sample `i` sits `i` units from `a` along the major axis, so only the
    // samples inside the obstacle's span on that axis can hit.
    let (start, delta, lo, hi) = if dx.abs() >= dy.abs() {
        (a.0, dx, obstacle.x1, obstacle.x2)
    } else {
        (a.1, dy, obstacle.y1, obstacle.y2)
    };
    let sign = delta.signum();
    let near = ((lo - start) * sign).min((hi - start) * sign);
    let far = ((lo - start) * sign).max((hi - start) * sign);
    let first = (near.ceil() - 1.0).max(0.0);
    let last = (far.floor() + 1.0).min(len.floor());
    if first <= last {
        for i in (first as usize..=last as usize).take(MAX_SAMPLES) {
            let t = i as f32 / len;
            if obstacle.contains((a.0 + dx * t, a.1 + dy * t)) {
                return true;
            }
        }
    }
    obstacle.contains(b)
}

/// Drops repeated points and interior points that continue a straight run.
pub(super) fn compress_path(points: &[(f32, f32)]) -> Vec<(f32, f32)> {
    let mut out: Vec<(f32, f32)> = Vec::with_capacity(points.len());
    for &point in points {
        if let Some(&last) = out.last()
            && same_point(last, point)
        {
            continue;
        }
        if out.len() >= 2 {
            let prev = out[out.len() - 2];
            let curr = out[out.len() - 1];
            let straight = (is_horizontal(prev, curr) && is_horizontal(curr, point))
                || (is_vertical(prev, curr) && is_vertical(curr, point));
            let same_direction = (curr.0 - prev.0) * (point.0 - curr.0) >= 0.0
                && (curr.1 - prev.1) * (point.1 - curr.1) >= 0.0;
            if straight && same_direction {
                out.pop();
            }
        }
        out.push(point);
    }
    if points.len() >= 2 && out.len() == 1 {
        // Keep degenerate wires drawable as a single zero-length segment.
        out.push(out[0]);
    }
    out
}
