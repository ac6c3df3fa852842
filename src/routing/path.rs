use super::Obstacle;
use super::geometry::segment_hits_obstacles;

/// Obstacle-avoiding orthogonal path from `start` to `end`.
///
/// Tries, in order, the horizontal-first L, the vertical-first L, a Z through
/// the vertical midline and a Z through the horizontal midline. The first
/// candidate whose segments all miss the obstacles is returned unchanged
/// (3 points for an L, 4 for a Z). An empty vector means every shape was
/// blocked.
pub fn find_path(start: (f32, f32), end: (f32, f32), obstacles: &[Obstacle]) -> Vec<(f32, f32)> {
    let mid_x = (start.0 + end.0) / 2.0;
    let mid_y = (start.1 + end.1) / 2.0;
    let candidates = [
        vec![start, (end.0, start.1), end],
        vec![start, (start.0, end.1), end],
        vec![start, (mid_x, start.1), (mid_x, end.1), end],
        vec![start, (start.0, mid_y), (end.0, mid_y), end],
    ];
    for (attempt, candidate) in candidates.into_iter().enumerate() {
        if path_is_clear(&candidate, obstacles) {
            log::debug!("path {start:?} -> {end:?} accepted on attempt {}", attempt + 1);
            return candidate;
        }
    }
    Vec::new()
}

fn path_is_clear(points: &[(f32, f32)], obstacles: &[Obstacle]) -> bool {
    points
        .windows(2)
        .all(|segment| !segment_hits_obstacles(segment[0], segment[1], obstacles))
}
