use super::geometry::{EPS, compress_path, is_horizontal, is_vertical, segment_hits_obstacle};
use super::{Obstacle, Wire};

/// Default perpendicular shift for an overlapping segment.
pub const OVERLAP_SHIFT: f32 = 6.0;

/// Multiples of the shift tried for each overlapping segment, in order.
const SHIFT_STEPS: [f32; 4] = [1.0, -1.0, 2.0, -2.0];

/// Separates wires whose segments run on top of each other.
///
/// Runs up to `passes` passes with the default shift. See
/// [`deconflict_with_shift`].
pub fn deconflict(wires: &[Wire], obstacles: &[Obstacle], passes: usize) -> Vec<Wire> {
    deconflict_with_shift(wires, obstacles, passes, OVERLAP_SHIFT)
}

/// Separates wires whose segments run on top of each other.
///
/// An overlapping segment `a -> b` is replaced by the jog `a -> a' -> b' -> b`
/// offset perpendicular to its axis, so wire endpoints never move. A jog is
/// kept only when none of its three segments touches an obstacle that
/// `a -> b` did not already touch, it does not fold the wire back over
/// itself, and it strictly lowers the number of overlapping pairs that wire
/// takes part in. That last rule makes [`overlap_count`] non-increasing
/// across passes. Later wires are moved
/// before earlier ones. Stops early once a pass changes nothing.
pub fn deconflict_with_shift(
    wires: &[Wire],
    obstacles: &[Obstacle],
    passes: usize,
    shift: f32,
) -> Vec<Wire> {
    let mut out = wires.to_vec();
    for pass in 0..passes {
        let mut accepted = 0usize;
        for idx in (0..out.len()).rev() {
            accepted += separate_wire(&mut out, idx, obstacles, shift);
        }
        log::debug!(
            "deconflict pass {}: {} shifts, {} overlaps left",
            pass + 1,
            accepted,
            overlap_count(&out)
        );
        if accepted == 0 {
            break;
        }
    }
    out
}

/// Pairs of segments, taken from different wires, that are collinear and
/// share a stretch of positive length.
pub fn overlap_count(wires: &[Wire]) -> usize {
    let mut count = 0usize;
    for i in 0..wires.len() {
        for j in (i + 1)..wires.len() {
            count += pair_overlaps(&wires[i].points, &wires[j].points);
        }
    }
    count
}

fn separate_wire(wires: &mut [Wire], idx: usize, obstacles: &[Obstacle], shift: f32) -> usize {
    let mut accepted = 0usize;
    loop {
        let points = wires[idx].points.clone();
        let current = overlaps_involving(wires, idx, &points);
        if current == 0 {
            break;
        }
        let folds = self_overlaps(&points);
        let mut moved = None;
        'segments: for seg in 0..points.len().saturating_sub(1) {
            let (a, b) = (points[seg], points[seg + 1]);
            if !segment_overlaps_others(wires, idx, a, b) {
                continue;
            }
            for step in SHIFT_STEPS {
                let Some((a2, b2)) = jog(a, b, shift * step) else {
                    continue 'segments;
                };
                if jog_adds_collision([a, a2, b2, b], obstacles) {
                    continue;
                }
                let candidate = splice(&points, seg, a2, b2);
                if self_overlaps(&candidate) > folds {
                    continue;
                }
                if overlaps_involving(wires, idx, &candidate) < current {
                    moved = Some(candidate);
                    break 'segments;
                }
            }
        }
        match moved {
            Some(candidate) => {
                wires[idx].points = candidate;
                accepted += 1;
            }
            None => break,
        }
    }
    accepted
}

/// Offset copies of `a` and `b`, perpendicular to the segment's axis.
fn jog(a: (f32, f32), b: (f32, f32), offset: f32) -> Option<((f32, f32), (f32, f32))> {
    let (dx, dy) = if is_horizontal(a, b) {
        (0.0, offset)
    } else if is_vertical(a, b) {
        (offset, 0.0)
    } else {
        return None;
    };
    Some(((a.0 + dx, a.1 + dy), (b.0 + dx, b.1 + dy)))
}

// True when a segment of `a -> a' -> b' -> b` touches an obstacle that the
// replaced `a -> b` does not.
fn jog_adds_collision([a, a2, b2, b]: [(f32, f32); 4], obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .filter(|obstacle| !segment_hits_obstacle(a, b, obstacle))
        .any(|obstacle| {
            [(a, a2), (a2, b2), (b2, b)]
                .iter()
                .any(|&(p, q)| segment_hits_obstacle(p, q, obstacle))
        })
}

fn splice(points: &[(f32, f32)], seg: usize, a2: (f32, f32), b2: (f32, f32)) -> Vec<(f32, f32)> {
    let mut shifted = Vec::with_capacity(points.len() + 2);
    shifted.extend_from_slice(&points[..=seg]);
    shifted.push(a2);
    shifted.push(b2);
    shifted.extend_from_slice(&points[seg + 1..]);
    compress_path(&shifted)
}

/// Pairs of segments within one polyline that run over each other, such as
/// a stub that doubles back on its own lead.
fn self_overlaps(points: &[(f32, f32)]) -> usize {
    let segments: Vec<_> = points.windows(2).map(|s| (s[0], s[1])).collect();
    let mut count = 0usize;
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let ((a1, a2), (b1, b2)) = (segments[i], segments[j]);
            if segments_overlap(a1, a2, b1, b2) {
                count += 1;
            }
        }
    }
    count
}

fn overlaps_involving(wires: &[Wire], idx: usize, points: &[(f32, f32)]) -> usize {
    wires
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != idx)
        .map(|(_, wire)| pair_overlaps(points, &wire.points))
        .sum()
}

fn segment_overlaps_others(wires: &[Wire], idx: usize, a: (f32, f32), b: (f32, f32)) -> bool {
    wires
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != idx)
        .any(|(_, wire)| {
            wire.points
                .windows(2)
                .any(|seg| segments_overlap(a, b, seg[0], seg[1]))
        })
}

fn pair_overlaps(a: &[(f32, f32)], b: &[(f32, f32)]) -> usize {
    let mut count = 0usize;
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            if segments_overlap(sa[0], sa[1], sb[0], sb[1]) {
                count += 1;
            }
        }
    }
    count
}

fn segments_overlap(a1: (f32, f32), a2: (f32, f32), b1: (f32, f32), b2: (f32, f32)) -> bool {
    if is_horizontal(a1, a2) && is_horizontal(b1, b2) && (a1.1 - b1.1).abs() <= EPS {
        return span_overlap((a1.0, a2.0), (b1.0, b2.0)) > EPS;
    }
    if is_vertical(a1, a2) && is_vertical(b1, b2) && (a1.0 - b1.0).abs() <= EPS {
        return span_overlap((a1.1, a2.1), (b1.1, b2.1)) > EPS;
    }
    false
}

fn span_overlap(a: (f32, f32), b: (f32, f32)) -> f32 {
    let lo = a.0.min(a.1).max(b.0.min(b.1));
    let hi = a.0.max(a.1).min(b.0.max(b.1));
    hi - lo
}
