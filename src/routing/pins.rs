use crate::ir::Component;

use super::Obstacle;

/// Magnitude of the exit vector returned by [`short_exit_direction`].
pub const EXIT_LEAD: f32 = 10.0;

/// Absolute canvas coordinate of `pin_id` on `component_id`.
///
/// Returns `None` when the component is unknown, has no pin map, or the pin
/// is not in its `digital-pins` collection.
pub fn resolve_pin(component_id: &str, pin_id: &str, components: &[Component]) -> Option<(f32, f32)> {
    let component = components.iter().find(|c| c.id == component_id)?;
    let (dx, dy) = component.pin_map.as_ref()?.offset(pin_id)?;
    Some((component.x + dx, component.y + dy))
}

/// Short perpendicular step off the component edge nearest to `pin`.
///
/// The nearest top/bottom distance is compared against the nearest
/// left/right distance and top/bottom wins ties. The step points out of the
/// body through the chosen edge.
pub fn short_exit_direction(pin: (f32, f32), size: (f32, f32), pos: (f32, f32)) -> (f32, f32) {
    exit_vector(pin, size, pos, EXIT_LEAD)
}

pub(super) fn exit_vector(pin: (f32, f32), size: (f32, f32), pos: (f32, f32), lead: f32) -> (f32, f32) {
    let to_top = pos.1 - pin.1;
    let to_bottom = pos.1 + size.1 - pin.1;
    let to_left = pos.0 - pin.0;
    let to_right = pos.0 + size.0 - pin.0;

    let horizontal_edge = if to_top.abs() <= to_bottom.abs() {
        (to_top, -1.0)
    } else {
        (to_bottom, 1.0)
    };
    let vertical_edge = if to_left.abs() <= to_right.abs() {
        (to_left, -1.0)
    } else {
        (to_right, 1.0)
    };

    if horizontal_edge.0.abs() <= vertical_edge.0.abs() {
        (0.0, lead * signed_unit(horizontal_edge))
    } else {
        (lead * signed_unit(vertical_edge), 0.0)
    }
}

// Sign of the signed distance; a pin sitting on the edge takes the edge's
// outward sign.
fn signed_unit((distance, outward): (f32, f32)) -> f32 {
    if distance == 0.0 {
        outward
    } else {
        distance.signum()
    }
}

/// Steps off the pin along its exit vector until the point clears the
/// owning component's rectangle, or `max_steps` is reached.
pub(super) fn lead_out(pin: (f32, f32), owner: &Component, lead: f32, max_steps: usize) -> (f32, f32) {
    let (dx, dy) = exit_vector(pin, owner.size(), owner.position(), lead);
    let (width, height) = owner.size();
    let bounds = Obstacle {
        id: owner.id.clone(),
        x1: owner.x,
        y1: owner.y,
        x2: owner.x + width,
        y2: owner.y + height,
    };
    let mut point = (pin.0 + dx, pin.1 + dy);
    let mut steps = 1;
    while bounds.contains(point) && steps < max_steps {
        point = (point.0 + dx, point.1 + dy);
        steps += 1;
    }
    point
}
