use std::collections::HashMap;

/// Relative pin offsets for one component, taken from its `digital-pins` map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinMap {
    /// Pin ids in declaration order.
    pub order: Vec<String>,
    /// Offset `(dx, dy)` of each pin from the component's top-left anchor.
    pub offsets: HashMap<String, (f32, f32)>,
}

impl PinMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pin, keeping declaration order. A repeated id updates the offset.
    pub fn insert(&mut self, pin_id: &str, offset: (f32, f32)) {
        if !self.offsets.contains_key(pin_id) {
            self.order.push(pin_id.to_string());
        }
        self.offsets.insert(pin_id.to_string(), offset);
    }

    pub fn offset(&self, pin_id: &str) -> Option<(f32, f32)> {
        self.offsets.get(pin_id).copied()
    }

    /// Pins in declaration order that carry an offset.
    pub fn pins(&self) -> impl Iterator<Item = (&str, (f32, f32))> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.offsets.get(id).map(|offset| (id.as_str(), *offset)))
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// `None` until the image asset has been measured.
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Degrees. Not used by routing.
    pub rotation: f32,
    pub pin_map: Option<PinMap>,
}

impl Component {
    pub fn new(id: &str, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            x,
            y,
            width: Some(width),
            height: Some(height),
            rotation: 0.0,
            pin_map: None,
        }
    }

    pub fn with_pin(mut self, pin_id: &str, dx: f32, dy: f32) -> Self {
        self.pin_map
            .get_or_insert_with(PinMap::new)
            .insert(pin_id, (dx, dy));
        self
    }

    pub fn size_resolved(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    /// Width and height, treating unresolved dimensions as zero.
    pub fn size(&self) -> (f32, f32) {
        (
            self.width.unwrap_or(0.0).max(0.0),
            self.height.unwrap_or(0.0).max(0.0),
        )
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub device_id: String,
    pub pin_id: String,
}

/// One named entry of the wire table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub name: String,
    pub endpoints: Vec<Endpoint>,
}

impl Connection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoints: Vec::new(),
        }
    }

    pub fn with_endpoint(mut self, device_id: &str, pin_id: &str) -> Self {
        self.endpoints.push(Endpoint {
            device_id: device_id.to_string(),
            pin_id: pin_id.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Circuit {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|component| component.id == id)
    }

    /// True once every component has measured dimensions.
    pub fn is_fully_resolved(&self) -> bool {
        self.components.iter().all(Component::size_resolved)
    }
}
