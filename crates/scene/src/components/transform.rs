use foundation::math::Vec3;

/// World-space placement of an entity (ECEF meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
}

impl Transform {
    pub fn translate(position: Vec3) -> Self {
        Self { position }
    }
}
