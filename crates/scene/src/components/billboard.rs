/// Where the anchor point sits relative to the drawn quad.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VerticalOrigin {
    #[default]
    Center,
    Bottom,
    Top,
}

/// Camera-facing icon drawn at the entity position.
#[derive(Debug, Clone, PartialEq)]
pub struct Billboard {
    /// Asset identifier resolved by the host asset pipeline.
    pub image: String,
    pub scale: f32,
    pub vertical_origin: VerticalOrigin,
}

impl Billboard {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            scale: 1.0,
            vertical_origin: VerticalOrigin::Center,
        }
    }
}
