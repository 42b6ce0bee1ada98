use super::VerticalOrigin;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LabelFill {
    #[default]
    Fill,
    Outline,
    FillAndOutline,
}

/// Screen-aligned text drawn at the entity position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub font: String,
    pub fill: LabelFill,
    pub outline_width: f32,
    pub vertical_origin: VerticalOrigin,
    /// Offset from the anchor in pixels (x right, y down).
    pub pixel_offset: [f32; 2],
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: "14px sans-serif".to_string(),
            fill: LabelFill::Fill,
            outline_width: 1.0,
            vertical_origin: VerticalOrigin::Center,
            pixel_offset: [0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Label, LabelFill};

    #[test]
    fn new_label_keeps_text() {
        let label = Label::new("road 1");
        assert_eq!(label.text, "road 1");
        assert_eq!(label.fill, LabelFill::Fill);
    }
}
