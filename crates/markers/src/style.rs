use scene::components::{Billboard, Label, LabelFill, VerticalOrigin};

/// Visual parameters shared by every placed marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub icon_scale: f32,
    pub font: String,
    pub outline_width: f32,
    /// Label offset above the icon, in pixels.
    pub label_offset_px: [f32; 2],
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            icon_scale: 0.5,
            font: "14pt sans-serif".to_string(),
            outline_width: 2.0,
            label_offset_px: [0.0, -30.0],
        }
    }
}

impl MarkerStyle {
    pub fn billboard(&self, icon: &str) -> Billboard {
        Billboard {
            image: icon.to_string(),
            scale: self.icon_scale,
            vertical_origin: VerticalOrigin::Bottom,
        }
    }

    pub fn label(&self, text: &str) -> Label {
        Label {
            text: text.to_string(),
            font: self.font.clone(),
            fill: LabelFill::FillAndOutline,
            outline_width: self.outline_width,
            vertical_origin: VerticalOrigin::Bottom,
            pixel_offset: self.label_offset_px,
        }
    }
}
