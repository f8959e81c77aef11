//! Screen-space dimension labels, painted above the GL output

use egui::{Color32, FontId, LayerId, Order, Painter, Rect};

use shape_viewer_lib::annotations::{DimensionLabel, LabelStyle};
use shape_viewer_lib::scene::{LabelId, LabelRenderer, LabelSet};
use shape_viewer_lib::viewport::camera::ArcBallCamera;

/// [`LabelRenderer`] drawing through an egui foreground layer
pub struct LabelOverlay {
    ctx: egui::Context,
    labels: LabelSet,
    style: LabelStyle,
    /// Screen rectangle of the viewport, updated every frame
    rect: Rect,
    detached: bool,
}

impl LabelOverlay {
    pub fn new(ctx: egui::Context, style: LabelStyle) -> Self {
        Self {
            ctx,
            labels: LabelSet::default(),
            style,
            rect: Rect::NOTHING,
            detached: false,
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn set_style(&mut self, style: LabelStyle) {
        self.style = style;
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn painter(&self) -> Painter {
        let layer = LayerId::new(Order::Foreground, egui::Id::new("dimension_labels"));
        self.ctx.layer_painter(layer).with_clip_rect(self.rect)
    }
}

impl LabelRenderer for LabelOverlay {
    fn add_label(&mut self, label: &DimensionLabel) -> LabelId {
        self.labels.insert(label)
    }

    fn remove_label(&mut self, id: LabelId) {
        if self.labels.remove(id).is_none() {
            tracing::warn!("Removing unknown label {:?}", id);
        }
    }

    fn set_size(&mut self, size: egui::Vec2) {
        self.rect = Rect::from_min_size(self.rect.min, size);
    }

    fn render(&mut self, camera: &ArcBallCamera) {
        if self.detached || !self.rect.is_positive() {
            return;
        }
        let painter = self.painter();
        for label in self.labels.iter() {
            if let Some(screen) = camera.project(label.position, self.rect) {
                if self.rect.contains(screen) {
                    draw_label(&painter, screen, &label.text, &self.style);
                }
            }
        }
    }

    fn detach(&mut self) {
        self.detached = true;
        self.labels.clear();
    }
}

/// Centered text on a rounded background box
fn draw_label(painter: &Painter, center: egui::Pos2, text: &str, style: &LabelStyle) {
    let [r, g, b, a] = style.text_color;
    let text_color = Color32::from_rgba_unmultiplied(r, g, b, a);
    let [r, g, b, a] = style.background;
    let background = Color32::from_rgba_unmultiplied(r, g, b, a);

    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(style.font_size),
        text_color,
    );
    let text_rect = Rect::from_center_size(center, galley.size());
    painter.rect_filled(text_rect.expand(style.padding), 3.0, background);
    painter.galley(text_rect.min, galley, text_color);
}
