use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui};

use crate::trust::{GraphSnapshot, PositionMap};

const BACKGROUND: Color32 = Color32::from_rgb(0x20, 0x20, 0x20);
const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(0x70, 0x70, 0x70, 0x80);
const PEER_FILL: Color32 = Color32::from_rgba_premultiplied(0x70, 0x70, 0x70, 0x80);
const PEER_EDGE: Color32 = Color32::from_rgb(0xab, 0xab, 0xab);
const ROOT_COLOR: Color32 = Color32::from_rgb(0xe6, 0x73, 0x00);
const TITLE_COLOR: Color32 = Color32::from_rgb(0xe0, 0xe0, 0xe0);

const MARGIN: f32 = 24.0;
const PEER_RADIUS: f32 = 6.0;
const ROOT_RADIUS: f32 = 12.0;

pub(super) fn draw_trust_graph(ui: &mut Ui, view: Option<(&GraphSnapshot, &PositionMap)>) {
    let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, BACKGROUND);

    let Some((snapshot, positions)) = view else {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Realtime view of your Trust Graph",
            FontId::proportional(16.0),
            TITLE_COLOR,
        );
        return;
    };

    let to_screen = |&(x, y): &(f64, f64)| unit_to_screen(rect, x, y);

    for (source, target) in &snapshot.edges {
        let (Some(start), Some(end)) = (positions.get(source), positions.get(target)) else {
            continue;
        };
        painter.line_segment(
            [to_screen(start), to_screen(end)],
            Stroke::new(0.5, EDGE_COLOR),
        );
    }

    for id in &snapshot.node_ids {
        if *id == snapshot.root_id {
            continue;
        }
        let Some(pos) = positions.get(id) else {
            continue;
        };
        painter.circle(to_screen(pos), PEER_RADIUS, PEER_FILL, Stroke::new(1.0, PEER_EDGE));
    }

    if let Some(pos) = positions.get(&snapshot.root_id) {
        let center = to_screen(pos);
        painter.circle(center, ROOT_RADIUS, ROOT_COLOR, Stroke::new(1.0, ROOT_COLOR));
        painter.text(
            center,
            Align2::CENTER_CENTER,
            "You",
            FontId::proportional(9.0),
            Color32::WHITE,
        );
    }
}

// The service emits layout coordinates in [0,1] with y pointing up.
fn unit_to_screen(rect: Rect, x: f64, y: f64) -> Pos2 {
    let inner = rect.shrink(MARGIN);
    Pos2::new(
        inner.left() + (x as f32).clamp(0.0, 1.0) * inner.width(),
        inner.bottom() - (y as f32).clamp(0.0, 1.0) * inner.height(),
    )
}
