/// Cosmetic per-slot emphasis derived from distance to the viewport center.
/// Purely presentational: reads nothing from the mode or the history, and is
/// computed by the renderer at most once per drawn frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotStyle {
    pub opacity: f64,
    pub scale: f64,
    pub focused: bool,
}

/// Fixed style for slots outside the fisheye window.
pub const UNFOCUSED: SlotStyle = SlotStyle {
    opacity: 0.3,
    scale: 0.95,
    focused: false,
};

/// Fisheye mapping: full emphasis at the center line, falling off linearly
/// to the unfocused style one slot height away.
pub fn style_for(distance: f64, slot_height: f64) -> SlotStyle {
    let distance = distance.abs();
    if distance < slot_height {
        let ratio = 1.0 - distance / slot_height;
        SlotStyle {
            opacity: 0.5 + ratio * 0.5,
            scale: 1.0 + ratio * 0.2,
            focused: ratio > 0.5,
        }
    } else {
        UNFOCUSED
    }
}

/// Distance from the center line to the middle of slot `index`.
pub fn slot_distance(center_line: f64, index: usize, slot_height: f64) -> f64 {
    let slot_center = (index as f64 + 0.5) * slot_height;
    (center_line - slot_center).abs()
}
