//! Control panel UI using egui.

use crate::config::DungeonConfig;

/// Data shown in the generation panel
pub struct PanelData {
    pub seed: u64,
    pub config: DungeonConfig,
    pub node_count: usize,
    pub room_count: usize,
    pub event_count: usize,
    pub revealed: usize,
}

/// Actions the UI wants to perform (returned to the application shell)
#[derive(Default)]
pub struct UiActions {
    pub regenerate: bool,
    pub reveal_all: bool,
}

/// Draw the generation panel. Returns any actions requested this frame.
pub fn draw_panel(
    ctx: &egui::Context,
    data: &PanelData,
    show_outlines: &mut bool,
) -> UiActions {
    let mut actions = UiActions::default();

    egui::Window::new("Dungeon")
        .fixed_pos([10.0, 10.0])
        .min_width(180.0)
        .title_bar(true)
        .collapsible(true)
        .show(ctx, |ui| {
            ui.label(format!("Seed: {}", data.seed));
            ui.label(format!(
                "Area: {}x{}",
                data.config.width, data.config.height
            ));
            ui.label(format!(
                "Leaf size: {}..{}",
                data.config.min_leaf_size, data.config.max_leaf_size
            ));
            ui.label(format!("Split chance: {:.2}", data.config.split_chance));

            ui.separator();

            ui.label(format!("Nodes: {}", data.node_count));
            ui.label(format!("Rooms: {}", data.room_count));
            ui.label(format!(
                "Corridor segments: {}",
                data.event_count - data.room_count
            ));
            ui.label(format!(
                "Revealed: {}/{}",
                data.revealed, data.event_count
            ));

            ui.separator();

            ui.checkbox(show_outlines, "Partition outlines");

            ui.horizontal(|ui| {
                if ui.button("Regenerate (R)").clicked() {
                    actions.regenerate = true;
                }
                if ui.button("Reveal all (Space)").clicked() {
                    actions.reveal_all = true;
                }
            });
        });

    actions
}
