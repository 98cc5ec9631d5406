//! Control panel contents

use eframe::egui;

/// Request raised by the control panel for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    SetLocked(bool),
    LoadImage,
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn lock_label(locked: bool) -> String {
    format!("🔒 Locked: {}", yes_no(locked))
}

/// Draw the panel; returns at most one action per frame
pub fn show(ui: &mut egui::Ui, locked: bool, image_count: usize) -> Option<PanelAction> {
    let mut action = None;

    ui.vertical_centered_justified(|ui| {
        let mut checked = locked;
        let label = lock_label(checked);
        if ui
            .toggle_value(&mut checked, label)
            .on_hover_text("Let clicks pass through the overlay")
            .changed()
        {
            action = Some(PanelAction::SetLocked(checked));
        }

        ui.add_space(6.0);

        if ui.button("📂 Load image…").clicked() {
            action = Some(PanelAction::LoadImage);
        }

        ui.add_space(6.0);
        ui.label(
            egui::RichText::new(format!("{} image(s) loaded", image_count))
                .small()
                .color(egui::Color32::GRAY),
        );
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_label_reads_yes_or_no() {
        assert!(lock_label(true).ends_with("Yes"));
        assert!(lock_label(false).ends_with("No"));
    }

    #[test]
    fn idle_panel_raises_nothing() {
        let ctx = egui::Context::default();
        let mut action = Some(PanelAction::LoadImage);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = show(ui, false, 0);
            });
        });
        assert_eq!(action, None);
    }
}
