//! Overlay window and control panel, rendered with egui

use crate::cli::Args;
use crate::dialogs;
use crate::panel::{self, PanelAction};
use crate::platform::{self, NativeHooks};
use crate::state::{gesture_for_press, Gesture};
use eframe::egui;
use log::{info, warn};
use overlay::scene::WHEEL_DELTA;
use overlay::{ImageId, LockState, OverlayResult, Point, Scene, WindowStyleController};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Grab radius of a rotate thumb, in points
const HANDLE_RADIUS: f32 = 8.0;

/// Cursor polling interval while clicks pass through the overlay
const HOVER_POLL: Duration = Duration::from_millis(50);

/// Convert an egui scroll delta into wheel units (`WHEEL_DELTA` per detent).
///
/// egui scales each detent by `line_scroll_speed` points.
fn wheel_units(scroll_points: f32, line_scroll_speed: f32) -> f64 {
    if line_scroll_speed <= 0.0 || !line_scroll_speed.is_finite() {
        return 0.0;
    }
    (scroll_points / line_scroll_speed) as f64 * WHEEL_DELTA
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

fn to_pos(p: Point) -> egui::Pos2 {
    egui::pos2(p.x as f32, p.y as f32)
}

fn report(result: OverlayResult<()>) {
    if let Err(e) = result {
        warn!("{}", e);
    }
}

/// Pointer state sampled once per frame
struct PointerFrame {
    pos: Option<egui::Pos2>,
    pressed: bool,
    down: bool,
    released: bool,
    double_clicked: bool,
    delta: egui::Vec2,
    scroll: f32,
    line_scroll_speed: f32,
    ctrl: bool,
}

impl PointerFrame {
    fn sample(ctx: &egui::Context) -> Self {
        let line_scroll_speed = ctx.options(|o| o.line_scroll_speed);
        ctx.input(|i| Self {
            pos: i.pointer.latest_pos(),
            pressed: i.pointer.primary_pressed(),
            down: i.pointer.primary_down(),
            released: i.pointer.primary_released(),
            double_clicked: i.pointer.button_double_clicked(egui::PointerButton::Primary),
            delta: i.pointer.delta(),
            scroll: i.raw_scroll_delta.y,
            line_scroll_speed,
            ctrl: i.modifiers.ctrl,
        })
    }
}

/// Main application using egui
pub struct ImgOverlayApp {
    scene: Scene,
    textures: Vec<egui::TextureHandle>,
    lock: LockState,
    /// Value of the panel's lock toggle
    lock_toggle: bool,
    controller: Option<Box<dyn WindowStyleController>>,
    hwnd: isize,
    _hooks: Option<NativeHooks>,
    gesture: Gesture,
    startup_images: Vec<PathBuf>,
    position_guard: bool,
}

impl ImgOverlayApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, args: Args) -> Self {
        Self {
            scene: Scene::new(),
            textures: Vec::new(),
            lock: LockState::new(),
            lock_toggle: args.locked,
            controller: None,
            hwnd: 0,
            _hooks: None,
            gesture: Gesture::Idle,
            startup_images: args.images,
            position_guard: !args.no_position_guard,
        }
    }

    /// First frame: the native window exists now
    fn on_window_loaded(&mut self, ctx: &egui::Context, frame: &eframe::Frame) {
        let hwnd = platform::native_handle(frame);
        self.hwnd = hwnd;
        if hwnd == 0 {
            warn!("overlay has no native handle; using portable passthrough");
        }

        self._hooks = Some(platform::attach(ctx, hwnd, self.position_guard));
        self.controller = Some(platform::style_controller(ctx, hwnd));

        // Match the toggle from the first frame.
        self.set_locked(self.lock_toggle);

        for path in std::mem::take(&mut self.startup_images) {
            self.load_image(&path);
        }
    }

    fn set_locked(&mut self, locked: bool) {
        self.lock_toggle = locked;
        if let Some(controller) = self.controller.as_mut() {
            let _ = self.lock.set_locked(locked, &mut **controller);
        }
        if locked {
            self.cancel_gesture();
        }
    }

    fn load_image(&mut self, path: &Path) {
        if let Err(e) = self.scene.load_image(path) {
            dialogs::show_load_error(&e);
        }
    }

    fn pick_and_load(&mut self) {
        match dialogs::pick_image() {
            Some(path) => self.load_image(&path),
            None => info!("load cancelled"),
        }
    }

    /// Textures may be downscaled to fit the GPU; quads keep the natural size.
    fn upload_textures(&mut self, ctx: &egui::Context) {
        let max_side = ctx.input(|i| i.max_texture_side).min(u32::MAX as usize) as u32;
        for (id, entry) in self.scene.iter().skip(self.textures.len()) {
            let (width, height, pixels) = entry.image.texture_pixels(max_side);
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [width as usize, height as usize],
                &pixels,
            );
            let texture = ctx.load_texture(format!("image-{}", id.0), image, egui::TextureOptions::LINEAR);
            self.textures.push(texture);
        }
    }

    /// Unlocked: clicks pass through except over images and thumbs
    fn track_hover(&mut self, ctx: &egui::Context) {
        if !platform::tracks_cursor(self.hwnd) || self.gesture.is_active() {
            return;
        }
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        let over_content = platform::cursor_pos(ctx, self.hwnd)
            .map(to_point)
            .is_some_and(|p| {
                self.scene.hit_test(p).is_some()
                    || self.scene.rotate_handle_at(p, HANDLE_RADIUS as f64).is_some()
            });
        report(self.lock.update_hover(over_content, &mut **controller));

        // egui sees no pointer events while passing through
        ctx.request_repaint_after(HOVER_POLL);
    }

    fn cancel_gesture(&mut self) {
        if matches!(self.gesture, Gesture::Rotating(_)) {
            self.scene.end_rotate();
        }
        self.gesture = Gesture::Idle;
    }

    fn handle_pointer(&mut self, ctx: &egui::Context) {
        let input = PointerFrame::sample(ctx);
        let pointer = input.pos.map(to_point);
        let handle_radius = HANDLE_RADIUS as f64;

        if input.double_clicked {
            if let Some(id) = pointer.and_then(|p| self.scene.rotate_handle_at(p, handle_radius)) {
                report(self.scene.double_click_rotate_reset(id));
            }
        }

        if input.pressed {
            self.cancel_gesture();
            if let Some(p) = pointer {
                self.gesture = gesture_for_press(
                    self.scene.rotate_handle_at(p, handle_radius),
                    self.scene.hit_test(p),
                );
                if let Gesture::Rotating(id) = self.gesture {
                    report(self.scene.begin_rotate(id));
                }
            }
        } else if input.down {
            match (self.gesture, pointer) {
                (Gesture::Moving(id), _) if input.delta != egui::Vec2::ZERO => {
                    self.drag_move(id, input.delta);
                }
                (Gesture::Rotating(id), Some(p)) => report(self.scene.drag_rotate(id, p)),
                _ => {}
            }
        }

        if input.released || (!input.down && self.gesture.is_active()) {
            self.cancel_gesture();
        }

        if input.scroll != 0.0 {
            if let Some(id) = pointer.and_then(|p| self.scene.hit_test(p)) {
                let wheel = wheel_units(input.scroll, input.line_scroll_speed);
                report(self.scene.scroll_adjust(id, wheel, input.ctrl));
            }
        }

        self.update_cursor(ctx, pointer);
    }

    /// Screen-space drag, converted into the image frame the way a thumb reports it
    fn drag_move(&mut self, id: ImageId, delta: egui::Vec2) {
        let Some(entry) = self.scene.get(id) else {
            return;
        };
        let local = entry
            .transform
            .to_local_vector(Point::new(delta.x as f64, delta.y as f64));
        report(self.scene.drag_move(id, local));
    }

    fn update_cursor(&self, ctx: &egui::Context, pointer: Option<Point>) {
        let icon = match self.gesture {
            Gesture::Moving(_) => egui::CursorIcon::Grabbing,
            Gesture::Rotating(_) => egui::CursorIcon::Alias,
            Gesture::Idle => match pointer {
                Some(p) if self.scene.rotate_handle_at(p, HANDLE_RADIUS as f64).is_some() => {
                    egui::CursorIcon::Alias
                }
                Some(p) if self.scene.hit_test(p).is_some() => egui::CursorIcon::Grab,
                _ => return,
            },
        };
        ctx.set_cursor_icon(icon);
    }

    fn paint_scene(&self, painter: &egui::Painter) {
        let show_handles = self.lock.hit_test_visible();

        for ((id, entry), texture) in self.scene.iter().zip(&self.textures) {
            let [tl, tr, bl, br] = entry.corners().map(to_pos);
            let tint = egui::Color32::WHITE.gamma_multiply(entry.transform.opacity as f32);

            let mut mesh = egui::Mesh::with_texture(texture.id());
            mesh.vertices.push(egui::epaint::Vertex { pos: tl, uv: egui::pos2(0.0, 0.0), color: tint });
            mesh.vertices.push(egui::epaint::Vertex { pos: tr, uv: egui::pos2(1.0, 0.0), color: tint });
            mesh.vertices.push(egui::epaint::Vertex { pos: bl, uv: egui::pos2(0.0, 1.0), color: tint });
            mesh.vertices.push(egui::epaint::Vertex { pos: br, uv: egui::pos2(1.0, 1.0), color: tint });
            mesh.indices.extend_from_slice(&[0, 1, 2, 1, 3, 2]);
            painter.add(egui::Shape::mesh(mesh));

            if show_handles {
                let active = self.gesture.image() == Some(id);
                let fill = if active {
                    egui::Color32::from_rgb(255, 136, 0)
                } else {
                    egui::Color32::from_rgb(0, 136, 255)
                };
                painter.circle(
                    tr,
                    HANDLE_RADIUS - 2.0,
                    fill,
                    egui::Stroke::new(1.5, egui::Color32::WHITE),
                );
            }
        }
    }

    fn show_control_panel(&mut self, ctx: &egui::Context) {
        let locked = self.lock_toggle;
        let count = self.scene.len();

        let action = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("control_panel"),
            egui::ViewportBuilder::default()
                .with_title("ImgOverlay")
                .with_inner_size([220.0, 120.0])
                .with_resizable(false)
                .with_always_on_top(),
            |ctx, class| {
                if ctx.input(|i| i.viewport().close_requested()) {
                    info!("control panel closed; shutting down");
                    ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close);
                }

                if matches!(class, egui::ViewportClass::Embedded) {
                    egui::Window::new("ImgOverlay")
                        .resizable(false)
                        .show(ctx, |ui| panel::show(ui, locked, count))
                        .and_then(|r| r.inner.flatten())
                } else {
                    egui::CentralPanel::default()
                        .show(ctx, |ui| panel::show(ui, locked, count))
                        .inner
                }
            },
        );

        match action {
            Some(PanelAction::SetLocked(locked)) => self.set_locked(locked),
            Some(PanelAction::LoadImage) => self.pick_and_load(),
            None => {}
        }
    }
}

impl eframe::App for ImgOverlayApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if self.controller.is_none() {
            self.on_window_loaded(ctx, frame);
        }

        self.upload_textures(ctx);

        if self.lock.hit_test_visible() {
            self.track_hover(ctx);
            self.handle_pointer(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.paint_scene(ui.painter()));

        self.show_control_panel(ctx);
    }
}
