use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use eframe::{egui, egui::TextureHandle, App};
use log::{debug, info};

use crate::catalog::{AssetVariant, Category, CATALOG};
use crate::filter::{self, FilterCriteria};
use crate::layout::{self, LayoutMode};
use crate::lightbox::{Lightbox, SwipeNav, SwipeState};
use crate::load::{self, ImgMsg, JobMsg, TileKey};
use crate::visibility::VisibilityTracker;

/* ───────────────────────── UI tuneables ─────────────────────────── */

const UPLOADS_PER_FRAME: usize = 4;
const TILE_GAP_PX: f32 = 12.0;
const REVEAL_FADE_SECS: f32 = 0.35;
const PLACEHOLDER_ASPECT: f32 = 0.75; // h/w until the decode lands
const LIGHTBOX_MARGIN_PX: f32 = 64.0;

#[inline]
fn uv_full() -> egui::Rect {
    egui::Rect::from_min_max(egui::Pos2::ZERO, egui::pos2(1.0, 1.0))
}

/* ───────────────────────── app state ────────────────────────────── */

pub struct GalleryApp {
    // form state (live) vs. displayed set (updated on submit only)
    criteria: FilterCriteria,
    displayed: Vec<usize>,
    show_filter_menu: bool,

    layout_mode: LayoutMode,
    columns: usize,
    grid_variant: AssetVariant,

    tracker: VisibilityTracker,
    lightbox: Lightbox,
    swipe: SwipeState,

    // decode pipeline
    textures: HashMap<TileKey, TextureHandle>,
    qstate: load::QueueState,
    img_rx: Receiver<ImgMsg>,
    job_tx: Sender<JobMsg>,
    current_gen: Arc<AtomicU64>,
}

impl GalleryApp {
    pub fn new(egui_ctx: egui::Context, assets_root: PathBuf) -> Self {
        let (img_tx, img_rx) = bounded::<ImgMsg>(load::IMG_CHAN_CAP);
        let (job_tx, job_rx) = bounded::<JobMsg>(load::MAX_ENQUEUED_JOBS);
        let current_gen = Arc::new(AtomicU64::new(1));

        info!("assets root: {}", assets_root.display());
        load::start_decoder_workers(
            assets_root,
            job_rx,
            img_tx,
            egui_ctx,
            current_gen.clone(),
        );

        Self {
            criteria: FilterCriteria::default(),
            displayed: (0..CATALOG.len()).collect(),
            show_filter_menu: false,

            layout_mode: LayoutMode::Wide,
            columns: 3,
            grid_variant: AssetVariant::Full,

            tracker: VisibilityTracker::default(),
            lightbox: Lightbox::default(),
            swipe: SwipeState::default(),

            textures: HashMap::new(),
            qstate: load::QueueState::default(),
            img_rx,
            job_tx,
            current_gen,
        }
    }

    /// Apply the form to the displayed set. Submit-triggered only;
    /// typing and checkbox toggling never recompute on their own.
    fn apply_filter(&mut self) {
        self.displayed = filter::compute_displayed_set(CATALOG, &self.criteria);
        self.lightbox.revalidate(CATALOG, &self.displayed);
        debug!(
            "filter applied: {} of {} items displayed",
            self.displayed.len(),
            CATALOG.len()
        );
    }

    /// Drop every texture and re-decode from disk. In-flight jobs are
    /// invalidated by the generation bump.
    fn reload_assets(&mut self) {
        self.current_gen.fetch_add(1, Ordering::Relaxed);
        self.qstate.clear();
        self.textures.clear();
        info!("reloading assets");
    }

    /// Request decodes for everything the current frame wants to show.
    fn enqueue_wanted(&mut self) {
        let gen = self.current_gen.load(Ordering::Relaxed);
        for &catalog_idx in &self.displayed {
            self.qstate
                .try_enqueue_unique(&self.job_tx, gen, (catalog_idx, self.grid_variant));
        }
        // The overlay always shows the full rendition.
        if let Some(name) = self.lightbox.selected() {
            if let Some(idx) = CATALOG.iter().position(|i| i.name == name) {
                self.qstate
                    .try_enqueue_unique(&self.job_tx, gen, (idx, AssetVariant::Full));
            }
        }
    }

    fn drain_decoded(&mut self, ctx: &egui::Context) {
        let mut uploaded = 0usize;
        while uploaded < UPLOADS_PER_FRAME {
            let msg = match self.img_rx.try_recv() {
                Ok(msg) => msg,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            if self.qstate.seen.contains(&msg.key) {
                continue;
            }

            let name = CATALOG[msg.key.0].name;
            let tex = ctx.load_texture(
                format!("{name}{}", msg.key.1.suffix()),
                egui::ColorImage::from_rgba_unmultiplied([msg.width, msg.height], &msg.rgba),
                egui::TextureOptions::LINEAR,
            );
            self.textures.insert(msg.key, tex);
            self.qstate.mark_seen(msg.key);
            uploaded += 1;
        }
        if uploaded > 0 {
            ctx.request_repaint();
        }
    }

    /* ───────────────────── grid rendering ───────────────────────── */

    fn draw_tile(&mut self, ui: &mut egui::Ui, tile: usize) {
        let catalog_idx = self.displayed[tile];
        let item = &CATALOG[catalog_idx];
        let key = (catalog_idx, self.grid_variant);

        let width = ui.available_width();
        let size = match self.textures.get(&key) {
            Some(tex) => {
                let ts = tex.size_vec2();
                egui::vec2(width, width * ts.y / ts.x.max(1.0))
            }
            None => egui::vec2(width, width * PLACEHOLDER_ASPECT),
        };

        let (rect, resp) = ui.allocate_exact_size(size, egui::Sense::click());

        // One observation per frame; the tracker keeps it idempotent.
        let ratio = intersection_ratio(rect, ui.clip_rect());
        self.tracker.observe(tile, ratio);

        let reveal = ui.ctx().animate_bool_with_time(
            egui::Id::new(("reveal", self.tracker.generation(), tile)),
            self.tracker.is_active(tile),
            REVEAL_FADE_SECS,
        );

        if ui.is_rect_visible(rect) {
            let painter = ui.painter().with_clip_rect(ui.clip_rect());
            match self.textures.get(&key) {
                Some(tex) => painter.image(
                    tex.id(),
                    rect,
                    uv_full(),
                    egui::Color32::from_white_alpha((reveal * 255.0).round() as u8),
                ),
                None => painter.rect_filled(
                    rect,
                    egui::Rounding::same(4.0),
                    egui::Color32::from_gray(38),
                ),
            };
        }

        let resp = resp.on_hover_text(item.name);
        if resp.clicked() {
            self.lightbox.open(CATALOG, &self.displayed, item.name);
        }

        // The denser layouts carry the tag strip under each tile.
        if self.layout_mode == LayoutMode::Medium
            || (self.layout_mode == LayoutMode::Wide && self.columns == 3)
        {
            ui.label(
                egui::RichText::new(item.tags.join(" · "))
                    .small()
                    .weak(),
            );
        }
        ui.add_space(TILE_GAP_PX);
    }

    fn draw_grid(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.displayed.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No images match the current filter.");
                });
                return;
            }

            let partition = layout::partition_columns(self.displayed.len(), self.columns);
            egui::ScrollArea::vertical()
                .auto_shrink(false)
                .show(ui, |ui| {
                    ui.columns(self.columns, |cols| {
                        for (col_idx, tiles) in partition.iter().enumerate() {
                            for &tile in tiles {
                                self.draw_tile(&mut cols[col_idx], tile);
                            }
                        }
                    });
                });
        });
    }

    /* ───────────────────── lightbox overlay ─────────────────────── */

    fn draw_lightbox(&mut self, ctx: &egui::Context) {
        if !self.lightbox.is_open() {
            return;
        }
        let screen = ctx.screen_rect();

        egui::Area::new(egui::Id::new("lightbox"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let backdrop = ui.allocate_rect(screen, egui::Sense::click_and_drag());
                let painter = ui.painter().with_clip_rect(screen);
                painter.rect_filled(screen, 0.0, egui::Color32::from_black_alpha(230));

                let catalog_idx = self
                    .lightbox
                    .selected()
                    .and_then(|name| CATALOG.iter().position(|i| i.name == name));

                if let Some(idx) = catalog_idx {
                    match self.textures.get(&(idx, AssetVariant::Full)) {
                        Some(tex) => {
                            let ts = tex.size_vec2();
                            let avail = screen.shrink(LIGHTBOX_MARGIN_PX);
                            let fit = (avail.width() / ts.x)
                                .min(avail.height() / ts.y)
                                .min(1.0);
                            let rect =
                                egui::Rect::from_center_size(screen.center(), ts * fit);
                            painter.image(tex.id(), rect, uv_full(), egui::Color32::WHITE);
                        }
                        None => {
                            painter.text(
                                screen.center(),
                                egui::Align2::CENTER_CENTER,
                                "Loading…",
                                egui::FontId::proportional(16.0),
                                egui::Color32::GRAY,
                            );
                        }
                    }
                }

                if let Some((pos, total)) = self.lightbox.counter(CATALOG, &self.displayed) {
                    painter.text(
                        screen.min + egui::vec2(16.0, 14.0),
                        egui::Align2::LEFT_TOP,
                        format!("{pos}/{total}"),
                        egui::FontId::proportional(18.0),
                        egui::Color32::WHITE,
                    );
                }

                let close_rect = egui::Rect::from_min_size(
                    egui::pos2(screen.max.x - 76.0, screen.min.y + 12.0),
                    egui::vec2(64.0, 28.0),
                );
                if ui.put(close_rect, egui::Button::new("Close")).clicked() {
                    self.lightbox.close();
                }

                let prev_rect = egui::Rect::from_center_size(
                    egui::pos2(screen.min.x + 52.0, screen.center().y),
                    egui::vec2(72.0, 32.0),
                );
                let next_rect = egui::Rect::from_center_size(
                    egui::pos2(screen.max.x - 52.0, screen.center().y),
                    egui::vec2(72.0, 32.0),
                );
                if ui.put(prev_rect, egui::Button::new("< Prev")).clicked() {
                    self.lightbox.previous(CATALOG, &self.displayed);
                }
                if ui.put(next_rect, egui::Button::new("Next >")).clicked() {
                    self.lightbox.next(CATALOG, &self.displayed);
                }

                // Drag-to-swipe: start x at press, latest x while moving,
                // evaluated on release.
                if backdrop.drag_started() {
                    if let Some(p) = backdrop.interact_pointer_pos() {
                        self.swipe.begin(p.x);
                    }
                }
                if backdrop.dragged() {
                    if let Some(p) = backdrop.interact_pointer_pos() {
                        self.swipe.update(p.x);
                    }
                }
                if backdrop.drag_stopped() {
                    match self.swipe.finish() {
                        Some(SwipeNav::Next) => self.lightbox.next(CATALOG, &self.displayed),
                        Some(SwipeNav::Previous) => {
                            self.lightbox.previous(CATALOG, &self.displayed)
                        }
                        None => {}
                    }
                }
            });
    }
}

/* ─────────────────── eframe integration ───────────────────────── */

impl App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        use egui::Key;

        // 1) Drain decoded images → upload textures
        self.drain_decoded(ctx);

        // 2) Hotkeys are scoped to the frames the lightbox is open
        if self.lightbox.is_open() {
            let (right, left, escape) = ctx.input(|i| {
                (
                    i.key_pressed(Key::ArrowRight),
                    i.key_pressed(Key::ArrowLeft),
                    i.key_pressed(Key::Escape),
                )
            });
            if right {
                self.lightbox.next(CATALOG, &self.displayed);
            }
            if left {
                self.lightbox.previous(CATALOG, &self.displayed);
            }
            if escape {
                self.lightbox.close();
            }
        }

        // 3) Header: search form + filter menu
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Gallery");
                ui.separator();

                let search = ui.add(
                    egui::TextEdit::singleline(&mut self.criteria.tag_query)
                        .hint_text("Tags")
                        .desired_width(200.0),
                );
                let submitted = ui.button("Search").clicked()
                    || (search.lost_focus()
                        && ui.input(|i| i.key_pressed(Key::Enter)));

                if ui
                    .selectable_label(self.show_filter_menu, "Filter")
                    .clicked()
                {
                    self.show_filter_menu = !self.show_filter_menu;
                }

                if submitted {
                    self.apply_filter();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Reload").clicked() {
                        self.reload_assets();
                    }
                });
            });

            if self.show_filter_menu {
                ui.horizontal(|ui| {
                    ui.label("Filter options:");
                    for category in Category::all() {
                        ui.checkbox(
                            self.criteria.categories.flag_mut(category),
                            category.label(),
                        );
                    }
                });
            }
            ui.add_space(4.0);
        });

        // 4) Layout is a pure function of the current window width
        let width = ctx.screen_rect().width();
        self.layout_mode = layout::select_layout(width);
        self.columns = layout::column_count(self.layout_mode, self.displayed.len());
        self.grid_variant = layout::asset_variant(self.layout_mode, self.columns);

        // 5) Epoch sync before any observation this frame
        self.tracker.sync_epoch(self.layout_mode, &self.displayed);

        // 6) Schedule decodes for whatever this frame will show
        self.enqueue_wanted();

        // 7) Status bar
        egui::TopBottomPanel::bottom("stats").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} / {} images",
                    self.displayed.len(),
                    CATALOG.len()
                ));
                ui.separator();
                ui.label(format!(
                    "{} · {} column{}",
                    self.layout_mode.label(),
                    self.columns,
                    if self.columns == 1 { "" } else { "s" }
                ));
            });
        });

        // 8) Grid, then the overlay on top
        self.draw_grid(ctx);
        self.draw_lightbox(ctx);
    }
}

/* ───────────────────────── helpers ──────────────────────────── */

fn intersection_ratio(rect: egui::Rect, viewport: egui::Rect) -> f32 {
    let area = rect.area();
    if area <= 0.0 {
        return 0.0;
    }
    let inter = rect.intersect(viewport);
    if inter.is_negative() {
        0.0
    } else {
        inter.area() / area
    }
}
