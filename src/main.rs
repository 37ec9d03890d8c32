use std::{env, path::PathBuf};

use eframe::{egui::ViewportBuilder, NativeOptions};

mod catalog;
mod filter;
mod gui;
mod layout;
mod lightbox;
mod load;
mod visibility;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Optional assets directory; defaults to ./assets next to the binary's cwd.
    let assets_root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"));

    let mut opts = NativeOptions::default();
    opts.viewport = ViewportBuilder::default()
        .with_inner_size([1280.0, 860.0])
        .with_title("Gallery");

    eframe::run_native(
        "Gallery",
        opts,
        Box::new(move |cc| Box::new(gui::GalleryApp::new(cc.egui_ctx.clone(), assets_root))),
    )
}
