use std::path::PathBuf;

use hicolor_forge::builder;
use hicolor_forge::config::Config;

fn run(asset_dir: PathBuf) -> anyhow::Result<()> {
    let config = Config::load(&asset_dir)?;
    let report = builder::run_build(&config, &asset_dir, |msg| eprintln!("{}", msg))?;

    eprintln!(
        "Done: {} PNGs, {}x{} RGBA, {} glyphs",
        report.pngs.len(),
        report.rgba_dimensions.0,
        report.rgba_dimensions.1,
        report.catalog.len()
    );
    Ok(())
}

fn main() {
    let asset_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    if let Err(e) = run(asset_dir) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
