use std::{path::PathBuf, time::Instant};

use block_decompression::{load, DecodeSettings, MipMap, Texture};
use image::{ColorType, DynamicImage};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (settings, file_name) = match parse_args() {
        Some(args) => args,
        None => return,
    };

    let bytes = std::fs::read(&file_name).expect("can't read input file");

    let start = Instant::now();

    let texture = match load(&bytes, &settings) {
        Ok(texture) => texture,
        Err(error) => {
            tracing::error!(%error, file = %file_name, "failed to decode texture");
            std::process::exit(1);
        }
    };

    let duration = start.elapsed();
    tracing::info!(
        "Decoding took: {:.3} ms",
        duration.as_secs_f64() * 1000.0
    );

    log_topology(&texture);

    let start = Instant::now();

    for (level, mip) in first_chain(&texture).into_iter().enumerate() {
        write_png(&file_name, level, mip);
    }

    let duration = start.elapsed();
    tracing::info!(
        "PNG output to disk took: {:.3} ms",
        duration.as_secs_f64() * 1000.0
    );
}

fn log_topology(texture: &Texture) {
    let Some(mip) = texture.first_mip() else {
        return;
    };

    let topology = match texture {
        Texture::Flat(_) => "flat".to_string(),
        Texture::Cubemap(cubemap) => format!("cube map with {} faces", cubemap.faces.len()),
        Texture::Volume(volume) => format!("volume with depth {}", volume.depth),
        Texture::Array(elements) => format!("array of {} elements", elements.len()),
    };

    tracing::info!(
        width = mip.width,
        height = mip.height,
        format = ?mip.format,
        layout = ?mip.layout,
        surfaces = texture.surfaces().len(),
        "{topology}"
    );
}

/// The mip chain of the first face or array element, or the first slice of
/// every volume level.
fn first_chain(texture: &Texture) -> Vec<&MipMap> {
    match texture {
        Texture::Flat(texture) => texture.mipmaps.iter().collect(),
        Texture::Cubemap(cubemap) => cubemap
            .faces
            .first()
            .map(|(_, texture)| texture.mipmaps.iter().collect())
            .unwrap_or_default(),
        Texture::Volume(volume) => volume
            .levels
            .iter()
            .filter_map(|slices| slices.first())
            .collect(),
        Texture::Array(elements) => elements
            .first()
            .map(|texture| texture.mipmaps.iter().collect())
            .unwrap_or_default(),
    }
}

fn write_png(file_name: &str, level: usize, mip: &MipMap) {
    let image = mip.to_image().expect("decoded size doesn't match the mip dimensions");

    // PNG has no float samples.
    let image = match image.color() {
        ColorType::Rgb32F | ColorType::Rgba32F => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => image,
    };

    let input = PathBuf::from(file_name);
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "texture".to_string());
    let png_name = input.with_file_name(format!("{stem}_mip{level}.png"));

    image.save(&png_name).expect("failed to write PNG file");
    tracing::debug!(file = %png_name.display(), "wrote mip level {level}");
}

fn print_help() {
    println!("Usage: decompressor [--top-level] <input_file>");
    println!("\nReads a DDS, KTX or KTX2 texture and writes every mip level of its");
    println!("first surface as <input_stem>_mip<N>.png next to the input file.");
    println!("\nOptions:");
    println!("  --top-level  - only decode the largest mip level");
}

fn parse_args() -> Option<(DecodeSettings, String)> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.contains(&"--help".to_string()) {
        print_help();
        return None;
    }

    let (settings, file_name) = match args.as_slice() {
        [file_name] => (DecodeSettings::all_levels(), file_name),
        [flag, file_name] if flag == "--top-level" => (DecodeSettings::top_level(), file_name),
        _ => {
            println!("Error: Invalid arguments");
            print_help();
            return None;
        }
    };

    Some((settings, file_name.clone()))
}
