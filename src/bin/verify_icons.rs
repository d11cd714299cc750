use ext_icon_gen::raster::shade;
use ext_icon_gen::{Rgb, BRAND_COLOR, DEFAULT_SIZES};
use image::io::Reader as ImageReader;
use image::ColorType;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut argv = std::env::args().skip(1);
    let dir = argv.next().unwrap_or_else(|| "icons".to_string());
    let color = match argv.next().map(|c| c.parse::<Rgb>()) {
        Some(Ok(color)) => color,
        Some(Err(e)) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
        None => BRAND_COLOR,
    };

    println!("Checking icons in: {dir}");

    let mut failures = 0;
    for size in DEFAULT_SIZES {
        let path = Path::new(&dir).join(format!("icon{size}.png"));
        match verify_icon(&path, size, color) {
            Ok(()) => println!("✓ {} is a {size}x{size} RGB gradient", path.display()),
            Err(msg) => {
                println!("✗ {}: {msg}", path.display());
                failures += 1;
            }
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        println!("\n{failures} icon(s) failed verification");
        ExitCode::FAILURE
    }
}

fn verify_icon(path: &Path, size: u32, color: Rgb) -> Result<(), String> {
    let img = ImageReader::open(path)
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())?;

    if img.color() != ColorType::Rgb8 {
        return Err(format!("expected 8-bit RGB, found {:?}", img.color()));
    }
    if img.width() != size || img.height() != size {
        return Err(format!("expected {size}x{size}, found {}x{}", img.width(), img.height()));
    }

    let rgb = img.to_rgb8();
    let Rgb(r, g, b) = color;

    // Corners plus the center are enough to catch a wrong gradient
    let last = size - 1;
    for (x, y) in [(0, 0), (last, 0), (0, last), (last, last), (size / 2, size / 2)] {
        let expected = [shade(r, x, y, size), shade(g, x, y, size), shade(b, x, y, size)];
        let actual = rgb.get_pixel(x, y).0;
        if actual != expected {
            return Err(format!("pixel ({x}, {y}) is {actual:?}, expected {expected:?}"));
        }
    }
    Ok(())
}
