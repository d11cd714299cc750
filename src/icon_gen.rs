use crate::error::IconError;
use crate::manifest::ManifestIcons;
use crate::png::build_png_bytes;
use crate::raster::{IconSpec, Rgb, BRAND_COLOR};
use anyhow::{Context, Result};
use log::{info, warn};
use std::{
    fs::create_dir_all,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

// Define Args struct for library compilation
#[derive(Debug)]
pub struct Args {
    pub output: PathBuf,
    pub sizes: Vec<u32>,
    pub color: Option<String>,
    pub manifest: bool,
    pub manifest_out: Option<PathBuf>,
}

/// Result of generating one icon
#[derive(Debug)]
pub struct IconOutcome {
    pub size: u32,
    pub path: PathBuf,
    pub result: Result<(), IconError>,
}

impl IconOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Generate the icons described by `args` and report each one on stdout
///
/// Prints one `✓`/`✗` line per size, a summary line and, when requested, the
/// manifest.json `icons` fragment.
///
/// # Arguments
/// * `args` - Output directory, sizes, optional CSS color and manifest options
///
/// # Returns
/// * `Result<()>` - Ok even when some sizes failed; those are reported per size
///
/// # Errors
/// Returns an error if:
/// - The color is not a valid CSS color
/// - An icon cannot be expressed relative to the manifest directory
/// - The manifest fragment cannot be written
pub fn generate_icons(args: Args) -> Result<()> {
    let color = match &args.color {
        Some(color) => color.parse::<Rgb>()?,
        None => BRAND_COLOR,
    };

    let outcomes = write_icons(&args.output, &args.sizes, color);

    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("✓ Created {}", outcome.path.display()),
            Err(e) => println!("✗ Failed to create {}: {}", outcome.path.display(), e),
        }
    }

    let created = outcomes.iter().filter(|o| o.is_ok()).count();
    let failed = outcomes.len() - created;

    println!();
    if failed == 0 {
        println!("✅ Icon creation complete! ({created} created)");
    } else {
        println!("⚠ Icon creation finished with errors: {created} created, {failed} failed");
    }

    if args.manifest || args.manifest_out.is_some() {
        // The manifest sits at the extension root, next to --manifest-out or in the cwd
        let root = match args.manifest_out.as_deref().and_then(Path::parent) {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let manifest = ManifestIcons::from_outcomes(root, &outcomes)?;
        let json = manifest.to_json_pretty()?;
        if args.manifest {
            println!("\nmanifest.json \"icons\":");
            println!("{json}");
        }
        if let Some(path) = &args.manifest_out {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Wrote manifest icons to {}", path.display());
        }
    }

    if created > 0 {
        println!("\nNext steps:");
        println!("1. Go to chrome://extensions/");
        println!("2. Click the refresh icon on the extension");
        println!("3. Icons should now display correctly!");
    }

    Ok(())
}

/// Write one gradient icon per size into `out_dir`.
///
/// Every size is attempted in order; a failure for one size is recorded in its
/// outcome and does not stop the others.
pub fn write_icons(out_dir: &Path, sizes: &[u32], color: Rgb) -> Vec<IconOutcome> {
    let dir_result = create_dir_all(out_dir);

    sizes
        .iter()
        .map(|&size| {
            let path = out_dir.join(format!("icon{size}.png"));
            let result = match &dir_result {
                Ok(()) => write_icon(&path, size, color),
                Err(e) => Err(IconError::io(
                    out_dir,
                    std::io::Error::new(e.kind(), e.to_string()),
                )),
            };

            match &result {
                Ok(()) => info!("wrote {}", path.display()),
                Err(e) => warn!("icon{size}: {e}"),
            }

            IconOutcome { size, path, result }
        })
        .collect()
}

fn write_icon(path: &Path, size: u32, color: Rgb) -> Result<(), IconError> {
    let spec = IconSpec::new(size, color)?;
    let png = build_png_bytes(&spec)?;
    write_png_atomic(path, &png)
}

/// Write `bytes` to `path` all-or-nothing
///
/// The data goes to a temporary file in the same directory which is synced and
/// then renamed over `path`, so `path` holds either its old contents or all of
/// `bytes`.
///
/// # Arguments
/// * `path` - Destination file, overwritten if it exists
/// * `bytes` - Complete file contents
///
/// # Errors
/// Returns `IconError::Io` with the offending path if:
/// - The temporary file cannot be created in the destination directory
/// - Writing or syncing the temporary file fails
/// - The rename onto `path` fails (e.g. `path` is a directory)
pub fn write_png_atomic(path: &Path, bytes: &[u8]) -> Result<(), IconError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| IconError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| IconError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| IconError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| IconError::io(path, e.error))?;
    Ok(())
}
