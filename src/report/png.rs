use crate::report::raster::Raster;
use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Encodes the raster as an 8-bit RGB PNG.
pub fn encode(img: &Raster) -> Result<Vec<u8>> {
    let width = u32::try_from(img.width()).with_context(|| "raster too wide for png")?;
    let height = u32::try_from(img.height()).with_context(|| "raster too tall for png")?;
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(img.as_bytes(), width, height, ExtendedColorType::Rgb8)
        .with_context(|| "png encoding failed")?;
    Ok(out)
}

pub fn data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Writes next to the target and renames into place; the temp file never outlives a failure.
pub fn write(path: &Path, png: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid output path {}", path.display()))?;
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name));

    let result = File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))
        .and_then(|mut file| {
            file.write_all(png)
                .with_context(|| format!("failed to write {}", tmp_path.display()))?;
            file.sync_all()
                .with_context(|| format!("failed to flush {}", tmp_path.display()))
        });

    match result.and_then(|_| {
        fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to move png to {}", path.display()))
    }) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}
