//! Poster storage under the media root.
//!
//! Posters for concert `N` live in `{media_root}/posters/concert_N/`. Stored
//! paths are relative to the media root, which is also served at `/media/`.

use std::io;
use std::path::{Path, PathBuf};

use image::ImageFormat;

const ACCEPTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Reduce a client-supplied file name to its final path component.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Some(last.to_string())
}

pub fn poster_dir(concert_id: i32) -> PathBuf {
    PathBuf::from("posters").join(format!("concert_{}", concert_id))
}

/// `posters/concert_{id}/{file_name}`, always with forward slashes.
pub fn poster_relative_path(concert_id: i32, file_name: &str) -> String {
    format!("posters/concert_{}/{}", concert_id, file_name)
}

/// Detect the image format from the content, rejecting anything that is not
/// a PNG, JPEG, GIF or WebP.
pub fn sniff_image(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes)
        .ok()
        .filter(|format| ACCEPTED_FORMATS.contains(format))
}

/// Write a poster, replacing any earlier poster of the same concert.
/// Returns the path relative to `media_root`.
pub async fn store_poster(
    media_root: &Path,
    concert_id: i32,
    file_name: &str,
    bytes: &[u8],
) -> io::Result<String> {
    let dir = media_root.join(poster_dir(concert_id));
    remove_dir_if_present(&dir).await?;
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(file_name), bytes).await?;

    tracing::info!(
        "Stored poster for concert #{} ({} bytes)",
        concert_id,
        bytes.len()
    );
    Ok(poster_relative_path(concert_id, file_name))
}

pub async fn remove_posters(media_root: &Path, concert_id: i32) -> io::Result<()> {
    remove_dir_if_present(&media_root.join(poster_dir(concert_id))).await
}

async fn remove_dir_if_present(dir: &Path) -> io::Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
