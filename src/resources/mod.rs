use std::path::{Path, PathBuf};

/**
 * This module contains all logic for loading textures and other files from the
 * resources folder.
 */
pub mod texture;

pub const TEXTURE_DIR: &str = "textures";

/// Path of a texture file below `resources_dir`.
pub fn texture_path(resources_dir: &Path, file_name: &str) -> PathBuf {
    resources_dir.join(TEXTURE_DIR).join(file_name)
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = tokio::fs::read(path).await?;
    Ok(data)
}
