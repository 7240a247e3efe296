use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to create asset directory: {0}")]
    CacheDir(#[source] io::Error),
    #[error("bundled asset not found: {0}")]
    Missing(PathBuf),
    #[error("failed to copy asset to {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Stage a bundled asset (e.g. the cascade definition) into the writable
/// asset directory and return the staged path.
///
/// The copy happens once; later calls return the already-staged file.
pub fn stage(name: &str, bundled_dir: &Path) -> Result<PathBuf, AssetError> {
    stage_into(name, bundled_dir, &asset_cache_dir()?)
}

/// Like [`stage`], with an explicit destination directory.
pub fn stage_into(name: &str, bundled_dir: &Path, cache_dir: &Path) -> Result<PathBuf, AssetError> {
    let staged_path = cache_dir.join(name);
    if staged_path.exists() {
        return Ok(staged_path);
    }

    let bundled_path = bundled_dir.join(name);
    if !bundled_path.is_file() {
        return Err(AssetError::Missing(bundled_path));
    }

    fs::create_dir_all(cache_dir).map_err(AssetError::CacheDir)?;
    copy_atomic(&bundled_path, &staged_path)?;
    log::debug!(
        "Staged {} into {}",
        bundled_path.display(),
        staged_path.display()
    );
    Ok(staged_path)
}

/// Platform-specific writable asset directory.
///
/// - macOS: `~/Library/Application Support/TrueMood/assets/`
/// - Linux: `$XDG_CACHE_HOME/TrueMood/assets/` or `~/.cache/TrueMood/assets/`
/// - Windows: `%LOCALAPPDATA%/TrueMood/assets/`
pub fn asset_cache_dir() -> Result<PathBuf, AssetError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("TrueMood").join("assets"))
            .ok_or(AssetError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("TrueMood").join("assets"))
            .ok_or(AssetError::NoCacheDir)
    }
}

fn copy_atomic(src: &Path, dest: &Path) -> Result<(), AssetError> {
    let temp_path = dest.with_extension("part");

    let result = fs::copy(src, &temp_path)
        .and_then(|_| fs::rename(&temp_path, dest))
        .map_err(|e| AssetError::Copy {
            path: dest.to_path_buf(),
            source: e,
        });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bundle(dir: &Path, name: &str, contents: &[u8]) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_stage_copies_bundled_file() {
        let tmp = TempDir::new().unwrap();
        let bundled = tmp.path().join("bundled");
        let cache = tmp.path().join("cache");
        bundle(&bundled, "cascade.bin", b"cascade data");

        let staged = stage_into("cascade.bin", &bundled, &cache).unwrap();

        assert_eq!(staged, cache.join("cascade.bin"));
        assert_eq!(fs::read(&staged).unwrap(), b"cascade data");
        assert!(!staged.with_extension("part").exists());
    }

    #[test]
    fn test_stage_reuses_existing_copy() {
        let tmp = TempDir::new().unwrap();
        let bundled = tmp.path().join("bundled");
        let cache = tmp.path().join("cache");
        bundle(&bundled, "cascade.bin", b"first");

        stage_into("cascade.bin", &bundled, &cache).unwrap();
        fs::write(bundled.join("cascade.bin"), b"second").unwrap();
        let staged = stage_into("cascade.bin", &bundled, &cache).unwrap();

        assert_eq!(fs::read(staged).unwrap(), b"first");
    }

    #[test]
    fn test_stage_missing_bundle_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = stage_into("nope.bin", tmp.path(), &tmp.path().join("cache"));
        assert!(matches!(result, Err(AssetError::Missing(_))));
        assert!(!tmp.path().join("cache").exists());
    }

    #[test]
    fn test_asset_cache_dir_returns_path() {
        let path = asset_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains("TrueMood"));
        assert!(path.ends_with("assets"));
    }
}
