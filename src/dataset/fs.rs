//! Filesystem implementation of the [`DatasetStore`] contract.
//!
//! Directory layout:
//!
//! ```text
//! <root>/
//!   config.json                     optional dataset configuration
//!   images/                         source photos
//!   exif/<image>.exif               cached metadata records (JSON)
//!   exif_overrides.json             optional per-image field overrides
//!   camera_models_overrides.json    optional camera model overrides
//!   camera_models.json              finalized registry (output)
//!   profile.log                     appended run timings
//! ```

use crate::core::{DatasetConfig, MetaResult, MetadataError};
use crate::dataset::DatasetStore;
use crate::domain::{CameraModel, CameraModelOverrides, ExifOverrides, MetadataRecord};
use crate::utils;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File extensions recognized as dataset images.
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "tif", "tiff", "bmp", "webp"];

/// A photo dataset rooted at a directory on disk.
#[derive(Debug)]
pub struct FsDataset {
    root: PathBuf,
    config: DatasetConfig,
}

impl FsDataset {
    /// Opens a dataset, reading `config.json` when present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `config.json` exists but does
    /// not parse.
    pub fn open(root: impl Into<PathBuf>) -> MetaResult<Self> {
        let root = root.into();
        let config_path = root.join("config.json");
        let config = if config_path.is_file() {
            let text = fs::read_to_string(&config_path)?;
            serde_json::from_str(&text)
                .map_err(|e| MetadataError::config(format!("invalid config.json: {e}")))?
        } else {
            DatasetConfig::default()
        };
        Ok(Self { root, config })
    }

    /// Opens a dataset with an explicit configuration, ignoring any
    /// `config.json` on disk.
    pub fn with_config(root: impl Into<PathBuf>, config: DatasetConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// The dataset root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn image_path(&self, image: &str) -> PathBuf {
        self.root.join("images").join(image)
    }

    fn exif_path(&self, image: &str) -> PathBuf {
        self.root.join("exif").join(format!("{image}.exif"))
    }

    fn exif_overrides_path(&self) -> PathBuf {
        self.root.join("exif_overrides.json")
    }

    fn camera_models_overrides_path(&self) -> PathBuf {
        self.root.join("camera_models_overrides.json")
    }

    fn camera_models_path(&self) -> PathBuf {
        self.root.join("camera_models.json")
    }

    fn profile_log_path(&self) -> PathBuf {
        self.root.join("profile.log")
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

impl DatasetStore for FsDataset {
    fn config(&self) -> &DatasetConfig {
        &self.config
    }

    fn images(&self) -> MetaResult<Vec<String>> {
        let mut images = Vec::new();
        for entry in fs::read_dir(self.root.join("images"))? {
            let path = entry?.path();
            if path.is_file() && is_image_file(&path) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    images.push(name.to_string());
                }
            }
        }
        images.sort();
        Ok(images)
    }

    fn open_image_bytes(&self, image: &str) -> MetaResult<Vec<u8>> {
        fs::read(self.image_path(image))
            .map_err(|e| MetadataError::persistence(format!("reading image bytes for {image}"), e))
    }

    fn probe_image_dimensions(&self, image: &str) -> MetaResult<(u32, u32)> {
        utils::probe_dimensions(&self.image_path(image))
            .map_err(|e| MetadataError::dimension_probe(image, e))
    }

    fn exif_exists(&self, image: &str) -> bool {
        self.exif_path(image).is_file()
    }

    fn load_exif(&self, image: &str) -> MetaResult<MetadataRecord> {
        let path = self.exif_path(image);
        let text = fs::read_to_string(&path)
            .map_err(|e| MetadataError::persistence(format!("reading cached EXIF for {image}"), e))?;
        serde_json::from_str(&text)
            .map_err(|e| MetadataError::persistence(format!("parsing cached EXIF for {image}"), e))
    }

    fn save_exif(&self, image: &str, record: &MetadataRecord) -> MetaResult<()> {
        let path = self.exif_path(image);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| MetadataError::persistence("creating exif directory", e))?;
        }
        let text = serde_json::to_string_pretty(record)
            .map_err(|e| MetadataError::persistence(format!("encoding EXIF for {image}"), e))?;
        fs::write(&path, text)
            .map_err(|e| MetadataError::persistence(format!("writing cached EXIF for {image}"), e))
    }

    fn exif_overrides_exist(&self) -> bool {
        self.exif_overrides_path().is_file()
    }

    fn load_exif_overrides(&self) -> MetaResult<ExifOverrides> {
        let text = fs::read_to_string(self.exif_overrides_path())
            .map_err(|e| MetadataError::override_format("reading exif_overrides.json", e))?;
        serde_json::from_str(&text)
            .map_err(|e| MetadataError::override_format("parsing exif_overrides.json", e))
    }

    fn camera_models_overrides_exist(&self) -> bool {
        self.camera_models_overrides_path().is_file()
    }

    fn load_camera_models_overrides(&self) -> MetaResult<CameraModelOverrides> {
        let text = fs::read_to_string(self.camera_models_overrides_path())
            .map_err(|e| MetadataError::override_format("reading camera_models_overrides.json", e))?;
        let mut raw: HashMap<String, CameraModel> = serde_json::from_str(&text)
            .map_err(|e| MetadataError::override_format("parsing camera_models_overrides.json", e))?;

        // A key named "all" selects the registry-wide form; any other
        // entries in the same file are ignored in that case.
        if let Some(template) = raw.remove("all") {
            return Ok(CameraModelOverrides::All(template));
        }
        for (identity, model) in raw.iter_mut() {
            model.id = identity.clone();
        }
        Ok(CameraModelOverrides::PerCamera(raw))
    }

    fn save_camera_models(&self, models: &HashMap<String, CameraModel>) -> MetaResult<()> {
        let text = serde_json::to_string_pretty(models)
            .map_err(|e| MetadataError::persistence("encoding camera_models.json", e))?;
        fs::write(self.camera_models_path(), text)
            .map_err(|e| MetadataError::persistence("writing camera_models.json", e))
    }

    fn append_profile(&self, operation: &str, seconds: f64) -> MetaResult<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.profile_log_path())
            .map_err(|e| MetadataError::persistence("opening profile.log", e))?;
        writeln!(file, "{operation}: {seconds}")
            .map_err(|e| MetadataError::persistence("appending to profile.log", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dataset() -> (TempDir, FsDataset) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("images")).unwrap();
        let data = FsDataset::open(dir.path()).unwrap();
        (dir, data)
    }

    #[test]
    fn lists_images_sorted_and_filtered() {
        let (dir, data) = dataset();
        for name in ["b.jpg", "a.png", "notes.txt", "c.JPG"] {
            fs::write(dir.path().join("images").join(name), b"x").unwrap();
        }

        assert_eq!(data.images().unwrap(), vec!["a.png", "b.jpg", "c.JPG"]);
    }

    #[test]
    fn exif_cache_round_trips() {
        let (_dir, data) = dataset();
        let record = MetadataRecord {
            width: 100,
            height: 80,
            camera: "v2 canon eos 100 80 perspective 0.85".to_string(),
            ..MetadataRecord::default()
        };

        assert!(!data.exif_exists("a.jpg"));
        data.save_exif("a.jpg", &record).unwrap();
        assert!(data.exif_exists("a.jpg"));
        assert_eq!(data.load_exif("a.jpg").unwrap(), record);
    }

    #[test]
    fn loads_exif_overrides() {
        let (dir, data) = dataset();
        fs::write(
            dir.path().join("exif_overrides.json"),
            r#"{"a.jpg": {"orientation": 3}}"#,
        )
        .unwrap();

        assert!(data.exif_overrides_exist());
        let overrides = data.load_exif_overrides().unwrap();
        assert_eq!(
            overrides["a.jpg"].get("orientation"),
            Some(&serde_json::json!(3))
        );
    }

    #[test]
    fn malformed_exif_overrides_are_a_format_error() {
        let (dir, data) = dataset();
        fs::write(dir.path().join("exif_overrides.json"), "{not json").unwrap();

        assert!(matches!(
            data.load_exif_overrides(),
            Err(MetadataError::OverrideFormat { .. })
        ));
    }

    #[test]
    fn detects_the_all_override_form() {
        let (dir, data) = dataset();
        fs::write(
            dir.path().join("camera_models_overrides.json"),
            r#"{"all": {"projection_type": "perspective", "width": 10, "height": 8,
                "focal": 0.9, "focal_prior": 0.9,
                "k1": 0.0, "k1_prior": 0.0, "k2": 0.0, "k2_prior": 0.0}}"#,
        )
        .unwrap();

        match data.load_camera_models_overrides().unwrap() {
            CameraModelOverrides::All(model) => assert_eq!(model.focal, 0.9),
            other => panic!("expected the all form, got {other:?}"),
        }
    }

    #[test]
    fn per_camera_overrides_get_identities_stamped() {
        let (dir, data) = dataset();
        fs::write(
            dir.path().join("camera_models_overrides.json"),
            r#"{"v2 sony ilce-7m3 6000 4000 perspective 0.75":
                {"projection_type": "perspective", "width": 6000, "height": 4000,
                 "focal": 0.75, "focal_prior": 0.75,
                 "k1": 0.0, "k1_prior": 0.0, "k2": 0.0, "k2_prior": 0.0}}"#,
        )
        .unwrap();

        match data.load_camera_models_overrides().unwrap() {
            CameraModelOverrides::PerCamera(map) => {
                let id = "v2 sony ilce-7m3 6000 4000 perspective 0.75";
                assert_eq!(map[id].id, id);
            }
            other => panic!("expected the per-camera form, got {other:?}"),
        }
    }

    #[test]
    fn profile_log_appends_lines() {
        let (dir, data) = dataset();
        data.append_profile("extract_metadata", 1.25).unwrap();
        data.append_profile("extract_metadata", 0.5).unwrap();

        let log = fs::read_to_string(dir.path().join("profile.log")).unwrap();
        assert_eq!(log, "extract_metadata: 1.25\nextract_metadata: 0.5\n");
    }

    #[test]
    fn reads_config_from_disk() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"use_exif_size": false}"#,
        )
        .unwrap();

        let data = FsDataset::open(dir.path()).unwrap();
        assert!(!data.config().use_exif_size);
    }
}
