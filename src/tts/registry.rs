//! Model registry: maps a language code to on-disk MMS VITS model artifacts.
//!
//! Models are the sherpa-onnx exports of `facebook/mms-tts-*`, published as
//! `vits-mms-<code>.tar.bz2` archives. Each unpacks to
//! `<model_dir>/vits-mms-<code>/` containing `model.onnx` and `tokens.txt`.

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Base URL for the published sherpa-onnx TTS model archives.
const RELEASE_BASE_URL: &str = "https://github.com/k2-fsa/sherpa-onnx/releases/download/tts-models";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no model for language code '{code}' under {}. Run with --download to fetch it", dir.display())]
    NotDownloaded { code: String, dir: PathBuf },

    #[error("failed to download model archive for '{code}': {source}")]
    Download {
        code: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("model archive I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Resolved on-disk artifacts for one language's VITS model.
#[derive(Debug, Clone)]
pub struct VitsModel {
    pub code: String,
    pub model: PathBuf,
    pub tokens: PathBuf,
}

/// Record of a completed fetch, written next to the unpacked model.
#[derive(Debug, Serialize)]
struct FetchManifest {
    code: String,
    url: String,
    fetched_at_unix: u64,
}

/// Looks up and (optionally) downloads MMS VITS models by language code.
pub struct ModelRegistry {
    model_dir: PathBuf,
}

impl ModelRegistry {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self { model_dir: model_dir.into() }
    }

    /// Directory holding the unpacked model for `code`.
    pub fn language_dir(&self, code: &str) -> PathBuf {
        self.model_dir.join(format!("vits-mms-{code}"))
    }

    /// Download URL for the model archive of `code`.
    pub fn archive_url(code: &str) -> String {
        format!("{RELEASE_BASE_URL}/vits-mms-{code}.tar.bz2")
    }

    /// Resolve the model artifacts for `code`, failing if any are missing.
    pub fn resolve(&self, code: &str) -> Result<VitsModel, RegistryError> {
        let dir = self.language_dir(code);
        let model = dir.join("model.onnx");
        let tokens = dir.join("tokens.txt");

        if !model.exists() || !tokens.exists() {
            return Err(RegistryError::NotDownloaded { code: code.to_string(), dir });
        }

        Ok(VitsModel { code: code.to_string(), model, tokens })
    }

    /// Fetch and unpack the model for `code` unless it is already present
    /// (`force` re-downloads), then resolve it.
    pub fn fetch(&self, code: &str, force: bool) -> Result<VitsModel, RegistryError> {
        if !force && let Ok(resolved) = self.resolve(code) {
            return Ok(resolved);
        }

        fs::create_dir_all(&self.model_dir)?;

        let url = Self::archive_url(code);
        let archive_path = self.model_dir.join(format!("vits-mms-{code}.tar.bz2"));
        info!("Downloading model archive: {}", url);
        self.download_archive(code, &url, &archive_path)?;

        info!("Unpacking model archive into {}", self.model_dir.display());
        let archive_file = File::open(&archive_path)?;
        let decoder = bzip2::read::BzDecoder::new(archive_file);
        tar::Archive::new(decoder).unpack(&self.model_dir)?;
        fs::remove_file(&archive_path)?;

        self.write_manifest(code, &url)?;
        self.resolve(code)
    }

    /// Download `url` to `dest` through a temp file so an interrupted
    /// transfer never leaves a partial archive behind.
    fn download_archive(&self, code: &str, url: &str, dest: &std::path::Path) -> Result<(), RegistryError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("mms-audiobook/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(600))
            .build()
            .map_err(|source| RegistryError::Download { code: code.to_string(), source })?;

        let temp_path = dest.with_extension("download.tmp");
        let result = (|| -> Result<(), RegistryError> {
            let mut response = client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(|source| RegistryError::Download { code: code.to_string(), source })?;

            let mut file = File::create(&temp_path)?;
            io::copy(&mut response, &mut file)?;
            fs::rename(&temp_path, dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    fn write_manifest(&self, code: &str, url: &str) -> Result<(), RegistryError> {
        let manifest = FetchManifest {
            code: code.to_string(),
            url: url.to_string(),
            fetched_at_unix: SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs(),
        };
        let path = self.language_dir(code).join("manifest.json");
        let json = serde_json::to_string_pretty(&manifest).map_err(io::Error::other)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_url_follows_release_layout() {
        assert_eq!(
            ModelRegistry::archive_url("tam"),
            "https://github.com/k2-fsa/sherpa-onnx/releases/download/tts-models/vits-mms-tam.tar.bz2"
        );
    }

    #[test]
    fn resolve_fails_when_model_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(dir.path());

        let err = registry.resolve("eng").expect_err("nothing downloaded yet");
        match err {
            RegistryError::NotDownloaded { code, .. } => assert_eq!(code, "eng"),
            other => panic!("unexpected error: {other}"),
        }
        // The message must point the user at the fix.
        assert!(err.to_string().contains("--download"));
    }

    #[test]
    fn resolve_finds_unpacked_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(dir.path());

        let lang_dir = registry.language_dir("hin");
        fs::create_dir_all(&lang_dir).expect("mkdir");
        fs::write(lang_dir.join("model.onnx"), b"onnx").expect("model");
        fs::write(lang_dir.join("tokens.txt"), b"a 1\n").expect("tokens");

        let resolved = registry.resolve("hin").expect("artifacts present");
        assert_eq!(resolved.code, "hin");
        assert!(resolved.model.ends_with("vits-mms-hin/model.onnx"));
        assert!(resolved.tokens.ends_with("vits-mms-hin/tokens.txt"));
    }

    #[test]
    fn tokens_alone_do_not_resolve() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(dir.path());

        let lang_dir = registry.language_dir("spa");
        fs::create_dir_all(&lang_dir).expect("mkdir");
        fs::write(lang_dir.join("tokens.txt"), b"a 1\n").expect("tokens");

        assert!(registry.resolve("spa").is_err());
    }
}
