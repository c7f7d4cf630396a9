//! Filesystem loader for the serialized predictor.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::common::config::AppCfg;
use crate::common::error::{CytoError, CytoResult};
use crate::common::ids::Fingerprint;
use crate::common::time;

use super::domain::{ModelArtifact, ModelHandle, ModelKind, Predictor};

/// A predictor together with what was learned about its artefact.
pub struct LoadedModel {
    pub name: String,
    pub kind: ModelKind,
    pub fingerprint: String,
    pub predictor: Arc<dyn Predictor>,
}

impl LoadedModel {
    pub fn into_handle(self) -> ModelHandle {
        ModelHandle::from_arc(self.predictor)
    }
}

/// Reads the model artefact from a single fixed path.
pub struct FsModelRepo {
    path: PathBuf,
}

impl FsModelRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self::at(&cfg.model_path)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, fingerprint, parse and validate the artefact.
    pub fn load(&self) -> CytoResult<LoadedModel> {
        let bytes = fs::read(&self.path).map_err(|source| CytoError::ArtifactIo {
            path: self.path.clone(),
            source,
        })?;
        let fingerprint = Fingerprint::of(&bytes).finish_hex();

        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
        let name = artifact
            .name
            .clone()
            .unwrap_or_else(|| "unnamed".to_string());
        let kind = artifact.kind();
        let predictor = artifact.into_predictor()?;

        Ok(LoadedModel {
            name,
            kind,
            fingerprint,
            predictor,
        })
    }
}

/// Load the configured artefact once at startup.
///
/// Failure is logged and yields the unavailable sentinel so the pages stay up.
pub fn load_handle(cfg: &AppCfg) -> ModelHandle {
    let repo = FsModelRepo::new(cfg);
    let start = time::now_ms();

    match repo.load() {
        Ok(model) => {
            info!(
                path = %repo.path().display(),
                name = %model.name,
                kind = model.kind.as_str(),
                fingerprint = %model.fingerprint,
                dur_ms = time::clamp_ms(time::since_ms(start)),
                "model loaded"
            );
            model.into_handle()
        }
        Err(err) => {
            error!(
                path = %repo.path().display(),
                code = err.code() as u32,
                error = %err,
                "model could not be loaded; analysis submissions will be rejected"
            );
            ModelHandle::unavailable()
        }
    }
}
