use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{CoughError, Result};

/// Keeps the parameters from the epoch with the lowest validation loss on disk.
///
/// A new checkpoint is written whenever the loss is less than or equal to every
/// loss observed so far.
#[derive(Debug, Clone)]
pub struct CheckpointKeeper {
    path: PathBuf,
    losses: Vec<f64>,
    best: Option<(usize, f64)>,
}

impl CheckpointKeeper {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            losses: Vec::new(),
            best: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn losses(&self) -> &[f64] {
        &self.losses
    }

    pub fn best_epoch(&self) -> Option<usize> {
        self.best.map(|(epoch, _)| epoch)
    }

    pub fn best_loss(&self) -> Option<f64> {
        self.best.map(|(_, loss)| loss)
    }

    /// Record `loss` for `epoch`; returns whether `params` were saved.
    pub fn observe<T: Serialize>(&mut self, epoch: usize, loss: f64, params: &T) -> Result<bool> {
        self.losses.push(loss);
        let improved = match self.best {
            Some((_, best)) => loss <= best,
            None => !loss.is_nan(),
        };
        if !improved {
            return Ok(false);
        }

        let bytes = serde_json::to_vec(params).map_err(|err| self.failure(err))?;
        fs::write(&self.path, bytes).map_err(|err| self.failure(err))?;
        self.best = Some((epoch, loss));
        debug!(epoch, loss, path = %self.path.display(), "saved checkpoint");
        Ok(true)
    }

    /// Load the parameters of the best epoch.
    pub fn restore<T: DeserializeOwned>(&self) -> Result<T> {
        if self.best.is_none() {
            return Err(self.failure("no checkpoint has been saved"));
        }
        let bytes = fs::read(&self.path).map_err(|err| self.failure(err))?;
        serde_json::from_slice(&bytes).map_err(|err| self.failure(err))
    }

    fn failure(&self, reason: impl ToString) -> CoughError {
        CoughError::Checkpoint {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}
