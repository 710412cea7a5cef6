use std::thread;

use futures::future;
use tokio::sync::oneshot;

use crate::{Error, QrConfig, RenderReport, Result, SceneConfig, StudioConfig};

/// An async-friendly front for the generators.
///
/// Each job runs on its own worker thread and reports back over a oneshot
/// channel, so the blocking sky download and rasterisation never stall the
/// caller's executor.
#[derive(Debug, Clone, Default)]
pub struct Studio {
    config: StudioConfig,
}

impl Studio {
    pub fn new(config: StudioConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Encode and save the configured QR code.
    pub async fn generate_qr(&self) -> Result<RenderReport> {
        let config: QrConfig = self.config.qr.clone();
        run_on_worker("QR", move || crate::generate_qr(&config)).await
    }

    /// Render and save the configured scene.
    pub async fn render_scene(&self) -> Result<RenderReport> {
        let config: SceneConfig = self.config.scene.clone();
        run_on_worker("Scene", move || crate::render_scene(&config)).await
    }

    /// Produce both artworks concurrently; the first failure wins.
    pub async fn render_all(&self) -> Result<(RenderReport, RenderReport)> {
        future::try_join(self.generate_qr(), self.render_scene()).await
    }
}

async fn run_on_worker<T, F>(label: &'static str, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    thread::Builder::new()
        .name(format!("easel-{}", label.to_lowercase()))
        .spawn(move || {
            let _ = tx.send(job());
        })
        .map_err(|e| Error::Other(format!("{} worker failed to start: {}", label, e)))?;

    rx.await
        .map_err(|e| Error::Other(format!("{} canceled: {}", label, e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn worker_errors_propagate() {
        let res: Result<()> = run_on_worker("Test", || Err(Error::RenderError("boom".into()))).await;
        assert!(matches!(res, Err(Error::RenderError(msg)) if msg == "boom"));
    }

    #[tokio::test]
    async fn panicking_worker_reports_cancel() {
        let res: Result<()> = run_on_worker("Test", || panic!("worker died")).await;
        assert!(matches!(res, Err(Error::Other(msg)) if msg.starts_with("Test canceled")));
    }
}
