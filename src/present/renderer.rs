use std::io::Write;

use anyhow::Context as _;

use crate::foundation::error::SurpriseResult;
use crate::present::snapshot::Snapshot;

/// Visual presentation collaborator. The core only hands it snapshots.
pub trait Renderer {
    fn present(&mut self, snapshot: &Snapshot) -> SurpriseResult<()>;
}

/// Hand `snapshot` to `renderer` if there is one.
///
/// A missing renderer or a failing one never stops the presentation; the failure is
/// logged and the frame is skipped. Returns whether the frame was presented.
pub fn present_to(renderer: Option<&mut dyn Renderer>, snapshot: &Snapshot) -> bool {
    let Some(r) = renderer else {
        tracing::trace!("no render target; frame skipped");
        return false;
    };
    match r.present(snapshot) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, scene = %snapshot.scene, "renderer failed; frame skipped");
            false
        }
    }
}

/// Writes one JSON document per frame.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    frames: u64,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn present(&mut self, snapshot: &Snapshot) -> SurpriseResult<()> {
        serde_json::to_writer(&mut self.out, snapshot).context("serialize snapshot")?;
        self.out.write_all(b"\n").context("write snapshot line")?;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/renderer.rs"]
mod tests;
