//! Recording stand-ins for the widget and the socket.

use gritty_common::{ClientEvent, Geometry, Result};

use crate::capability::{Emit, Fit, TermWrite};

#[derive(Debug, Default)]
pub(crate) struct RecordingSocket {
    pub(crate) emitted: Vec<ClientEvent>,
}

impl Emit for RecordingSocket {
    fn emit(&mut self, event: ClientEvent) -> Result<()> {
        self.emitted.push(event);
        Ok(())
    }
}

impl RecordingSocket {
    pub(crate) fn count(&self, name: &str) -> usize {
        self.emitted.iter().filter(|e| e.name() == name).count()
    }
}

/// Widget stand-in. `next_geometry` is what the following `fit` will
/// measure; `fit` does not raise resize events on its own.
#[derive(Debug)]
pub(crate) struct RecordingWidget {
    pub(crate) written: Vec<String>,
    pub(crate) lines: Vec<String>,
    pub(crate) fits: usize,
    pub(crate) geometry: Geometry,
    pub(crate) next_geometry: Geometry,
}

impl Default for RecordingWidget {
    fn default() -> Self {
        let geometry = Geometry::clamped(80, 25);
        Self {
            written: Vec::new(),
            lines: Vec::new(),
            fits: 0,
            geometry,
            next_geometry: geometry,
        }
    }
}

impl TermWrite for RecordingWidget {
    fn write(&mut self, data: &str) -> Result<()> {
        self.written.push(data.to_string());
        Ok(())
    }

    fn writeln(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

impl Fit for RecordingWidget {
    fn fit(&mut self) -> Result<()> {
        self.fits += 1;
        self.geometry = self.next_geometry;
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }
}
