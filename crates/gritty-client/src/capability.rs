//! Narrow capability traits the bridge depends on. Each trait covers exactly
//! one thing the bridge needs from its collaborators, so tests can stand in
//! for the widget or the socket with a few lines of code.

use gritty_common::{ClientEvent, Geometry, Result};

/// Something terminal output can be written to.
pub trait TermWrite {
    /// Write a chunk of terminal output unmodified.
    fn write(&mut self, data: &str) -> Result<()>;

    /// Write `line` followed by a line break.
    fn writeln(&mut self, line: &str) -> Result<()> {
        self.write(line)?;
        self.write("\r\n")
    }
}

/// Something socket events can be emitted on.
pub trait Emit {
    fn emit(&mut self, event: ClientEvent) -> Result<()>;
}

/// Something whose geometry can be recomputed against its viewport.
pub trait Fit {
    /// Recompute the geometry. Implementations report a change through their
    /// own resize event rather than through the return value.
    fn fit(&mut self) -> Result<()>;

    /// Geometry as of the last fit.
    fn geometry(&self) -> Geometry;
}
