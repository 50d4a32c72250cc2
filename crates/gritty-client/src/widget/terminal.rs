//! The host-terminal widget: output, geometry, theme and tab stops.

use std::io::{self, Stdout, Write};

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::{execute, queue, terminal};
use gritty_common::{Geometry, GrittyError, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::options::{Theme, WidgetOptions};
use crate::bridge::TermEvent;
use crate::capability::{Fit, TermWrite};

/// Reads the viewport size as `(cols, rows)`.
pub type MeasureFn = Box<dyn Fn() -> io::Result<(u16, u16)> + Send>;

/// Tab stop width the host terminal is returned to on close.
const HOST_TAB_STOP_WIDTH: u16 = 8;

/// Terminal widget drawing into `out`, normally stdout in raw mode.
pub struct TerminalWidget<O: Write = Stdout> {
    out: O,
    options: WidgetOptions,
    theme: &'static Theme,
    geometry: Geometry,
    term_tx: mpsc::UnboundedSender<TermEvent>,
    measure: MeasureFn,
    raw_mode: bool,
    closed: bool,
}

impl TerminalWidget<Stdout> {
    /// Take over the host terminal: raw mode, bracketed paste, theme colours
    /// and tab stops. Geometry changes are reported on `term_tx`.
    pub fn open(options: WidgetOptions, term_tx: mpsc::UnboundedSender<TermEvent>) -> Result<Self> {
        terminal::enable_raw_mode()
            .map_err(|e| GrittyError::Terminal(format!("failed to enable raw mode: {e}")))?;

        let mut widget =
            match Self::with_output(io::stdout(), options, term_tx, Box::new(terminal::size)) {
                Ok(widget) => widget,
                Err(e) => {
                    let _ = terminal::disable_raw_mode();
                    return Err(e);
                }
            };
        widget.raw_mode = true;
        execute!(widget.out, EnableBracketedPaste)?;

        info!(
            geometry = %widget.geometry,
            scrollback = options.scrollback,
            tab_stop_width = options.tab_stop_width,
            theme = widget.theme.name,
            "Terminal widget opened"
        );
        Ok(widget)
    }
}

impl<O: Write> TerminalWidget<O> {
    /// Build a widget over any writer. Measures the initial geometry and
    /// applies the theme and tab stops, but leaves terminal modes alone.
    pub fn with_output(
        out: O,
        options: WidgetOptions,
        term_tx: mpsc::UnboundedSender<TermEvent>,
        measure: MeasureFn,
    ) -> Result<Self> {
        let geometry = measure_geometry(&measure)?;
        let mut widget = Self {
            out,
            options,
            theme: options.resolve_theme(),
            geometry,
            term_tx,
            measure,
            raw_mode: false,
            closed: false,
        };

        let theme = widget.theme.apply_sequence();
        widget.out.write_all(theme.as_bytes())?;
        widget.apply_tab_stops(options.tab_stop_width)?;
        widget.out.flush()?;
        Ok(widget)
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    pub fn output(&self) -> &O {
        &self.out
    }

    fn apply_tab_stops(&mut self, width: u16) -> Result<()> {
        let seq = tab_stop_sequence(width, self.geometry.cols);
        self.out.write_all(seq.as_bytes())?;
        Ok(())
    }

    /// Hand the host terminal back in the state it was found. Safe to call
    /// more than once.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        self.out.write_all(Theme::reset_sequence().as_bytes())?;
        self.apply_tab_stops(HOST_TAB_STOP_WIDTH)?;
        queue!(self.out, SetCursorStyle::DefaultUserShape)?;
        if self.raw_mode {
            queue!(self.out, DisableBracketedPaste)?;
        }
        self.out.flush()?;

        if self.raw_mode {
            terminal::disable_raw_mode()
                .map_err(|e| GrittyError::Terminal(format!("failed to disable raw mode: {e}")))?;
            self.raw_mode = false;
        }
        debug!("Terminal widget closed");
        Ok(())
    }
}

impl<O: Write> Drop for TerminalWidget<O> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}

impl<O: Write> TermWrite for TerminalWidget<O> {
    fn write(&mut self, data: &str) -> Result<()> {
        self.out.write_all(data.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<O: Write> Fit for TerminalWidget<O> {
    fn fit(&mut self) -> Result<()> {
        let geometry = measure_geometry(&self.measure)?;
        if geometry == self.geometry {
            return Ok(());
        }

        debug!(from = %self.geometry, to = %geometry, "Geometry changed");
        self.geometry = geometry;
        self.apply_tab_stops(self.options.tab_stop_width)?;
        self.out.flush()?;

        // A closed receiver means the bridge has already stopped.
        let _ = self.term_tx.send(TermEvent::Resize(geometry));
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }
}

fn measure_geometry(measure: &MeasureFn) -> Result<Geometry> {
    let (cols, rows) = measure()
        .map_err(|e| GrittyError::Terminal(format!("failed to read terminal size: {e}")))?;
    Ok(Geometry::clamped(cols, rows))
}

/// Clear all tab stops, then set one every `width` columns across `cols`.
/// The cursor position is saved and restored around the change.
fn tab_stop_sequence(width: u16, cols: u16) -> String {
    let mut seq = String::from("\x1b7\x1b[3g");
    if width > 0 {
        for col in (width..cols).step_by(usize::from(width)) {
            seq.push_str(&format!("\x1b[{}G\x1bH", col + 1));
        }
    }
    seq.push_str("\x1b8");
    seq
}

/// Switch the cursor between blinking (connected) and steady (disconnected).
pub fn set_cursor_blink<O: Write>(out: &mut O, on: bool) -> io::Result<()> {
    let style = if on {
        SetCursorStyle::BlinkingBlock
    } else {
        SetCursorStyle::SteadyBlock
    };
    execute!(out, style)
}
