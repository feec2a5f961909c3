//! Rendering backend that prints text frames to a writer.

use std::{
    io::Write,
    sync::mpsc::{Receiver, TryRecvError},
    thread,
    time::Duration,
};

use anyhow::{Context, Result as AnyResult};
use outbreak_rendering::{FrameControl, FrameInput, Presentation, RenderingBackend, Scene};

/// Prints one text frame per tick until the driver asks to stop.
///
/// Frames identical to the previous one are not printed again, so an idle
/// interactive session stays quiet until a command changes something.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    out: W,
    tick: Duration,
    quiet: bool,
    color: bool,
    input: Option<Receiver<FrameInput>>,
    last_frame: Option<String>,
}

impl<W: Write> TerminalBackend<W> {
    /// Creates a backend writing to `out`; `quiet` prints only the last frame.
    pub(crate) fn new(out: W, tick: Duration, quiet: bool) -> Self {
        Self {
            out,
            tick,
            quiet,
            color: false,
            input: None,
            last_frame: None,
        }
    }

    /// Paints cells with their 24-bit colours instead of plain labels.
    pub(crate) fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Takes one queued command per frame from `input`.
    ///
    /// Once the sending side disconnects, the next frame carries a quit
    /// request.
    pub(crate) fn with_input(mut self, input: Receiver<FrameInput>) -> Self {
        self.input = Some(input);
        self
    }

    fn next_input(&self) -> FrameInput {
        let Some(input) = &self.input else {
            return FrameInput::default();
        };
        match input.try_recv() {
            Ok(input) => input,
            Err(TryRecvError::Empty) => FrameInput::default(),
            Err(TryRecvError::Disconnected) => FrameInput {
                quit: true,
                ..FrameInput::default()
            },
        }
    }

    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let frame = if self.color {
            scene.to_ansi()
        } else {
            scene.to_ascii()
        };
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }
        writeln!(self.out, "{frame}").context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")?;
        self.last_frame = Some(frame);
        Ok(())
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static,
    {
        let Presentation {
            window_title,
            mut scene,
        } = presentation;
        if !self.quiet {
            writeln!(self.out, "== {window_title} ==").context("failed to write title")?;
            self.present(&scene)?;
        }

        loop {
            let input = self.next_input();
            let control = update_scene(self.tick, input, &mut scene);
            if control == FrameControl::Exit {
                return self.present(&scene);
            }
            if !self.quiet {
                self.present(&scene)?;
            }
            if !self.tick.is_zero() {
                thread::sleep(self.tick);
            }
        }
    }
}
