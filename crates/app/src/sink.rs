//! Frame dispatch. The orchestrator hands finished frames to a
//! [`Sink`]; the sink owns the panel power discipline (init, push,
//! deep sleep) or, for debugging, writes PNGs instead.

use std::path::PathBuf;

use embedded_graphics::prelude::*;
use thiserror::Error;

use display::{Frame, PanelColor};

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("panel bus failure: {0}")]
    Bus(String),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Minimal e-paper panel contract. The concrete driver lives outside
/// this crate; anything honoring init/clear/push/sleep/cleanup plugs
/// in.
pub trait Panel {
    fn init(&mut self) -> Result<(), PanelError>;
    fn clear(&mut self) -> Result<(), PanelError>;
    fn push(&mut self, frame: &Frame<PanelColor>) -> Result<(), PanelError>;
    fn sleep(&mut self) -> Result<(), PanelError>;
    fn cleanup(&mut self) -> Result<(), PanelError>;
}

pub trait Sink {
    fn dispatch(&mut self, frame: &Frame<PanelColor>) -> Result<(), SinkError>;
    /// Flood the panel white. E-paper needs this periodically to
    /// avoid burn-in.
    fn clear(&mut self) -> Result<(), SinkError>;
    fn shutdown(&mut self);
}

impl Sink for Box<dyn Sink> {
    fn dispatch(&mut self, frame: &Frame<PanelColor>) -> Result<(), SinkError> {
        (**self).dispatch(frame)
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        (**self).clear()
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}

/// Drives a real panel. The panel is re-initialized for every
/// operation and put back to deep sleep afterwards; leaving an
/// e-paper controller powered between half-hour refreshes damages it.
pub struct PanelSink<P: Panel> {
    panel: P,
}

impl<P: Panel> PanelSink<P> {
    pub fn new(panel: P) -> PanelSink<P> {
        PanelSink { panel }
    }
}

impl<P: Panel> Sink for PanelSink<P> {
    fn dispatch(&mut self, frame: &Frame<PanelColor>) -> Result<(), SinkError> {
        self.panel.init()?;
        self.panel.push(frame)?;
        Ok(self.panel.sleep()?)
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        self.panel.init()?;
        self.panel.clear()?;
        Ok(self.panel.sleep()?)
    }

    fn shutdown(&mut self) {
        if let Err(err) = self.clear() {
            log::warn!("panel clear on shutdown failed: {err}");
        }
        if let Err(err) = self.panel.cleanup() {
            log::warn!("panel cleanup failed: {err}");
        }
    }
}

/// Stand-in panel for hosts without a connected display.
pub struct LogPanel;

impl Panel for LogPanel {
    fn init(&mut self) -> Result<(), PanelError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PanelError> {
        log::info!("would clear the panel");
        Ok(())
    }

    fn push(&mut self, frame: &Frame<PanelColor>) -> Result<(), PanelError> {
        log::info!(
            "would push a {}x{} frame",
            frame.size().width,
            frame.size().height
        );
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), PanelError> {
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), PanelError> {
        Ok(())
    }
}

/// Writes each frame as a PNG, for layout work without hardware.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> FileSink {
        FileSink { path }
    }
}

impl Sink for FileSink {
    fn dispatch(&mut self, frame: &Frame<PanelColor>) -> Result<(), SinkError> {
        let size = frame.size();
        let mut img = image::RgbImage::new(size.width, size.height);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let rgb = frame.get(x, y).unwrap_or(PanelColor::White).rgb();
            *px = image::Rgb([rgb.r(), rgb.g(), rgb.b()]);
        }
        img.save(&self.path)?;
        log::info!("frame written to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn shutdown(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingPanel {
        ops: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Panel for RecordingPanel {
        fn init(&mut self) -> Result<(), PanelError> {
            self.ops.borrow_mut().push("init");
            Ok(())
        }

        fn clear(&mut self) -> Result<(), PanelError> {
            self.ops.borrow_mut().push("clear");
            Ok(())
        }

        fn push(&mut self, _frame: &Frame<PanelColor>) -> Result<(), PanelError> {
            self.ops.borrow_mut().push("push");
            Ok(())
        }

        fn sleep(&mut self) -> Result<(), PanelError> {
            self.ops.borrow_mut().push("sleep");
            Ok(())
        }

        fn cleanup(&mut self) -> Result<(), PanelError> {
            self.ops.borrow_mut().push("cleanup");
            Ok(())
        }
    }

    #[test]
    fn panel_sleeps_after_every_operation() {
        let ops = Rc::new(RefCell::new(Vec::new()));
        let mut sink = PanelSink::new(RecordingPanel { ops: ops.clone() });
        let frame = Frame::<PanelColor>::new(Size::new(8, 8));

        sink.dispatch(&frame).unwrap();
        sink.clear().unwrap();
        assert_eq!(
            *ops.borrow(),
            vec!["init", "push", "sleep", "init", "clear", "sleep"]
        );
    }

    #[test]
    fn shutdown_clears_then_releases_the_panel() {
        let ops = Rc::new(RefCell::new(Vec::new()));
        let mut sink = PanelSink::new(RecordingPanel { ops: ops.clone() });
        sink.shutdown();
        assert_eq!(*ops.borrow(), vec!["init", "clear", "sleep", "cleanup"]);
    }

    struct BusFaultPanel;

    impl Panel for BusFaultPanel {
        fn init(&mut self) -> Result<(), PanelError> {
            Ok(())
        }

        fn clear(&mut self) -> Result<(), PanelError> {
            Err(PanelError::Bus("spi write".to_string()))
        }

        fn push(&mut self, _frame: &Frame<PanelColor>) -> Result<(), PanelError> {
            Err(PanelError::Bus("spi write".to_string()))
        }

        fn sleep(&mut self) -> Result<(), PanelError> {
            Ok(())
        }

        fn cleanup(&mut self) -> Result<(), PanelError> {
            Ok(())
        }
    }

    #[test]
    fn bus_failure_surfaces_through_dispatch() {
        let mut sink = PanelSink::new(BusFaultPanel);
        let frame = Frame::<PanelColor>::new(Size::new(8, 8));
        assert!(matches!(
            sink.dispatch(&frame),
            Err(SinkError::Panel(PanelError::Bus(_)))
        ));
        // Shutdown logs the failure instead of propagating it.
        sink.shutdown();
    }

    #[test]
    fn file_sink_writes_a_png() {
        let path = std::env::temp_dir().join("launchpad-sink-test.png");
        let _ = std::fs::remove_file(&path);

        let mut sink = FileSink::new(path.clone());
        sink.dispatch(&Frame::<PanelColor>::new(Size::new(16, 16)))
            .unwrap();

        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
        let _ = std::fs::remove_file(&path);
    }
}
