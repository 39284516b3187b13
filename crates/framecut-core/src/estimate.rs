//! Debounced output-size estimation.
//!
//! Every settings change schedules a fresh estimate; a newer request makes
//! any older one stale. The scheduler never reads a clock, callers pass the
//! current time in milliseconds.
//!
//! # Lifecycle
//!
//! ```text
//! schedule(now) -> pending ticket, generation bumped
//! take_due(now) -> ticket once QUIET_PERIOD_MS have passed since schedule
//! accept(ticket) -> true only if no newer schedule/cancel happened since
//! ```

use tracing::debug;

use crate::config::CropConfig;
use crate::decode::SourceImage;
use crate::geometry::SourceCropRegion;
use crate::render::{render, RenderError};
use crate::text::format_file_size;

/// Quiet period before an estimate runs, in milliseconds.
pub const QUIET_PERIOD_MS: f64 = 400.0;

/// One scheduled estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateTicket {
    pub generation: u64,
    pub due_at_ms: f64,
}

/// Generation counter plus at most one pending deadline.
#[derive(Debug, Clone)]
pub struct EstimateScheduler {
    quiet_period_ms: f64,
    generation: u64,
    pending: Option<EstimateTicket>,
}

impl Default for EstimateScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimateScheduler {
    pub fn new() -> Self {
        Self::with_quiet_period(QUIET_PERIOD_MS)
    }

    pub fn with_quiet_period(quiet_period_ms: f64) -> Self {
        let quiet_period_ms = if quiet_period_ms.is_finite() {
            quiet_period_ms.max(0.0)
        } else {
            QUIET_PERIOD_MS
        };
        Self {
            quiet_period_ms,
            generation: 0,
            pending: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<EstimateTicket> {
        self.pending
    }

    /// Request an estimate, superseding any pending or running one.
    pub fn schedule(&mut self, now_ms: f64) -> EstimateTicket {
        self.generation += 1;
        let ticket = EstimateTicket {
            generation: self.generation,
            due_at_ms: now_ms + self.quiet_period_ms,
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Drop the pending request and invalidate one in flight.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    /// Hand out the pending ticket once its quiet period is over.
    pub fn take_due(&mut self, now_ms: f64) -> Option<EstimateTicket> {
        match self.pending {
            Some(ticket) if now_ms >= ticket.due_at_ms => {
                self.pending = None;
                Some(ticket)
            }
            _ => None,
        }
    }

    /// Whether a finished estimate for `ticket` may still be shown.
    pub fn accept(&self, ticket: &EstimateTicket) -> bool {
        let current = ticket.generation == self.generation;
        if !current {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale size estimate"
            );
        }
        current
    }
}

/// What the size readout shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeEstimate {
    #[default]
    Unavailable,
    Calculating,
    Ready(usize),
}

impl SizeEstimate {
    pub fn label(&self) -> String {
        match self {
            SizeEstimate::Unavailable => "\u{2014}".to_string(),
            SizeEstimate::Calculating => "calculating...".to_string(),
            SizeEstimate::Ready(bytes) => format_file_size(*bytes as u64),
        }
    }
}

/// Encoded size of the crop at the chosen quality.
///
/// The size budget is ignored here; the estimate shows what the settings
/// alone produce.
pub fn estimate_size(
    source: &SourceImage,
    region: &SourceCropRegion,
    config: &CropConfig,
) -> Result<usize, RenderError> {
    let spec = config.normalized().encode_spec();
    Ok(render(source, region, &spec)?.byte_length())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::ExportFormat;

    #[test]
    fn test_take_due_waits_for_quiet_period() {
        let mut scheduler = EstimateScheduler::new();
        let ticket = scheduler.schedule(1000.0);
        assert_eq!(ticket.due_at_ms, 1400.0);

        assert_eq!(scheduler.take_due(1399.0), None);
        assert_eq!(scheduler.take_due(1400.0), Some(ticket));
        assert_eq!(scheduler.take_due(2000.0), None);
        assert!(scheduler.accept(&ticket));
    }

    #[test]
    fn test_reschedule_supersedes() {
        let mut scheduler = EstimateScheduler::new();
        let first = scheduler.schedule(0.0);
        let second = scheduler.schedule(300.0);

        // The first deadline passes but only the newer ticket is pending.
        assert_eq!(scheduler.take_due(400.0), None);
        assert_eq!(scheduler.take_due(700.0), Some(second));
        assert!(!scheduler.accept(&first));
        assert!(scheduler.accept(&second));
    }

    #[test]
    fn test_in_flight_result_goes_stale() {
        let mut scheduler = EstimateScheduler::with_quiet_period(0.0);
        let running = scheduler.schedule(0.0);
        assert_eq!(scheduler.take_due(0.0), Some(running));

        scheduler.schedule(10.0);
        assert!(!scheduler.accept(&running));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = EstimateScheduler::new();
        let ticket = scheduler.schedule(0.0);
        scheduler.cancel();
        assert_eq!(scheduler.pending(), None);
        assert_eq!(scheduler.take_due(10_000.0), None);
        assert!(!scheduler.accept(&ticket));
        assert_eq!(scheduler.generation(), 2);
    }

    #[test]
    fn test_invalid_quiet_period() {
        let mut scheduler = EstimateScheduler::with_quiet_period(f64::NAN);
        assert_eq!(scheduler.schedule(0.0).due_at_ms, QUIET_PERIOD_MS);
    }

    #[test]
    fn test_labels() {
        assert_eq!(SizeEstimate::Unavailable.label(), "\u{2014}");
        assert_eq!(SizeEstimate::Calculating.label(), "calculating...");
        assert_eq!(SizeEstimate::Ready(1536).label(), "1.5 KB");
    }

    #[test]
    fn test_estimate_matches_render() {
        let source = SourceImage::filled(32, 32, [10, 200, 30, 255]);
        let region = SourceCropRegion::new(4.0, 4.0, 16.0, 16.0);
        let config = CropConfig {
            export_format: ExportFormat::Jpeg,
            quality: 70,
            target_size_kb: Some(1),
            ..CropConfig::default()
        };

        let estimate = estimate_size(&source, &region, &config).unwrap();
        let rendered = render(&source, &region, &config.encode_spec()).unwrap();
        assert_eq!(estimate, rendered.byte_length());
    }
}
