// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use tilepaint_core::trace::{
    DrawCull, FrameSummary, OrderingMove, PhaseBeginEvent, PhaseEndEvent, SessionInitEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn quadrant_range(s: &FrameSummary) -> String {
    match (s.back_quadrant, s.front_quadrant) {
        (Some(back), Some(front)) => format!("{back}..={front}"),
        _ => "-".to_owned(),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_session_init(&mut self, e: &SessionInitEvent) {
        let _ = writeln!(
            self.writer,
            "[init] frame={} rotation={} zoom={} capacity={}",
            e.frame_index,
            e.rotation.quarter_turns(),
            e.zoom,
            e.arena_capacity,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} used={}",
            e.frame_index,
            e.phase.name(),
            e.arena_used,
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} used={}",
            e.frame_index,
            e.phase.name(),
            e.arena_used,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} sprites={} attached={} strings={} dropped={} \
             culled={} ordered={} moves={} quadrants={}",
            s.frame_index,
            s.sprites,
            s.attachments,
            s.strings,
            s.dropped,
            s.culled,
            s.ordered,
            s.moves,
            quadrant_range(s),
        );
    }

    fn on_ordering_moves(&mut self, frame_index: u64, moves: &[OrderingMove]) {
        let _ = writeln!(
            self.writer,
            "[moves] frame={frame_index} count={}",
            moves.len(),
        );
    }

    fn on_draw_culls(&mut self, frame_index: u64, culls: &[DrawCull]) {
        let _ = writeln!(
            self.writer,
            "[culls] frame={frame_index} count={}",
            culls.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepaint_core::geometry::Rotation;
    use tilepaint_core::trace::PhaseKind;

    #[test]
    fn pretty_print_init_and_phase() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_session_init(&SessionInitEvent {
            frame_index: 1,
            rotation: Rotation::R3,
            zoom: 2,
            arena_capacity: 3998,
        });
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 1,
            phase: PhaseKind::Arrange,
            arena_used: 12,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[init] frame=1 rotation=3"), "got: {output}");
        assert!(output.contains("arrange used=12"), "got: {output}");
    }

    #[test]
    fn summary_without_quadrants() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_summary(&FrameSummary {
            frame_index: 4,
            dropped: 2,
            ..FrameSummary::default()
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("dropped=2"), "got: {output}");
        assert!(output.ends_with("quadrants=-\n"), "got: {output}");
    }
}
