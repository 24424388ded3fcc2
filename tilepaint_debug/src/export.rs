// Copyright 2026 the Tilepaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recordings and draw plans.
//!
//! [`write_events_json`] turns bytes from a
//! [`RecorderSink`](crate::recorder::RecorderSink) into a JSON array with one
//! object per event. [`write_plan_json`] dumps a [`DrawPlan`] so two frames
//! can be diffed with ordinary text tools.

use std::io::{self, Write};

use serde_json::{Value, json};
use tilepaint_render::{DrawPlan, DrawRole};

use crate::recorder::{RecordedEvent, decode};

fn event_to_json(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::SessionInit(e) => json!({
            "event": "session_init",
            "frame": e.frame_index,
            "rotation": e.rotation.quarter_turns(),
            "zoom": e.zoom,
            "capacity": e.arena_capacity,
        }),
        RecordedEvent::PhaseBegin(e) => json!({
            "event": "phase_begin",
            "frame": e.frame_index,
            "phase": e.phase.name(),
            "used": e.arena_used,
        }),
        RecordedEvent::PhaseEnd(e) => json!({
            "event": "phase_end",
            "frame": e.frame_index,
            "phase": e.phase.name(),
            "used": e.arena_used,
        }),
        RecordedEvent::FrameSummary(s) => json!({
            "event": "frame_summary",
            "frame": s.frame_index,
            "sprites": s.sprites,
            "attachments": s.attachments,
            "strings": s.strings,
            "dropped": s.dropped,
            "culled": s.culled,
            "ordered": s.ordered,
            "moves": s.moves,
            "back_quadrant": s.back_quadrant,
            "front_quadrant": s.front_quadrant,
        }),
        RecordedEvent::OrderingMovesCount { frame_index, count } => json!({
            "event": "ordering_moves",
            "frame": frame_index,
            "count": count,
        }),
        RecordedEvent::DrawCullsCount { frame_index, count } => json!({
            "event": "draw_culls",
            "frame": frame_index,
            "count": count,
        }),
    }
}

/// Decodes `bytes` and returns the events as a JSON array.
#[must_use]
pub fn events_to_json(bytes: &[u8]) -> Value {
    Value::Array(decode(bytes).map(|e| event_to_json(&e)).collect())
}

/// Decodes `bytes` and writes the events as pretty-printed JSON.
///
/// # Errors
///
/// Returns any I/O error from `writer`.
pub fn write_events_json(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &events_to_json(bytes))?;
    writeln!(writer)
}

fn role_name(role: DrawRole) -> &'static str {
    match role {
        DrawRole::Sprite => "sprite",
        DrawRole::Child => "child",
        DrawRole::Attachment => "attachment",
    }
}

/// Returns `plan` as a JSON object with `items` and `texts` arrays.
#[must_use]
pub fn plan_to_json(plan: &DrawPlan) -> Value {
    let items: Vec<Value> = plan
        .items
        .iter()
        .map(|item| {
            json!({
                "record": item.record.index(),
                "reports": item.reports.index(),
                "role": role_name(item.role),
                "image": item.image.index(),
                "blended": item.image.is_blended(),
                "mask": item.mask.map(|m| m.index()),
                "x": item.pos.x,
                "y": item.pos.y,
                "item": format!("{:?}", item.item),
            })
        })
        .collect();
    let texts: Vec<Value> = plan
        .texts
        .iter()
        .map(|text| {
            json!({
                "record": text.record.index(),
                "string": text.string_id.0,
                "args": text.args,
                "x": text.pos.x,
                "y": text.pos.y,
                "colour": text.colour,
                "y_offsets": text.y_offsets,
            })
        })
        .collect();
    json!({
        "zoom": plan.zoom,
        "items": items,
        "texts": texts,
    })
}

/// Writes `plan` as pretty-printed JSON.
///
/// # Errors
///
/// Returns any I/O error from `writer`.
pub fn write_plan_json(plan: &DrawPlan, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &plan_to_json(plan))?;
    writeln!(writer)
}
