//! Beam flag edits

use serde::{Deserialize, Serialize};
use swathgrid_core::swath::{BeamFlag, FlagReason, SoundingId, SwathFile};

/// Edit action recorded for a new flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    Unflag,
    Filter,
    Flag,
    Zero,
}

impl EditAction {
    pub fn for_flag(flag: BeamFlag) -> Self {
        match flag {
            BeamFlag::Accepted => EditAction::Unflag,
            BeamFlag::Flagged(FlagReason::Filter | FlagReason::Filter2) => EditAction::Filter,
            BeamFlag::Flagged(FlagReason::Manual | FlagReason::Sonar) => EditAction::Flag,
            BeamFlag::Null => EditAction::Zero,
        }
    }
}

/// When the display should catch up with an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushMode {
    /// Queue the edit; more follow
    #[default]
    NoFlush,
    /// Apply the edit and flush everything queued
    Flush,
}

/// A flag change on one sounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditEvent {
    pub sounding: SoundingId,
    /// Ping time, epoch seconds
    pub time: f64,
    pub flag: BeamFlag,
    pub action: EditAction,
}

/// A beam whose flag differs from the one it was loaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingEdit {
    pub sounding: SoundingId,
    pub original: BeamFlag,
    pub current: BeamFlag,
}

/// Edits waiting for a flush.
#[derive(Debug, Clone, Default)]
pub struct EditQueue {
    pending: Vec<EditEvent>,
}

impl EditQueue {
    pub fn push(&mut self, event: EditEvent) {
        self.pending.push(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop queued edits of one file slot.
    pub fn discard_file(&mut self, file: usize) {
        self.pending.retain(|e| e.sounding.file != file);
    }

    pub fn drain(&mut self) -> Vec<EditEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Every beam of `file` whose flag no longer matches its loaded flag.
pub fn outstanding_edits(file: &SwathFile, file_index: usize) -> Vec<OutstandingEdit> {
    let mut out = Vec::new();
    for (ping_index, ping) in file.pings.iter().enumerate() {
        for (beam_index, beam) in ping.beams.iter().enumerate() {
            if beam.flag != beam.original_flag {
                out.push(OutstandingEdit {
                    sounding: SoundingId::new(file_index, ping_index, beam_index),
                    original: beam.original_flag,
                    current: beam.flag,
                });
            }
        }
    }
    out
}
