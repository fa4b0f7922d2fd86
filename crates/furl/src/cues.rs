//! Expand/collapse affordances reported to the host.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueState {
    pub node: String,
    pub collapsible: bool,
    pub expandable: bool,
}

pub trait VisualCueProvider {
    fn clear_visual_cue(&mut self);
    fn update(&mut self, cues: &[CueState]);
}

/// Remembers the most recent cue set.
#[derive(Debug, Clone, Default)]
pub struct RecordedCues {
    pub clears: usize,
    pub cues: Vec<CueState>,
}

impl VisualCueProvider for RecordedCues {
    fn clear_visual_cue(&mut self) {
        self.clears += 1;
        self.cues.clear();
    }

    fn update(&mut self, cues: &[CueState]) {
        self.cues = cues.to_vec();
    }
}

impl<T: VisualCueProvider> VisualCueProvider for Rc<RefCell<T>> {
    fn clear_visual_cue(&mut self) {
        self.borrow_mut().clear_visual_cue();
    }

    fn update(&mut self, cues: &[CueState]) {
        self.borrow_mut().update(cues);
    }
}
