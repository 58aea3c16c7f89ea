//! Audio cue timeline
//!
//! An append-only ordered log populated by the animation sequencer. Cue
//! times are derived from frame indices, so appending in emission order
//! keeps them non-decreasing without sorting.

/// What sound a cue triggers. The two reveal kinds map to the two distinct
/// call effects; every resolved attack contributes exactly one Hit or Miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    RevealA,
    RevealB,
    Hit,
    Miss,
}

/// One timestamped trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub kind: CueKind,
    pub time_secs: f64,
}

/// Append-only cue log. Duplicate kinds are legal and expected.
#[derive(Debug, Default)]
pub struct CueTimeline {
    cues: Vec<Cue>,
}

impl CueTimeline {
    pub fn new() -> CueTimeline {
        CueTimeline::default()
    }

    /// Append a cue. Emission order must be non-decreasing in time; this is
    /// asserted in debug builds.
    pub fn push(&mut self, kind: CueKind, time_secs: f64) {
        debug_assert!(
            self.cues.last().map_or(true, |c| time_secs >= c.time_secs),
            "cue pushed out of order"
        );
        self.cues.push(Cue { kind, time_secs });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_append_order() {
        let mut tl = CueTimeline::new();
        tl.push(CueKind::RevealA, 0.5);
        tl.push(CueKind::RevealB, 2.0);
        tl.push(CueKind::Hit, 4.0);
        tl.push(CueKind::Hit, 4.0); // overlap is legal
        let kinds: Vec<CueKind> = tl.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![CueKind::RevealA, CueKind::RevealB, CueKind::Hit, CueKind::Hit]
        );
        assert_eq!(tl.len(), 4);
    }
}
