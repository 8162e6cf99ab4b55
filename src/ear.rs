//! The binaural channel under test.

/// Left or right ear.
///
/// Each ear owns an independent staircase and response log; the two never
/// share state except through the sequencer's ear selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ear {
    /// Left channel.
    Left,
    /// Right channel.
    Right,
}

impl Ear {
    /// Both ears, left first.
    pub const BOTH: [Ear; 2] = [Ear::Left, Ear::Right];

    /// The opposite ear.
    pub fn other(self) -> Ear {
        match self {
            Ear::Left => Ear::Right,
            Ear::Right => Ear::Left,
        }
    }

    /// Ear chosen by trial parity: even index → Left, odd → Right.
    pub fn for_trial_index(index: u32) -> Ear {
        if index % 2 == 0 {
            Ear::Left
        } else {
            Ear::Right
        }
    }

    /// Stereo pan position for a stimulus routed to this ear (-1.0 hard left, +1.0 hard right).
    pub fn pan(self) -> f32 {
        match self {
            Ear::Left => -1.0,
            Ear::Right => 1.0,
        }
    }

    /// Upper-case label used in progress lines ("LEFT" / "RIGHT").
    pub fn label(self) -> &'static str {
        match self {
            Ear::Left => "LEFT",
            Ear::Right => "RIGHT",
        }
    }
}

impl core::fmt::Display for Ear {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_selection() {
        assert_eq!(Ear::for_trial_index(0), Ear::Left);
        assert_eq!(Ear::for_trial_index(1), Ear::Right);
        assert_eq!(Ear::for_trial_index(18), Ear::Left);
        assert_eq!(Ear::for_trial_index(19), Ear::Right);
    }

    #[test]
    fn test_other_is_involution() {
        for ear in Ear::BOTH {
            assert_ne!(ear.other(), ear);
            assert_eq!(ear.other().other(), ear);
        }
    }

    #[test]
    fn test_pan_sides() {
        assert_eq!(Ear::Left.pan(), -1.0);
        assert_eq!(Ear::Right.pan(), 1.0);
    }
}
