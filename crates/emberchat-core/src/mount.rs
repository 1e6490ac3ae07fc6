use serde::{Deserialize, Serialize};

/// Mount lifecycle of the injected UI. `open`/`closed` are sub-states of
/// `mounted`; nothing transitions out of `Unmounted` except the host gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MountState {
    #[default]
    Unmounted,
    WaitingForHost,
    Mounted {
        open: bool,
    },
}

impl MountState {
    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted { .. })
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Mounted { open: true })
    }

    pub fn begin_waiting(&mut self) {
        if matches!(self, Self::Unmounted) {
            *self = Self::WaitingForHost;
        }
    }

    /// Entered by the injection engine once the UI tree exists. Re-mounting
    /// (idempotent mount, backup supervisor) preserves the open sub-state.
    pub fn mounted(&mut self) {
        if !self.is_mounted() {
            *self = Self::Mounted { open: false };
        }
    }

    pub fn toggle(&mut self) -> bool {
        if let Self::Mounted { open } = self {
            *open = !*open;
            true
        } else {
            false
        }
    }

    pub fn open(&mut self) -> bool {
        if let Self::Mounted { open } = self {
            *open = true;
            true
        } else {
            false
        }
    }

    /// Always closes when mounted, regardless of current sub-state.
    pub fn close(&mut self) -> bool {
        if let Self::Mounted { open } = self {
            *open = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_transition_out_of_unmounted_except_the_gate() {
        let mut state = MountState::Unmounted;
        assert!(!state.toggle());
        assert!(!state.open());
        assert!(!state.close());
        assert_eq!(state, MountState::Unmounted);

        state.begin_waiting();
        assert_eq!(state, MountState::WaitingForHost);
    }

    #[test]
    fn mounting_starts_closed() {
        let mut state = MountState::Unmounted;
        state.begin_waiting();
        state.mounted();
        assert!(state.is_mounted());
        assert!(!state.is_open());
    }

    #[test]
    fn toggle_flips_open_and_closed() {
        let mut state = MountState::Mounted { open: false };
        assert!(state.toggle());
        assert!(state.is_open());
        assert!(state.toggle());
        assert!(!state.is_open());
    }

    #[test]
    fn close_always_closes() {
        let mut state = MountState::Mounted { open: true };
        assert!(state.close());
        assert!(!state.is_open());
        assert!(state.close());
        assert!(!state.is_open());
    }

    #[test]
    fn remount_preserves_open_substate() {
        let mut state = MountState::Mounted { open: true };
        state.mounted();
        assert!(state.is_open());
    }
}
