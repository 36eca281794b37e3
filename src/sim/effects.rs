//! Frame-counted effects granted by power-ups.

/// Set of active effects keyed by a small `Copy` kind, each with the number
/// of frames it has left.
#[derive(Debug, Clone)]
pub struct Effects<K> {
    active: Vec<(K, u32)>,
}

impl<K> Default for Effects<K> {
    fn default() -> Self {
        Self { active: Vec::new() }
    }
}

impl<K: Copy + PartialEq> Effects<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `kind` for `frames` ticks. Granting an active kind restarts
    /// its countdown. A zero-length grant is ignored.
    pub fn grant(&mut self, kind: K, frames: u32) {
        if frames == 0 {
            return;
        }
        match self.active.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = frames,
            None => self.active.push((kind, frames)),
        }
    }

    /// Advance one frame. Returns the kinds that ran out on this frame.
    pub fn tick(&mut self) -> Vec<K> {
        let mut expired = Vec::new();
        self.active.retain_mut(|(kind, left)| {
            *left -= 1;
            if *left == 0 {
                expired.push(*kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn is_active(&self, kind: K) -> bool {
        self.active.iter().any(|(k, _)| *k == kind)
    }

    pub fn remaining(&self, kind: K) -> u32 {
        self.active
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, left)| *left)
            .unwrap_or(0)
    }

    pub fn revoke(&mut self, kind: K) {
        self.active.retain(|(k, _)| *k != kind);
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        self.active.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Kind {
        Fast,
        Shield,
    }

    #[test]
    fn test_regrant_restarts_countdown() {
        let mut fx = Effects::new();
        fx.grant(Kind::Fast, 5);
        fx.tick();
        fx.tick();
        assert_eq!(fx.remaining(Kind::Fast), 3);
        fx.grant(Kind::Fast, 5);
        assert_eq!(fx.remaining(Kind::Fast), 5);
    }

    #[test]
    fn test_expiry_reports_kind_once() {
        let mut fx = Effects::new();
        fx.grant(Kind::Shield, 1);
        fx.grant(Kind::Fast, 3);
        assert_eq!(fx.tick(), vec![Kind::Shield]);
        assert!(!fx.is_active(Kind::Shield));
        assert!(fx.is_active(Kind::Fast));
        assert!(fx.tick().is_empty());
        assert_eq!(fx.tick(), vec![Kind::Fast]);
        assert!(fx.is_empty());
    }

    #[test]
    fn test_zero_frame_grant_is_ignored() {
        let mut fx: Effects<Kind> = Effects::new();
        fx.grant(Kind::Fast, 0);
        assert!(!fx.is_active(Kind::Fast));
    }

    proptest! {
        #[test]
        fn prop_effect_lasts_exactly_its_duration(frames in 1u32..2000) {
            let mut fx = Effects::new();
            fx.grant(Kind::Fast, frames);
            let mut active_frames = 0;
            while fx.is_active(Kind::Fast) {
                active_frames += 1;
                fx.tick();
                prop_assert!(active_frames <= frames);
            }
            prop_assert_eq!(active_frames, frames);
        }
    }
}
