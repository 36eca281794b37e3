/// Where a round is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<O> {
    NotStarted,
    Running,
    Ended(O),
}

/// Round state machine shared by every game.
///
/// `NotStarted -> Running` on `start`, `Running -> Ended` on `end`, and any
/// phase back to `Running` on `restart`. Entity updates are only allowed while
/// [`Round::advancing`] is true.
#[derive(Debug, Clone)]
pub struct Round<O> {
    phase: Phase<O>,
    paused: bool,
    frames: u64,
}

impl<O: Copy> Default for Round<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Copy> Round<O> {
    pub fn new() -> Self {
        Self {
            phase: Phase::NotStarted,
            paused: false,
            frames: 0,
        }
    }

    /// Returns true if the round actually started.
    pub fn start(&mut self) -> bool {
        if matches!(self.phase, Phase::NotStarted) {
            self.phase = Phase::Running;
            log::debug!("round started");
            true
        } else {
            false
        }
    }

    /// Finish a running round. Ignored in any other phase so the first
    /// outcome recorded sticks.
    pub fn end(&mut self, outcome: O) -> bool {
        if matches!(self.phase, Phase::Running) {
            self.phase = Phase::Ended(outcome);
            self.paused = false;
            log::debug!("round ended after {} frames", self.frames);
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self) {
        self.phase = Phase::Running;
        self.paused = false;
        self.frames = 0;
    }

    /// Back to the pre-start phase (used when a game is edited, not played).
    pub fn rewind(&mut self) {
        self.phase = Phase::NotStarted;
        self.paused = false;
        self.frames = 0;
    }

    pub fn toggle_pause(&mut self) {
        if matches!(self.phase, Phase::Running) {
            self.paused = !self.paused;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }

    pub fn not_started(&self) -> bool {
        matches!(self.phase, Phase::NotStarted)
    }

    pub fn outcome(&self) -> Option<O> {
        match self.phase {
            Phase::Ended(o) => Some(o),
            _ => None,
        }
    }

    pub fn advancing(&self) -> bool {
        self.is_running() && !self.paused
    }

    /// Count a simulated frame. Only counts while advancing.
    pub fn tick(&mut self) {
        if self.advancing() {
            self.frames += 1;
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut round: Round<u8> = Round::new();
        assert!(round.not_started());
        assert!(!round.end(1), "cannot end a round that never started");
        assert!(round.start());
        assert!(!round.start());
        round.tick();
        round.tick();
        assert_eq!(round.frames(), 2);
        assert!(round.end(7));
        assert!(!round.end(9), "first outcome sticks");
        assert_eq!(round.outcome(), Some(7));
        assert!(!round.advancing());
        round.restart();
        assert!(round.is_running());
        assert_eq!(round.frames(), 0);
    }

    #[test]
    fn test_pause_only_while_running() {
        let mut round: Round<()> = Round::new();
        round.toggle_pause();
        assert!(!round.is_paused());
        round.start();
        round.toggle_pause();
        assert!(round.is_paused());
        round.tick();
        assert_eq!(round.frames(), 0);
        round.toggle_pause();
        assert!(round.advancing());
    }
}
