use bitflags::bitflags;

bitflags! {
    /// What a single engine call did, for the caller to react to.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GameEvents: u8 {
        /// Some cell changed and the board should be redrawn.
        const CHANGED = 1 << 0;
        /// First reveal of the session, the clock should start.
        const STARTED = 1 << 1;
        /// A mine was revealed.
        const LOST = 1 << 2;
        /// The win condition became true.
        const WON = 1 << 3;
    }
}

impl GameEvents {
    pub const fn has_update(self) -> bool {
        self.contains(Self::CHANGED)
    }

    pub const fn is_finished(self) -> bool {
        self.intersects(Self::LOST.union(Self::WON))
    }

    /// Forwards the lifecycle events to `observer`, in the order they happened.
    pub fn notify<O: GameObserver + ?Sized>(self, observer: &mut O) {
        if self.contains(Self::STARTED) {
            observer.on_game_started();
        }
        if self.contains(Self::LOST) {
            observer.on_game_lost();
        }
        if self.contains(Self::WON) {
            observer.on_game_won();
        }
    }
}

/// Hooks for a presentation layer that prefers callbacks over inspecting [`GameEvents`].
pub trait GameObserver {
    fn on_game_started(&mut self) {}
    fn on_game_lost(&mut self) {}
    fn on_game_won(&mut self) {}
}
