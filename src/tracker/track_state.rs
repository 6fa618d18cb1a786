/// Track status, derived from the miss and age counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Spawned this tick, never matched
    #[default]
    Tentative,
    /// Matched a detection on the latest tick
    Tracked,
    /// Running on prediction through one or more missed ticks
    Coasting,
}
