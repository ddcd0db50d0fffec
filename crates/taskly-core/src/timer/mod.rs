mod engine;
mod mode;
mod ticker;

pub use engine::{Completion, Tick, TimerEngine, TimerState};
pub use mode::{TimerMode, FOCUS_SESSION_MINUTES, FOCUS_SESSION_POINTS, LONG_BREAK_INTERVAL};
pub use ticker::{ManualTicker, ManualTickerProbe, TickHandle, TickId, TickScheduler, TokioTicker};
