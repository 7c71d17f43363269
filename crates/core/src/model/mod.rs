pub mod observed;

pub use observed::{
    LazyImage, NavLink, Observed, ObservedElement, ProgressBar, StatCounter, TriggerState,
};
