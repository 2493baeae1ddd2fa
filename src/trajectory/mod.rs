pub mod aggregator;
pub mod metrics;
pub mod segmenter;

pub use aggregator::{Aggregator, Extremum, SpeedTieBreak, TrajectoryStats};
pub use metrics::SegmentMetrics;
pub use segmenter::{Segment, SegmentEvent, Segmenter};
