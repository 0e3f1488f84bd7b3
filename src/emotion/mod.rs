pub mod fallback;
pub mod store;
pub mod types;

pub use fallback::synthesize_reading;
pub use store::{EmotionSnapshot, EmotionStore};
pub use types::{EmotionLabel, EmotionReading, ReadingSource, Trend, WellbeingStatus};
