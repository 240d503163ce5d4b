//! Domain services: pure logic over entities and ports

mod change_detector;
mod resolver;

pub use change_detector::{ChangeDetector, DetectionReport};
pub use resolver::TemplateResolver;
