//! Size, activity and strategic-quadrant segmentation of the cohort.

pub mod classification;
pub mod segments;

pub use classification::{BusinessModel, SizeClass, Specialization};
pub use segments::{segment_companies, CompanySegment, SegmentationOutput};
