use crate::core::data::colour::Colour;
use crate::core::data::sample_result::SampleResult;

/// Turns a classified sample into a pixel colour.
pub trait ColourMap: Send + Sync {
    fn map(&self, sample: SampleResult) -> Colour;
}
