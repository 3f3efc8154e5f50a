//! Schema-driven example synthesis
//!
//! Fabricates plausible example payloads from OpenAPI schema trees and
//! splices them into a normalized document's response bodies.

pub mod augmenter;
pub mod error;
pub mod faker;
pub mod pipeline;
pub mod synthesizer;

pub use augmenter::{augment, AugmentStats, EXAMPLE_NAME, HTTP_METHODS, JSON_MEDIA_TYPE};
pub use error::{AugmentError, MockError, SynthesisError};
pub use faker::{classify_field, fake_string, FieldKind};
pub use pipeline::{MockConfig, MockPipeline, OutputFormat};
pub use synthesizer::{synthesize, CyclePolicy, SynthesisOptions, Synthesizer};
