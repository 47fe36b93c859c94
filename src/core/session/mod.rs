//! Render orchestration: one in-flight render per session, one outcome per call.

pub mod render_outcome;
pub mod render_session;

pub use render_outcome::{RenderError, RenderOutcome};
pub use render_session::RenderSession;
