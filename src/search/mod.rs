//! Query orchestration: cache lookup, load-all ceiling, locus resolution and backend
//! dispatch, plus the error policy that turns failures into caller-facing responses.

pub mod error;
pub mod orchestrator;
pub mod policy;


pub use error::{SearchError, SearchResult};
pub use orchestrator::{QueryResults, SearchOrchestrator, SearchSettings, TOO_MANY_VARIANTS_MESSAGE};
pub use policy::{DEFAULT_BACKEND_STATUS, ErrorPolicy, ErrorResponse, INVALID_SEARCH_STATUS};
