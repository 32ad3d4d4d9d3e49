//! Integration tests: full search → price → advise → portfolio flow
//! against deterministic in-memory sources.

mod mock_sources;
mod scenario;
