//! One orchestrator per tool. Each owns its input, its request lifecycle
//! and a single backend call; no state is shared between tools.

pub mod analyze;
pub mod chat;
pub mod generate;
pub mod review;
pub mod summarize;

pub use analyze::AnalyzeTool;
pub use chat::ChatTool;
pub use generate::GenerateTool;
pub use review::ReviewTool;
pub use summarize::SummarizeTool;
