pub mod lifecycle;
pub mod notice;
pub mod preview;
pub mod tools;

#[cfg(test)]
mod testing;

pub use lifecycle::{Lifecycle, Outcome};
pub use notice::{notice_channel, Notice, NoticeLevel, NoticeReceiver, NoticeSender};
pub use preview::PreviewDocument;
pub use tools::{AnalyzeTool, ChatTool, GenerateTool, ReviewTool, SummarizeTool};
