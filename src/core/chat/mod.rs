// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod category;
pub mod classifier;
pub mod registry;
pub mod router;

pub use category::{ChatCategory, UNKNOWN_CATEGORY};
pub use classifier::{strip_formatting, ChatClassifier, TaggedLine, CHAT_LOG_TARGET};
pub use registry::ChatCategoryRegistry;
pub use router::TagRouter;
