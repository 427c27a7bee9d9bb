// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod ingress;
pub mod outbound;
pub mod selection;
#[allow(clippy::module_inception)]
pub mod session;

pub use ingress::{SessionIngress, SessionTask};
pub use outbound::{CommandSink, OutboundQueue};
pub use selection::Selection;
pub use session::{Session, DEFAULT_DIMENSION};
