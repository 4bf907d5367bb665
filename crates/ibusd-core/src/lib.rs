//! Directive routing and CD-changer emulation core
//!
//! This crate holds the decision logic of the ibusd daemon. Inbound
//! packets from the shared bus are matched against a static, three-level
//! directive table keyed by source device, destination device, and
//! payload signature; a match runs the corresponding handler against a
//! set of collaborator interfaces (bus writer, audio player, cluster
//! display, telemetry publisher).
//!
//! The pieces, leaf first:
//!
//! - [`DirectiveTable`]: immutable rule set mapping
//!   `src -> dst -> payload signature -> handler`, with a per-destination
//!   wildcard that always wins over exact signatures.
//! - [`MatchOutcome`]: result of routing one packet; absence of a rule
//!   is expected traffic, not an error.
//! - [`Registration`]: whether the radio has polled us yet. While it
//!   has not, every unrouted packet re-announces the device.
//! - [`Dispatcher`]: routes packets and runs the matched handler;
//!   collaborator failures are logged and contained, never escalated.
//! - [`SpeedTrigger`]: switches playback to a designated track when the
//!   observed road speed crosses a threshold.
//!
//! Processing is strictly sequential: one packet is routed and fully
//! handled before the next is accepted, so no locking is needed around
//! the registration state.

mod constants;
mod directives;
mod dispatch;
mod error;
mod registration;
mod speed;
mod traits;

pub use constants::*;
pub use directives::*;
pub use dispatch::*;
pub use error::*;
pub use registration::*;
pub use speed::*;
pub use traits::*;
