/*!
Host Boundary

The seam between the mediator and the host runtime: per-event sources the
mediator registers shims with, and a manually driven in-process source for
embedding and testing.
*/

pub mod source;

pub use source::{HostEvent, HostShim, ManualHostEvent};
