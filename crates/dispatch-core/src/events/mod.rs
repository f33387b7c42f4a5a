/*!
Event Dispatch Mediation

This module implements the event lifecycle mediator that sits between the
host runtime's event sources and the application's listeners. It includes:

- An externally resolvable completion primitive
- A timeout guard that abandons waits without cancelling work
- A listener registry enforcing one listener per event type
- A queue for events that arrive before their listener exists
- Two scheduling variants behind one facade, plus a builder
*/

pub mod builder;
pub mod completion;
pub mod deferred;
pub mod mediator;
pub mod passthrough;
pub mod registry;
pub mod system;
pub mod timeout;
pub mod types;

pub use builder::{MediatorBuilder, SchedulingMode};
pub use completion::{completion_pair, Completion, CompletionHooks};
pub use deferred::{DeferredQueue, DeferredRecord};
pub use mediator::KeepaliveMediator;
pub use passthrough::PassthroughMediator;
pub use registry::ListenerRegistry;
pub use system::DispatchMediator;
pub use timeout::with_timeout;
pub use types::{
    ApplicationListener, EventType, FireAndForgetListener, HostResponse, RawEventArgs,
    RespondingListener, SyncReturn,
};
