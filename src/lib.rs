pub mod debug;
pub mod element;
pub mod errors;
pub mod heap;
pub mod options;
pub mod script;

pub use element::HeapElement;
pub use errors::PQueueError;
pub use heap::PQueue;
