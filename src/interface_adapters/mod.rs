// Interface adapters: HTTP gateway, response normalization, resource APIs and storage.

pub mod api;
pub mod gateway;
pub mod response;
pub mod storage;

pub use api::payments::PollUpdate;
pub use gateway::{ApiGateway, CallOptions, ConnectionStatus, RequestDescriptor};
pub use response::NormalizedResponse;
pub use storage::{FileStorage, MemoryStorage};
