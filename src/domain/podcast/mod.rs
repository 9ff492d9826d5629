pub mod dto;
pub mod error;
pub mod service;

pub use dto::{GenerateRequest, GenerateResponse, TestApiResponse};
pub use error::PodcastServiceError;
pub use service::{PodcastResult, PodcastService, PodcastServiceApi, Readiness};
