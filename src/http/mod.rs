mod content;
mod endpoint;
mod models;
mod transport;

pub use content::{create_preview, ContentKind};
pub use endpoint::{
    Flavor, Media, ServiceEndpoint, ValidationQuery, ValidationTarget, DEFAULT_HOST, DEFAULT_PORT,
};
pub use models::{HttpMethod, HttpValidationRequest, HttpValidationResult, ZIP_CONTENT_TYPE};
pub(crate) use transport::execute;
