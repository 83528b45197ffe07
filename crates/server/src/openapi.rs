use utoipa::OpenApi;

use crate::api::handlers::{CreateFeedRequest, CreateFeedResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recast API",
        version = "1.0.0"
    ),
    tags(
        (name = "feeds", description = "Feed registration and serving endpoints")
    ),
    components(schemas(
        CreateFeedRequest,
        CreateFeedResponse
    ))
)]
pub struct ApiDoc;
