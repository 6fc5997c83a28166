//! OpenAPI documentation

use utoipa::OpenApi;

/// OpenAPI documentation for the freshdesk-export HTTP API
///
/// Served at `/openapi.json` and rendered at `/swagger-ui` when enabled.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "freshdesk-export API",
        version = "0.1.0",
        description = "Export Freshdesk ticket conversations as a CSV download",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local server")
    ),
    paths(
        crate::api::routes::export_comments,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::api::routes::ExportForm,
        crate::api::routes::LoginMode,
        crate::api::routes::GenOption,
        crate::types::TicketId,
        crate::types::TicketFailure,
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "export", description = "Ticket comment export"),
        (name = "system", description = "Health and documentation")
    )
)]
pub struct ApiDoc;
