use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::refuelings::index,
        crate::routes::refuelings::new,
        crate::routes::refuelings::edit,
        crate::routes::refuelings::create,
        crate::routes::refuelings::update,
        crate::routes::refuelings::destroy,
        crate::routes::auth::sign_in_form,
        crate::routes::auth::sign_in,
        crate::routes::auth::sign_up_form,
        crate::routes::auth::sign_up,
        crate::routes::auth::sign_out,
        crate::routes::api::register,
        crate::routes::api::sign_in,
        crate::routes::api::sign_out,
        crate::routes::api::validate_token,
    ),
    components(
        schemas(
            HealthResponse,
            crate::routes::refuelings::RefuelingView,
            crate::routes::refuelings::Link,
            crate::routes::refuelings::IndexPage,
            crate::routes::refuelings::FormPage,
            crate::routes::refuelings::RefuelingForm,
            crate::routes::auth::AuthPage,
            crate::routes::auth::SignInForm,
            crate::routes::auth::SignUpForm,
            crate::routes::api::UserView,
            crate::routes::api::SessionResponse,
            crate::routes::api::ValidateResponse,
            crate::routes::api::SignOutResponse,
            crate::routes::api::RegisterRequest,
            crate::routes::api::LoginRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "refuelings"),
        (name = "auth"),
        (name = "api")
    )
)]
pub struct ApiDoc;
