use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct PuppyDoc {
    pub id: i64,
    pub name: String,
    pub breed: String,
    pub owner: String,
    pub image: String,
}

#[derive(ToSchema)]
pub struct PuppyDataDoc { pub puppies: Vec<PuppyDoc> }

#[derive(ToSchema)]
pub struct PuppyInputDoc {
    /// Optional; must equal the path id when present.
    pub id: Option<i64>,
    pub name: String,
    pub breed: String,
    pub owner: String,
    pub image: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::puppies::list_puppies,
        crate::routes::puppies::get_puppy,
        crate::routes::puppies::update_puppy,
    ),
    components(
        schemas(
            HealthResponse,
            PuppyDoc,
            PuppyDataDoc,
            PuppyInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "puppies")
    )
)]
pub struct ApiDoc;
