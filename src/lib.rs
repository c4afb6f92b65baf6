pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::order_service::OrderService;
pub use db::{create_pool, DbPool};
pub use infrastructure::{DieselOrderRepository, InMemoryOrderRepository};

use errors::AppError;
use handlers::orders;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::create_order,
        orders::find_by_customer,
        orders::find_by_order_id,
        orders::delete_order,
        orders::submit_return,
    ),
    components(schemas(
        orders::CreateOrderRequest,
        orders::OrderItemRequest,
        orders::PaymentRequest,
        orders::AddressRequest,
        orders::ReturnRequest,
        orders::CreateOrderResponse,
        orders::MessageResponse,
        orders::OrderResponse,
        orders::OrderItemResponse,
        orders::PaymentResponse,
        orders::AddressResponse,
    )),
    tags((name = "orders", description = "Customer orders and item returns"))
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Registers the `/orders` routes. Expects a `web::Data<OrderService>` in the
/// app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

    cfg.service(
        web::scope("/orders")
            .app_data(json_config)
            .route("", web::post().to(orders::create_order))
            .route("/return", web::put().to(orders::submit_return))
            .route("/order/{order_id}", web::get().to(orders::find_by_order_id))
            .route("/{customer_id}", web::get().to(orders::find_by_customer))
            .route("/{order_id}", web::delete().to(orders::delete_order)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: OrderService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(service);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(routes)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
    })
    .bind((host.to_string(), port))?
    .run())
}
