use customer_orders::config::{AppConfig, StoreKind};
use customer_orders::{
    build_server, create_pool, run_migrations, DieselOrderRepository, InMemoryOrderRepository,
    OrderService,
};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let service = match (config.store, config.database_url.as_deref()) {
        (StoreKind::Postgres, Some(database_url)) => {
            let pool = create_pool(database_url).map_err(std::io::Error::other)?;
            run_migrations(&pool).map_err(std::io::Error::other)?;
            OrderService::new(DieselOrderRepository::new(pool))
        }
        (StoreKind::Postgres, None) => {
            return Err(std::io::Error::other("DATABASE_URL must be set"));
        }
        (StoreKind::Memory, _) => {
            log::warn!("Using the in-memory order store; orders are lost on shutdown");
            OrderService::new(InMemoryOrderRepository::new())
        }
    };

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(service, &config.host, config.port)?.await
}
