use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use trgnexus_db::{DatabaseSettings, create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let settings = DatabaseSettings::from_env().ok_or_else(|| {
        eyre!("Set trgnexus_POSTGRES_URL, POSTGRES_URL or DATABASE_URL to run migrations")
    })?;

    println!("Connecting to database...");
    let db_pool = create_pool(&settings, 1).await?;

    println!("Initializing database schema...");
    initialize_database(&db_pool).await?;
    db_pool.close().await;
    println!("Database schema initialized successfully.");

    Ok(())
}
