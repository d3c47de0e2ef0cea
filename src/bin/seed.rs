//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires the `DATABASE_URL` environment variable (reads .env).

use agro_registry::models::crop::CreateCrop;
use agro_registry::models::farm::CreateFarm;
use agro_registry::models::producer::CreateProducer;
use agro_registry::models::season::CreateSeason;
use agro_registry::repositories::Repositories;
use agro_registry::services::Services;
use anyhow::Context;
use chrono::NaiveDate;
use uuid::Uuid;

const PRODUCERS: [(&str, &str); 5] = [
    ("José Silva", "12345678901"),
    ("Maria Oliveira", "23456789012"),
    ("Carlos Pereira", "34567890123"),
    ("Ana Souza", "45678901234"),
    ("Fernando Lima", "56789012345"),
];

/// Name, start and end date.
const SEASONS: [(&str, &str, &str); 4] = [
    ("Safra Verão 2021/22", "2021-10-01", "2022-04-30"),
    ("Safra Inverno 2022", "2022-05-10", "2022-09-20"),
    ("Safra 2023", "2023-01-20", "2023-11-25"),
    ("Safra 2024", "2024-03-15", "2024-12-18"),
];

/// Name, city, state, total, arable, vegetation, owner index.
const FARMS: [(&str, &str, &str, f64, f64, f64, usize); 8] = [
    ("Fazenda Boa Vista", "Campina Grande", "PB", 200.0, 140.0, 60.0, 0),
    ("Sítio Esperança", "Patos", "PB", 95.0, 65.0, 30.0, 0),
    ("Chácara Luz", "Juazeiro", "BA", 180.0, 120.0, 60.0, 1),
    ("Fazenda Horizonte", "Mossoró", "RN", 150.0, 90.0, 60.0, 2),
    ("Estância Verde", "Caruaru", "PE", 210.0, 165.0, 45.0, 3),
    ("Sítio Paraíso", "Garanhuns", "PE", 80.0, 58.0, 22.0, 3),
    ("Fazenda Santa Clara", "Uberaba", "MG", 300.0, 220.0, 80.0, 4),
    ("Chácara Monte Azul", "Londrina", "PR", 130.0, 100.0, 30.0, 4),
];

/// Crop name, farm index, season index.
const CROPS: [(&str, usize, usize); 16] = [
    ("Milho", 0, 0),
    ("Soja", 0, 2),
    ("Feijão", 1, 2),
    ("Girassol", 1, 1),
    ("Algodão", 2, 3),
    ("Arroz", 2, 0),
    ("Milho", 3, 0),
    ("Soja", 3, 1),
    ("Cana-de-açúcar", 4, 2),
    ("Café", 4, 3),
    ("Mandioca", 5, 3),
    ("Feijão", 5, 1),
    ("Soja", 6, 0),
    ("Algodão", 6, 2),
    ("Cevada", 7, 1),
    ("Trigo", 7, 3),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = agro_registry::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    agro_registry::db::run_migrations(&pool).await?;

    println!("=== Agro Registry Seed Script ===");

    let services = Services::new(Repositories::postgres(pool));
    if !services.producers.list().await?.is_empty() {
        println!("[skip] Producers already exist, database left untouched");
        return Ok(());
    }

    let producers = seed_producers(&services).await?;
    let seasons = seed_seasons(&services).await?;
    let farms = seed_farms(&services, &producers).await?;
    seed_crops(&services, &farms, &seasons).await?;

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn seed_producers(services: &Services) -> anyhow::Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(PRODUCERS.len());
    for (name, document) in PRODUCERS {
        let producer = services
            .producers
            .create(CreateProducer {
                name: name.to_string(),
                document: document.to_string(),
            })
            .await?;
        ids.push(producer.id);
    }
    println!("[done] Created {} producers", ids.len());
    Ok(ids)
}

async fn seed_seasons(services: &Services) -> anyhow::Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(SEASONS.len());
    for (name, start, end) in SEASONS {
        let season = services
            .seasons
            .create(CreateSeason {
                name: name.to_string(),
                start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d")?,
                end_date: NaiveDate::parse_from_str(end, "%Y-%m-%d")?,
            })
            .await?;
        ids.push(season.id);
    }
    println!("[done] Created {} seasons", ids.len());
    Ok(ids)
}

async fn seed_farms(services: &Services, producers: &[Uuid]) -> anyhow::Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(FARMS.len());
    for (name, city, state, total, arable, vegetation, owner) in FARMS {
        let farm = services
            .farms
            .create(CreateFarm {
                producer_id: producers[owner],
                name: name.to_string(),
                city: Some(city.to_string()),
                state: Some(state.to_string()),
                total_area: total,
                arable_area: arable,
                vegetation_area: vegetation,
            })
            .await?;
        ids.push(farm.id);
    }
    println!("[done] Created {} farms", ids.len());
    Ok(ids)
}

async fn seed_crops(services: &Services, farms: &[Uuid], seasons: &[Uuid]) -> anyhow::Result<()> {
    for (name, farm, season) in CROPS {
        services
            .crops
            .create(CreateCrop {
                name: name.to_string(),
                season_id: seasons[season],
                farm_id: farms[farm],
            })
            .await?;
    }
    println!("[done] Created {} crops", CROPS.len());
    Ok(())
}
