use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use model::entities::city;
use sea_orm::{sea_query::OnConflict, Database, EntityTrait, Set};
use serde::Deserialize;
use tracing::info;

/// One city record in the seed file.
#[derive(Debug, Deserialize)]
struct CityRecord {
    code: String,
    name: String,
    state: String,
}

/// Load City reference data from a JSON array of {code, name, state}
/// records. Codes that already exist are left untouched.
pub async fn seed_cities(json_path: &str, database_url: &str) -> Result<()> {
    info!("Seeding cities from {} into {}", json_path, database_url);

    let contents = std::fs::read_to_string(json_path)
        .with_context(|| format!("failed to read seed file {json_path}"))?;
    let records: Vec<CityRecord> =
        serde_json::from_str(&contents).context("seed file is not a JSON array of cities")?;

    if records.is_empty() {
        info!("Seed file contains no cities, nothing to do");
        return Ok(());
    }

    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;

    let count = records.len();
    let models = records.into_iter().map(|record| city::ActiveModel {
        code: Set(record.code),
        name: Set(record.name),
        state: Set(record.state),
    });

    let inserted = city::Entity::insert_many(models)
        .on_conflict(
            OnConflict::column(city::Column::Code)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&db)
        .await?;

    info!(
        "Processed {} cities: {} inserted, {} already present",
        count,
        inserted,
        count as u64 - inserted
    );
    Ok(())
}
