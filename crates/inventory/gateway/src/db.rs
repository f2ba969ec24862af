use anyhow::{anyhow, Result};
use chrono::{NaiveDateTime, SubsecRound, Utc};
use clap::Parser;
use inventory_api::{
    error::ProductError,
    product::{PriceUpdate, Product, ProductSpec},
    validation::{validate_stock, Validate},
    BaseModel,
};
use migration::MigratorTrait;
use sea_orm::{DbErr, DeleteResult, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, Level};

type Id = <ProductSpec as BaseModel>::Id;
type Count = <ProductSpec as BaseModel>::Count;

/// The product service, backed by a sea-orm connection pool.
#[derive(Clone)]
pub struct Database {
    connection: ::sea_orm::DatabaseConnection,
}

impl Database {
    #[instrument(level = Level::INFO, skip(args))]
    pub async fn try_new(args: DatabaseArgs) -> Result<Self> {
        let DatabaseArgs {
            db_endpoint,
            db_max_connections,
        } = args;

        let mut opt = ::sea_orm::ConnectOptions::new(db_endpoint.clone());
        opt.sqlx_logging(false);
        if db_endpoint.starts_with("sqlite::memory:") {
            // every pooled connection would open its own empty database
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(db_max_connections);
        }

        let connection = ::sea_orm::Database::connect(opt)
            .await
            .map_err(|error| anyhow!("failed to connect to the inventory db: {error}"))?;

        let steps = None;
        ::migration::Migrator::up(&connection, steps)
            .await
            .map_err(|error| anyhow!("failed to upgrade the inventory db: {error}"))?;

        Ok(Self { connection })
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn close(self) -> Result<()> {
        self.connection
            .close()
            .await
            .map_err(|error| anyhow!("failed to close the inventory db: {error}"))
    }
}

impl Database {
    #[instrument(level = Level::INFO, skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        let col_created_at = entity::product::Column::CreatedAt;
        let dsl = entity::product::Entity::find().order_by_asc(col_created_at);

        dsl.all(&self.connection)
            .await
            .map(|models| models.into_iter().map(Into::into).collect())
            .map_err(self::error::from_db)
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn get_product(&self, prod_id: Id) -> Result<Option<Product>, ProductError> {
        let dsl = entity::product::Entity::find_by_id(prod_id);

        dsl.one(&self.connection)
            .await
            .map(|model| model.map(Into::into))
            .map_err(self::error::from_db)
    }

    #[instrument(level = Level::INFO, skip(self, spec))]
    pub async fn insert_product(&self, spec: ProductSpec) -> Result<Product, ProductError> {
        spec.validate()?;

        let prod_id = Id::new_v4();
        let now = self::now();
        let model = entity::product::ActiveModel::from_spec(spec.clone(), prod_id, now)
            .map_err(ProductError::Database)?;
        let dsl = entity::product::Entity::insert(model);

        dsl.exec_without_returning(&self.connection)
            .await
            .map_err(self::error::from_db)?;
        debug!("created product: {prod_id}");

        let ProductSpec {
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        } = spec;
        let timestamp = now.and_utc();
        Ok(Product {
            id: prod_id,
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    #[instrument(level = Level::INFO, skip(self, spec))]
    pub async fn update_product(&self, prod_id: Id, spec: ProductSpec) -> Result<(), ProductError> {
        spec.validate()?;

        let model = entity::product::ActiveModel::from_spec_update(spec, prod_id, self::now())
            .map_err(ProductError::Database)?;
        self.update(prod_id, model).await
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn update_stock(&self, prod_id: Id, stock: Count) -> Result<(), ProductError> {
        validate_stock(stock)?;

        let model = entity::product::ActiveModel::from_stock(prod_id, stock, self::now());
        self.update(prod_id, model).await
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn update_prices(
        &self,
        prod_id: Id,
        prices: PriceUpdate,
    ) -> Result<(), ProductError> {
        prices.validate()?;

        let model = entity::product::ActiveModel::from_prices(prod_id, prices, self::now())
            .map_err(ProductError::Database)?;
        self.update(prod_id, model).await
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn remove_product(&self, prod_id: Id) -> Result<(), ProductError> {
        let dsl = entity::product::Entity::delete_by_id(prod_id);

        match dsl.exec(&self.connection).await {
            Ok(DeleteResult { rows_affected: 0 }) => Err(ProductError::NotFound(prod_id)),
            Ok(DeleteResult { rows_affected: _ }) => Ok(()),
            Err(error) => Err(self::error::from_db(error)),
        }
    }

    async fn update(
        &self,
        prod_id: Id,
        model: entity::product::ActiveModel,
    ) -> Result<(), ProductError> {
        let dsl = entity::product::Entity::update(model);

        // the update reports a missing row instead of silently touching nothing
        match dsl.exec(&self.connection).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated | DbErr::RecordNotFound(_)) => {
                Err(ProductError::NotFound(prod_id))
            }
            Err(error) => Err(self::error::from_db(error)),
        }
    }
}

/// Current time at the precision every supported backend can store.
fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

#[derive(Clone, Debug, Serialize, Deserialize, Parser)]
#[clap(rename_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub struct DatabaseArgs {
    #[arg(
        long,
        env = "INVENTORY_DB_ENDPOINT",
        value_name = "URL",
        default_value_t = DatabaseArgs::default_db_endpoint(),
    )]
    #[serde(default = "DatabaseArgs::default_db_endpoint")]
    pub db_endpoint: String,

    #[arg(
        long,
        env = "INVENTORY_DB_MAX_CONNECTIONS",
        value_name = "COUNT",
        default_value_t = DatabaseArgs::default_db_max_connections(),
    )]
    #[serde(default = "DatabaseArgs::default_db_max_connections")]
    pub db_max_connections: u32,
}

impl Default for DatabaseArgs {
    fn default() -> Self {
        Self {
            db_endpoint: Self::default_db_endpoint(),
            db_max_connections: Self::default_db_max_connections(),
        }
    }
}

impl DatabaseArgs {
    fn default_db_endpoint() -> String {
        "sqlite::memory:".into()
    }

    const fn default_db_max_connections() -> u32 {
        10
    }
}

mod error {
    use inventory_api::error::ProductError;
    use sea_orm::DbErr;
    use tracing::error;

    pub(super) fn from_db(error: DbErr) -> ProductError {
        error!("failed to query the inventory db: {error}");
        ProductError::Database(error.into())
    }
}
