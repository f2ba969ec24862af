use anyhow::Result;
use clap::{Parser, Subcommand};
use inventory_api::{
    product::{PriceUpdate, ProductSpec, ProductUpdate},
    BaseModel,
};
use inventory_cli::{manager::ProductManager, view::TerminalView};
use rust_decimal::Decimal;

type Id = <ProductSpec as BaseModel>::Id;
type Count = <ProductSpec as BaseModel>::Count;

#[derive(Clone, Debug, Subcommand)]
pub(crate) enum Command {
    /// List every product
    List,

    /// Show a single product
    Show(ShowArgs),

    /// Register a new product
    Add(AddArgs),

    /// Change the fields of a product
    Edit(EditArgs),

    /// Set the stock of a product
    Stock(StockArgs),

    /// Set the retail and wholesale prices of a product
    Prices(PricesArgs),

    /// Delete a product
    Delete(DeleteArgs),
}

impl Command {
    pub(crate) async fn run(self, manager: &ProductManager<TerminalView>) -> Result<()> {
        match self {
            Self::List => manager.load_products().await?,
            Self::Show(ShowArgs { id }) => manager.show_product(id).await.map(|_| ())?,
            Self::Add(args) => manager.create_product(args.into()).await.map(|_| ())?,
            Self::Edit(args) => {
                let current = manager.show_product(args.id).await?.spec();
                manager.update_product(args.apply(current)).await?
            }
            Self::Stock(StockArgs { id, stock }) => manager.update_stock(id, stock).await?,
            Self::Prices(PricesArgs {
                id,
                retail_price,
                wholesale_price,
            }) => {
                let prices = PriceUpdate {
                    retail_price,
                    wholesale_price,
                };
                manager.update_prices(id, prices).await?
            }
            Self::Delete(DeleteArgs { id, yes }) => manager.delete_product(id, yes).await?,
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
pub(crate) struct ShowArgs {
    id: Id,
}

#[derive(Clone, Debug, Parser)]
pub(crate) struct DeleteArgs {
    id: Id,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

#[derive(Clone, Debug, Parser)]
pub(crate) struct AddArgs {
    #[arg(long)]
    name: String,

    #[arg(long, default_value_t = String::new())]
    description: String,

    #[arg(long, value_name = "PRICE")]
    retail_price: Decimal,

    #[arg(long, value_name = "PRICE")]
    wholesale_price: Decimal,

    #[arg(long)]
    location: String,

    #[arg(long, allow_negative_numbers = true)]
    stock: Count,
}

impl From<AddArgs> for ProductSpec {
    fn from(value: AddArgs) -> Self {
        let AddArgs {
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        } = value;

        Self {
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        }
    }
}

/// Fields left out keep their current value.
#[derive(Clone, Debug, Parser)]
pub(crate) struct EditArgs {
    id: Id,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long, value_name = "PRICE")]
    retail_price: Option<Decimal>,

    #[arg(long, value_name = "PRICE")]
    wholesale_price: Option<Decimal>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    stock: Option<Count>,
}

impl EditArgs {
    fn apply(self, current: ProductSpec) -> ProductUpdate {
        let Self {
            id,
            name,
            description,
            retail_price,
            wholesale_price,
            location,
            stock,
        } = self;

        let spec = ProductSpec {
            name: name.unwrap_or(current.name),
            description: description.unwrap_or(current.description),
            retail_price: retail_price.unwrap_or(current.retail_price),
            wholesale_price: wholesale_price.unwrap_or(current.wholesale_price),
            location: location.unwrap_or(current.location),
            stock: stock.unwrap_or(current.stock),
        };
        ProductUpdate::new(id, spec)
    }
}

#[derive(Clone, Debug, Parser)]
pub(crate) struct StockArgs {
    id: Id,

    #[arg(allow_negative_numbers = true)]
    stock: Count,
}

#[derive(Clone, Debug, Parser)]
pub(crate) struct PricesArgs {
    id: Id,

    #[arg(long, value_name = "PRICE")]
    retail_price: Decimal,

    #[arg(long, value_name = "PRICE")]
    wholesale_price: Decimal,
}
