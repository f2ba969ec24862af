//! Login state, alerts and product actions behind the terminal front-end.
//!
//! Every mutating action runs at most once at a time: while one is in
//! flight, another fails fast with [`ManagerError::Busy`] and makes no
//! network call.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use inventory_api::{
    product::{PriceUpdate, Product, ProductSpec, ProductUpdate},
    validation::{validate_stock, Validate, ValidationError},
    BaseModel,
};
use inventory_client::{ClientError, ProductClient};
use thiserror::Error;
use tracing::{instrument, warn, Level as LogLevel};

use crate::view::{Level, View, ViewState};

type Id = <ProductSpec as BaseModel>::Id;
type Count = <ProductSpec as BaseModel>::Count;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this product?";

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("another action is still in progress")]
    Busy,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("not logged in")]
    LoggedOut,
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub struct ProductManager<V> {
    client: ProductClient,
    processing: AtomicBool,
    state: Mutex<ViewState>,
    view: Mutex<V>,
}

impl<V> ProductManager<V>
where
    V: View,
{
    pub fn new(client: ProductClient, view: V) -> Self {
        Self {
            client,
            processing: AtomicBool::new(false),
            state: Mutex::new(ViewState::LoggedOut),
            view: Mutex::new(view),
        }
    }

    pub fn state(&self) -> ViewState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    pub fn into_view(self) -> V {
        self.view.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Picks the screen matching the stored credential.
    pub fn resume(&self) -> ViewState {
        let state = if self.client.is_logged_in() {
            ViewState::LoggedIn
        } else {
            ViewState::LoggedOut
        };
        self.show_view(state);
        state
    }

    #[instrument(level = LogLevel::INFO, skip(self))]
    pub async fn start(&self) -> Result<(), ManagerError> {
        match self.resume() {
            ViewState::LoggedIn => self.load_products().await,
            ViewState::LoggedOut => Ok(()),
        }
    }

    #[instrument(level = LogLevel::INFO, skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ManagerError> {
        let _guard = self.begin()?;

        match self.client.login(username, password).await {
            Ok(()) => {
                self.show_view(ViewState::LoggedIn);
                self.alert(Level::Success, "Logged in successfully");
            }
            Err(error) => {
                let message = match &error {
                    ClientError::Unauthorized => "Invalid username or password".to_string(),
                    error => format!("Login failed: {error}"),
                };
                self.alert(Level::Danger, &message);
                return Err(error.into());
            }
        }
        self.load_products().await
    }

    #[instrument(level = LogLevel::INFO, skip(self))]
    pub fn logout(&self) -> Result<(), ManagerError> {
        let _guard = self.begin()?;

        self.client.logout()?;
        self.show_view(ViewState::LoggedOut);
        self.alert(Level::Info, "Logged out successfully");
        Ok(())
    }

    #[instrument(level = LogLevel::INFO, skip(self))]
    pub async fn load_products(&self) -> Result<(), ManagerError> {
        self.with_view(|view| view.show_loading(true));
        let result = self.client.list_products().await;
        self.with_view(|view| view.show_loading(false));

        match result {
            Ok(products) => {
                self.with_view(|view| view.render_products(&products));
                Ok(())
            }
            Err(error) => Err(self.fail(error, "Failed to load products")),
        }
    }

    #[instrument(level = LogLevel::INFO, skip(self))]
    pub async fn show_product(&self, prod_id: Id) -> Result<Product, ManagerError> {
        match self.client.get_product(prod_id).await {
            Ok(product) => {
                self.with_view(|view| view.render_products(::std::slice::from_ref(&product)));
                Ok(product)
            }
            Err(error) => Err(self.fail(error, "Failed to load the product")),
        }
    }

    #[instrument(level = LogLevel::INFO, skip(self, spec))]
    pub async fn create_product(&self, spec: ProductSpec) -> Result<Product, ManagerError> {
        let _guard = self.begin()?;
        self.check(&spec)?;

        let product = self
            .client
            .create_product(&spec)
            .await
            .map_err(|error| self.fail(error, "Failed to create the product"))?;
        self.done("Product created successfully").await;
        Ok(product)
    }

    #[instrument(level = LogLevel::INFO, skip(self, update), fields(prod_id = %update.id))]
    pub async fn update_product(&self, update: ProductUpdate) -> Result<(), ManagerError> {
        let _guard = self.begin()?;
        self.check(&update)?;

        self.client
            .update_product(&update)
            .await
            .map_err(|error| self.fail(error, "Failed to update the product"))?;
        self.done("Product updated successfully").await;
        Ok(())
    }

    #[instrument(level = LogLevel::INFO, skip(self))]
    pub async fn update_stock(&self, prod_id: Id, stock: Count) -> Result<(), ManagerError> {
        let _guard = self.begin()?;
        self.check_with(|| validate_stock(stock))?;

        self.client
            .update_stock(prod_id, stock)
            .await
            .map_err(|error| self.fail(error, "Failed to update the stock"))?;
        self.done("Stock updated successfully").await;
        Ok(())
    }

    #[instrument(level = LogLevel::INFO, skip(self))]
    pub async fn update_prices(&self, prod_id: Id, prices: PriceUpdate) -> Result<(), ManagerError> {
        let _guard = self.begin()?;
        self.check(&prices)?;

        self.client
            .update_prices(prod_id, &prices)
            .await
            .map_err(|error| self.fail(error, "Failed to update the prices"))?;
        self.done("Prices updated successfully").await;
        Ok(())
    }

    /// Asks the view for confirmation first unless `confirmed` is set.
    #[instrument(level = LogLevel::INFO, skip(self))]
    pub async fn delete_product(&self, prod_id: Id, confirmed: bool) -> Result<(), ManagerError> {
        let _guard = self.begin()?;
        if !confirmed && !self.with_view(|view| view.confirm(DELETE_CONFIRMATION)) {
            self.alert(Level::Info, "Deletion cancelled");
            return Ok(());
        }

        self.client
            .delete_product(prod_id)
            .await
            .map_err(|error| self.fail(error, "Failed to delete the product"))?;
        self.done("Product deleted successfully").await;
        Ok(())
    }
}

impl<V> ProductManager<V>
where
    V: View,
{
    fn begin(&self) -> Result<ProcessingGuard<'_>, ManagerError> {
        self.processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ProcessingGuard(&self.processing))
            .map_err(|_| ManagerError::Busy)
    }

    fn check(&self, input: &impl Validate) -> Result<(), ManagerError> {
        self.check_with(|| input.validate())
    }

    fn check_with(
        &self,
        validate: impl FnOnce() -> Result<(), ValidationError>,
    ) -> Result<(), ManagerError> {
        validate().map_err(|error| {
            self.alert(Level::Warning, &error.to_string());
            error.into()
        })
    }

    /// Refreshes the grid after a successful mutation.
    async fn done(&self, message: &str) {
        if let Err(error) = self.load_products().await {
            warn!("failed to reload products: {error}");
        }
        if self.state() == ViewState::LoggedIn {
            self.alert(Level::Success, message);
        }
    }

    fn fail(&self, error: ClientError, message: &str) -> ManagerError {
        match error {
            ClientError::Unauthorized => {
                self.show_view(ViewState::LoggedOut);
                self.alert(Level::Warning, SESSION_EXPIRED_MESSAGE);
                ManagerError::LoggedOut
            }
            error => {
                warn!("{message}: {error}");
                self.alert(Level::Danger, message);
                error.into()
            }
        }
    }

    fn show_view(&self, state: ViewState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        self.with_view(|view| view.show_view(state));
    }

    fn alert(&self, level: Level, message: &str) {
        self.with_view(|view| view.show_alert(level, message));
    }

    fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.view.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
