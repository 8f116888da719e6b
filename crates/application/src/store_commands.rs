//! Store catalogue and inventory commands.

use common::StoreId;
use domain::{Aggregate, DomainError, Product, Result, Store};
use event_bus::EventPublisher;
use repository::{StoreRepository, UnitOfWork, UnitOfWorkFactory};

use crate::commands::{
    AddInventory, AddProduct, CreateStore, DeactivateProduct, UpdateProductPrice,
};
use crate::transaction::{finish, publish_committed};

/// Handles the commands that change a store outside of order placement.
///
/// Each command runs under the store's lock, so restocking interleaves
/// safely with concurrent reservations.
pub struct StoreCommandHandler<F, P> {
    uow_factory: F,
    publisher: P,
}

impl<F, P> StoreCommandHandler<F, P>
where
    F: UnitOfWorkFactory,
    P: EventPublisher,
{
    pub fn new(uow_factory: F, publisher: P) -> Self {
        Self {
            uow_factory,
            publisher,
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(name = %cmd.name))]
    pub async fn create_store(&self, cmd: CreateStore) -> Result<Store> {
        let mut store = Store::new(cmd.name, cmd.location, &cmd.currency)?;

        let uow = self.uow_factory.create();
        uow.begin()?;
        let saved = uow.stores().save(&store).await;
        finish(&uow, saved)?;

        publish_committed(&self.publisher, store.pull_events()).await;
        tracing::info!(store_id = %store.id(), "Store created");
        Ok(store)
    }

    #[tracing::instrument(skip(self, cmd), fields(store_id = %cmd.store_id, name = %cmd.name))]
    pub async fn add_product(&self, cmd: AddProduct) -> Result<Product> {
        let (_, product) = self
            .with_store(cmd.store_id, |store| {
                Ok(store.add_product(&cmd.name, &cmd.description, cmd.price)?)
            })
            .await?;
        tracing::info!(product_id = %product.id(), "Product added");
        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_inventory(&self, cmd: AddInventory) -> Result<u32> {
        let (store, ()) = self
            .with_store(cmd.store_id, |store| {
                Ok(store.add_inventory(cmd.product_id, cmd.quantity)?)
            })
            .await?;
        let level = store.available_quantity(cmd.product_id)?;
        tracing::info!(level, "Inventory added");
        Ok(level)
    }

    #[tracing::instrument(
        skip(self, cmd),
        fields(store_id = %cmd.store_id, product_id = %cmd.product_id)
    )]
    pub async fn update_product_price(&self, cmd: UpdateProductPrice) -> Result<Product> {
        let (store, ()) = self
            .with_store(cmd.store_id, |store| {
                Ok(store.update_product_price(cmd.product_id, cmd.price)?)
            })
            .await?;
        Ok(store.get_product(cmd.product_id)?.clone())
    }

    #[tracing::instrument(skip(self))]
    pub async fn deactivate_product(&self, cmd: DeactivateProduct) -> Result<()> {
        self.with_store(cmd.store_id, |store| {
            Ok(store.deactivate_product(cmd.product_id)?)
        })
        .await?;
        tracing::info!("Product deactivated");
        Ok(())
    }

    /// Runs one mutation on a locked store, saves, commits and publishes.
    async fn with_store<T, Op>(&self, store_id: StoreId, op: Op) -> Result<(Store, T)>
    where
        Op: FnOnce(&mut Store) -> Result<T> + Send,
        T: Send,
    {
        let uow = self.uow_factory.create();
        uow.begin()?;

        let outcome = async {
            let _store_lock = uow.stores().lock(store_id).await;
            let mut store = uow.stores().find_by_id(store_id).await?;
            let value = op(&mut store)?;
            uow.stores().save(&store).await?;
            Ok::<_, DomainError>((store, value))
        }
        .await;

        let (mut store, value) = finish(&uow, outcome)?;
        publish_committed(&self.publisher, store.pull_events()).await;
        Ok((store, value))
    }
}
