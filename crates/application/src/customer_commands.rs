//! Customer registration and account commands.

use common::CustomerId;
use domain::{Aggregate, Customer, CustomerError, DomainError, Email, Result};
use event_bus::EventPublisher;
use repository::{CustomerRepository, UnitOfWork, UnitOfWorkFactory};

use crate::commands::{DeactivateCustomer, RedeemPoints, RegisterCustomer, UpdateCustomerContact};
use crate::transaction::{finish, publish_committed};

/// Handles customer commands. Each runs under the customer's lock, which
/// also serialises them with loyalty accrual.
pub struct CustomerCommandHandler<F, P> {
    uow_factory: F,
    publisher: P,
}

impl<F, P> CustomerCommandHandler<F, P>
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

    /// Registers a customer. Fails with a conflict if the email is taken.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn register(&self, cmd: RegisterCustomer) -> Result<Customer> {
        let mut customer = Customer::register(&cmd.email, &cmd.first_name, &cmd.last_name)?;

        let uow = self.uow_factory.create();
        uow.begin()?;
        let saved = async {
            ensure_email_free(uow.customers(), customer.email()).await?;
            uow.customers().save(&customer).await
        }
        .await;
        finish(&uow, saved)?;

        publish_committed(&self.publisher, customer.pull_events()).await;
        tracing::info!(customer_id = %customer.id(), "Customer registered");
        Ok(customer)
    }

    #[tracing::instrument(skip(self, cmd), fields(customer_id = %cmd.customer_id))]
    pub async fn update_contact(&self, cmd: UpdateCustomerContact) -> Result<Customer> {
        self.with_customer(cmd.customer_id, |customer| {
            Ok(customer.update_contact_info(&cmd.phone_number, cmd.address)?)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn redeem_points(&self, cmd: RedeemPoints) -> Result<Customer> {
        self.with_customer(cmd.customer_id, |customer| {
            Ok(customer.redeem_points(cmd.points)?)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn deactivate(&self, cmd: DeactivateCustomer) -> Result<Customer> {
        let customer = self
            .with_customer(cmd.customer_id, |customer| Ok(customer.deactivate()?))
            .await?;
        tracing::info!("Customer deactivated");
        Ok(customer)
    }

    async fn with_customer<Op>(&self, customer_id: CustomerId, op: Op) -> Result<Customer>
    where
        Op: FnOnce(&mut Customer) -> Result<()> + Send,
    {
        let uow = self.uow_factory.create();
        uow.begin()?;

        let outcome = async {
            let _customer_lock = uow.customers().lock(customer_id).await;
            let mut customer = uow.customers().find_by_id(customer_id).await?;
            op(&mut customer)?;
            uow.customers().save(&customer).await?;
            Ok::<_, DomainError>(customer)
        }
        .await;

        let mut customer = finish(&uow, outcome)?;
        publish_committed(&self.publisher, customer.pull_events()).await;
        Ok(customer)
    }
}

async fn ensure_email_free<C: CustomerRepository>(customers: &C, email: &Email) -> Result<()> {
    match customers.find_by_email(email).await {
        Ok(_) => Err(CustomerError::EmailTaken {
            email: email.to_string(),
        }
        .into()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}
