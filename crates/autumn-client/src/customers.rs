//! Customers resource.

use reqwest::Method;

use autumn_core::{
    CreateCustomerParams, Customer, CustomerData, CustomerExpand, CustomerId, CustomerList,
    ListCustomersParams, UpdateCustomerParams,
};

use crate::client::AutumnClient;
use crate::error::ClientError;

/// Outcome of [`Customers::get_or_create`].
#[derive(Debug, Clone)]
pub struct GetOrCreate {
    /// The existing or newly created customer.
    pub customer: Customer,
    /// Whether this call created the customer.
    pub created: bool,
}

impl GetOrCreate {
    /// Discard the created flag.
    #[must_use]
    pub fn into_customer(self) -> Customer {
        self.customer
    }
}

/// Customer operations, borrowed from an [`AutumnClient`].
#[derive(Debug, Clone, Copy)]
pub struct Customers<'a> {
    client: &'a AutumnClient,
}

impl<'a> Customers<'a> {
    pub(crate) fn new(client: &'a AutumnClient) -> Self {
        Self { client }
    }

    /// Fetch a customer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CustomerNotFound`] if the customer does not
    /// exist, or another error if the request fails.
    pub async fn get(
        &self,
        id: &CustomerId,
        expand: &[CustomerExpand],
    ) -> Result<Customer, ClientError> {
        let mut request = self
            .client
            .request(Method::GET, &format!("/customers/{id}"));
        if let Some(expand) = CustomerExpand::join(expand) {
            request = request.query(&[("expand", expand)]);
        }

        self.client.send(request, Some(id.as_str())).await
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn create(
        &self,
        params: &CreateCustomerParams,
        expand: &[CustomerExpand],
    ) -> Result<Customer, ClientError> {
        let mut request = self.client.request(Method::POST, "/customers").json(params);
        if let Some(expand) = CustomerExpand::join(expand) {
            request = request.query(&[("expand", expand)]);
        }

        let customer: Customer = self
            .client
            .send(request, params.id.as_ref().map(CustomerId::as_str))
            .await?;

        tracing::info!(customer_id = ?customer.id, "Created Autumn customer");
        Ok(customer)
    }

    /// Fetch a customer, creating it with `data` if it does not exist yet.
    ///
    /// When the customer already exists, a blank name or email is filled in
    /// from `data`; fields the customer already has are left alone. If another
    /// caller creates the same customer between the lookup and the create,
    /// the customer is fetched again rather than failing.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails for a reason other than the
    /// customer being missing or already existing.
    pub async fn get_or_create(
        &self,
        id: &CustomerId,
        data: Option<CustomerData>,
    ) -> Result<GetOrCreate, ClientError> {
        let data = data.unwrap_or_default();

        match self.get(id, &[]).await {
            Ok(customer) => {
                tracing::debug!(customer_id = %id, "Customer already exists");
                let customer = self.fill_missing_details(id, customer, &data).await?;
                return Ok(GetOrCreate {
                    customer,
                    created: false,
                });
            }
            Err(err) if err.is_not_found() => {
                tracing::info!(customer_id = %id, "No customer found, creating new");
            }
            Err(err) => return Err(err),
        }

        let params = CreateCustomerParams::new(id.clone(), data);
        match self.create(&params, &[]).await {
            Ok(customer) => Ok(GetOrCreate {
                customer,
                created: true,
            }),
            Err(ClientError::CustomerAlreadyExists { .. }) => {
                tracing::debug!(customer_id = %id, "Customer created concurrently, fetching");
                let customer = self.get(id, &[]).await?;
                let customer = self
                    .fill_missing_details(id, customer, &params.data)
                    .await?;
                Ok(GetOrCreate {
                    customer,
                    created: false,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Patch a blank name or email from `data`; no request if nothing is missing.
    async fn fill_missing_details(
        &self,
        id: &CustomerId,
        customer: Customer,
        data: &CustomerData,
    ) -> Result<Customer, ClientError> {
        let updates = UpdateCustomerParams::fill_missing(&customer, data);
        if updates.is_empty() {
            return Ok(customer);
        }

        tracing::info!(customer_id = %id, ?updates, "Updating customer details");
        self.update(id, &updates).await
    }

    /// Update a customer. Only fields set in `params` change.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CustomerNotFound`] if the customer does not
    /// exist, or another error if the request fails.
    pub async fn update(
        &self,
        id: &CustomerId,
        params: &UpdateCustomerParams,
    ) -> Result<Customer, ClientError> {
        let request = self
            .client
            .request(Method::PATCH, &format!("/customers/{id}"))
            .json(params);

        self.client.send(request, Some(id.as_str())).await
    }

    /// Delete a customer, optionally deleting the linked Stripe customer too.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CustomerNotFound`] if the customer does not
    /// exist, or another error if the request fails.
    pub async fn delete(
        &self,
        id: &CustomerId,
        delete_in_stripe: bool,
    ) -> Result<Customer, ClientError> {
        let mut request = self
            .client
            .request(Method::DELETE, &format!("/customers/{id}"));
        if delete_in_stripe {
            request = request.query(&[("delete_in_stripe", "true")]);
        }

        let customer = self.client.send(request, Some(id.as_str())).await?;
        tracing::info!(customer_id = %id, delete_in_stripe, "Deleted Autumn customer");
        Ok(customer)
    }

    /// List customers, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, params: ListCustomersParams) -> Result<CustomerList, ClientError> {
        let request = self
            .client
            .request(Method::GET, "/customers")
            .query(&params.to_query());

        self.client.send(request, None).await
    }
}
