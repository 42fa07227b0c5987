//! `/v1/customers` and customer sources.

use std::collections::HashMap;

use stripe_core::{
    BankAccount, Card, Customer, CustomerId, DeletedObject, List, ParamMap, PaymentMethodId,
    PaymentSource, Result, SourceId,
};

use super::{insert_metadata, Page};
use crate::dispatch::{RequestSpec, StripeClient};

/// A payment source to attach: a token or a full set of details.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceParam {
    /// A token id such as `tok_visa`, or a source id.
    Token(String),
    /// Raw details, sent as `source[...]`.
    Details(ParamMap),
}

impl SourceParam {
    fn apply(&self, params: &mut ParamMap) {
        match self {
            Self::Token(token) => params.insert("source", token),
            Self::Details(details) => params.insert("source", details.clone()),
        };
    }
}

/// Parameters for creating a customer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateCustomer {
    /// Starting balance in the smallest currency unit.
    pub account_balance: Option<i64>,
    /// Coupon to apply.
    pub coupon: Option<String>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Prefix for invoice numbers.
    pub invoice_prefix: Option<String>,
    /// Default invoice settings, sent as `invoice_settings[...]`.
    pub invoice_settings: Option<ParamMap>,
    /// Key-value metadata.
    pub metadata: HashMap<String, String>,
    /// Full name or business name.
    pub name: Option<String>,
    /// Payment method to attach.
    pub payment_method: Option<PaymentMethodId>,
    /// Phone number.
    pub phone: Option<String>,
    /// Shipping details, sent as `shipping[...]`.
    pub shipping: Option<ParamMap>,
    /// Payment source to attach.
    pub source: Option<SourceParam>,
}

impl CreateCustomer {
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params
            .insert_opt("account_balance", self.account_balance)
            .insert_opt("coupon", self.coupon.as_deref())
            .insert_opt("description", self.description.as_deref())
            .insert_opt("email", self.email.as_deref())
            .insert_opt("invoice_prefix", self.invoice_prefix.as_deref())
            .insert_opt("invoice_settings", self.invoice_settings.clone());
        insert_metadata(&mut params, &self.metadata);
        params
            .insert_opt("name", self.name.as_deref())
            .insert_opt(
                "payment_method",
                self.payment_method.as_ref().map(PaymentMethodId::as_str),
            )
            .insert_opt("phone", self.phone.as_deref())
            .insert_opt("shipping", self.shipping.clone());
        if let Some(source) = &self.source {
            source.apply(&mut params);
        }
        params
    }
}

/// Parameters for updating a customer. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCustomer {
    /// New balance in the smallest currency unit.
    pub account_balance: Option<i64>,
    /// Coupon to apply.
    pub coupon: Option<String>,
    /// Id of the source to make the default.
    pub default_source: Option<SourceId>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Default invoice settings, sent as `invoice_settings[...]`.
    pub invoice_settings: Option<ParamMap>,
    /// Metadata keys to set.
    pub metadata: HashMap<String, String>,
    /// Full name or business name.
    pub name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Shipping details, sent as `shipping[...]`.
    pub shipping: Option<ParamMap>,
    /// Payment source that replaces the default one.
    pub source: Option<SourceParam>,
}

impl UpdateCustomer {
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params
            .insert_opt("account_balance", self.account_balance)
            .insert_opt("coupon", self.coupon.as_deref())
            .insert_opt(
                "default_source",
                self.default_source.as_ref().map(SourceId::as_str),
            )
            .insert_opt("description", self.description.as_deref())
            .insert_opt("email", self.email.as_deref())
            .insert_opt("invoice_settings", self.invoice_settings.clone());
        insert_metadata(&mut params, &self.metadata);
        params
            .insert_opt("name", self.name.as_deref())
            .insert_opt("phone", self.phone.as_deref())
            .insert_opt("shipping", self.shipping.clone());
        if let Some(source) = &self.source {
            source.apply(&mut params);
        }
        params
    }
}

/// Filters for listing customers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCustomers {
    /// Only customers with this exact email.
    pub email: Option<String>,
    /// Pagination.
    pub page: Page,
}

impl ListCustomers {
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert_opt("email", self.email.as_deref());
        self.page.apply(&mut params);
        params
    }
}

/// Customer routes. Obtain with [`StripeClient::customers`].
#[derive(Debug, Clone, Copy)]
pub struct Customers<'a> {
    client: &'a StripeClient,
}

impl<'a> Customers<'a> {
    pub(crate) const fn new(client: &'a StripeClient) -> Self {
        Self { client }
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn create(&self, params: &CreateCustomer) -> Result<Customer> {
        tracing::debug!(email = ?params.email, "Creating Stripe customer");
        self.client
            .send(RequestSpec::post("/v1/customers").body(params.to_params()))
            .await
    }

    /// Retrieve a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn retrieve(&self, customer: &CustomerId) -> Result<Customer> {
        self.client
            .send(RequestSpec::get(format!("/v1/customers/{customer}")))
            .await
    }

    /// Update a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn update(&self, customer: &CustomerId, params: &UpdateCustomer) -> Result<Customer> {
        self.client
            .send(
                RequestSpec::post(format!("/v1/customers/{customer}")).body(params.to_params()),
            )
            .await
    }

    /// Permanently delete a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn delete(&self, customer: &CustomerId) -> Result<DeletedObject> {
        self.client
            .send(RequestSpec::delete(format!("/v1/customers/{customer}")))
            .await
    }

    /// List customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn list(&self, filter: &ListCustomers) -> Result<List<Customer>> {
        self.client
            .send(RequestSpec::get("/v1/customers").query(&filter.to_params()))
            .await
    }

    /// Attach a source to a customer from a token or source id.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn add_source(
        &self,
        customer: &CustomerId,
        source: &str,
        connected_account: Option<&str>,
    ) -> Result<PaymentSource> {
        let params = ParamMap::new().with("source", source);
        self.client
            .send(sources_request(customer, params, connected_account))
            .await
    }

    /// Attach a bank account to a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn add_bank_account_source(
        &self,
        customer: &CustomerId,
        source: &SourceParam,
        metadata: &HashMap<String, String>,
        connected_account: Option<&str>,
    ) -> Result<BankAccount> {
        let mut params = ParamMap::new();
        source.apply(&mut params);
        insert_metadata(&mut params, metadata);
        self.client
            .send(sources_request(customer, params, connected_account))
            .await
    }

    /// Attach a card to a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn add_card_source(
        &self,
        customer: &CustomerId,
        source: &SourceParam,
        metadata: &HashMap<String, String>,
        connected_account: Option<&str>,
    ) -> Result<Card> {
        let mut params = ParamMap::new();
        source.apply(&mut params);
        insert_metadata(&mut params, metadata);
        self.client
            .send(sources_request(customer, params, connected_account))
            .await
    }

    /// Detach a source from a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn delete_source(
        &self,
        customer: &CustomerId,
        source: &SourceId,
    ) -> Result<DeletedObject> {
        self.client
            .send(RequestSpec::delete(format!(
                "/v1/customers/{customer}/sources/{source}"
            )))
            .await
    }

    /// Remove the customer's current discount.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn delete_discount(&self, customer: &CustomerId) -> Result<DeletedObject> {
        self.client
            .send(RequestSpec::delete(format!("/v1/customers/{customer}/discount")))
            .await
    }
}

fn sources_request(
    customer: &CustomerId,
    params: ParamMap,
    connected_account: Option<&str>,
) -> RequestSpec {
    let request = RequestSpec::post(format!("/v1/customers/{customer}/sources")).body(params);
    match connected_account {
        Some(account) => request.connected_account(account),
        None => request,
    }
}
