//! `/v1/payment_methods`.

use std::collections::HashMap;

use stripe_core::{
    CustomerId, List, ParamMap, PaymentMethod, PaymentMethodId, PaymentMethodType, Result,
};

use super::{insert_metadata, Page};
use crate::dispatch::{RequestSpec, StripeClient};

/// Parameters for creating a payment method.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentMethod {
    /// Payment method type.
    pub method_type: PaymentMethodType,
    /// Billing details, sent as `billing_details[...]`.
    pub billing_details: Option<ParamMap>,
    /// Card details or a token, sent as `card[...]`.
    pub card: Option<ParamMap>,
    /// Key-value metadata.
    pub metadata: HashMap<String, String>,
}

impl CreatePaymentMethod {
    /// A payment method of the given type with nothing else set.
    #[must_use]
    pub fn new(method_type: PaymentMethodType) -> Self {
        Self {
            method_type,
            billing_details: None,
            card: None,
            metadata: HashMap::new(),
        }
    }

    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params
            .insert("type", self.method_type.as_str())
            .insert_opt("billing_details", self.billing_details.clone())
            .insert_opt("card", self.card.clone());
        insert_metadata(&mut params, &self.metadata);
        params
    }
}

/// Parameters for updating a payment method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePaymentMethod {
    /// Billing details, sent as `billing_details[...]`.
    pub billing_details: Option<ParamMap>,
    /// Card fields to change (e.g. `exp_month`), sent as `card[...]`.
    pub card: Option<ParamMap>,
    /// Metadata keys to set.
    pub metadata: HashMap<String, String>,
}

impl UpdatePaymentMethod {
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params
            .insert_opt("billing_details", self.billing_details.clone())
            .insert_opt("card", self.card.clone());
        insert_metadata(&mut params, &self.metadata);
        params
    }
}

/// Filters for listing a customer's payment methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPaymentMethods {
    /// Customer whose methods to list.
    pub customer: CustomerId,
    /// Payment method type.
    pub method_type: PaymentMethodType,
    /// Pagination.
    pub page: Page,
}

impl ListPaymentMethods {
    /// First page of `customer`'s methods of `method_type`.
    #[must_use]
    pub fn new(customer: CustomerId, method_type: PaymentMethodType) -> Self {
        Self {
            customer,
            method_type,
            page: Page::default(),
        }
    }

    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params
            .insert("customer", self.customer.as_str())
            .insert("type", self.method_type.as_str());
        self.page.apply(&mut params);
        params
    }
}

/// Payment method routes. Obtain with [`StripeClient::payment_methods`].
#[derive(Debug, Clone, Copy)]
pub struct PaymentMethods<'a> {
    client: &'a StripeClient,
}

impl<'a> PaymentMethods<'a> {
    pub(crate) const fn new(client: &'a StripeClient) -> Self {
        Self { client }
    }

    /// Create a payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn create(&self, params: &CreatePaymentMethod) -> Result<PaymentMethod> {
        self.client
            .send(RequestSpec::post("/v1/payment_methods").body(params.to_params()))
            .await
    }

    /// Retrieve a payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn retrieve(&self, payment_method: &PaymentMethodId) -> Result<PaymentMethod> {
        self.client
            .send(RequestSpec::get(format!("/v1/payment_methods/{payment_method}")))
            .await
    }

    /// Update a payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn update(
        &self,
        payment_method: &PaymentMethodId,
        params: &UpdatePaymentMethod,
    ) -> Result<PaymentMethod> {
        self.client
            .send(
                RequestSpec::post(format!("/v1/payment_methods/{payment_method}"))
                    .body(params.to_params()),
            )
            .await
    }

    /// List a customer's payment methods of one type.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn list(&self, filter: &ListPaymentMethods) -> Result<List<PaymentMethod>> {
        self.client
            .send(RequestSpec::get("/v1/payment_methods").query(&filter.to_params()))
            .await
    }

    /// Attach a payment method to a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn attach(
        &self,
        payment_method: &PaymentMethodId,
        customer: &CustomerId,
    ) -> Result<PaymentMethod> {
        tracing::debug!(
            payment_method = %payment_method,
            customer = %customer,
            "Attaching payment method"
        );
        let params = ParamMap::new().with("customer", customer.as_str());
        self.client
            .send(
                RequestSpec::post(format!("/v1/payment_methods/{payment_method}/attach"))
                    .body(params),
            )
            .await
    }

    /// Detach a payment method from its customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn detach(&self, payment_method: &PaymentMethodId) -> Result<PaymentMethod> {
        self.client
            .send(RequestSpec::post(format!(
                "/v1/payment_methods/{payment_method}/detach"
            )))
            .await
    }
}
