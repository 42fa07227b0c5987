//! `/v1/setup_intents`.

use std::collections::HashMap;

use stripe_core::{
    encode_form, CancellationReason, CustomerId, List, ParamMap, PaymentMethodId, Result,
    SetupIntent, SetupIntentId, SetupIntentUsage, WireParam,
};

use super::{insert_metadata, Page};
use crate::dispatch::{RequestSpec, StripeClient};

/// Parameters for creating a setup intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateSetupIntent {
    /// Confirm immediately.
    pub confirm: Option<bool>,
    /// Customer the payment method will be attached to.
    pub customer: Option<CustomerId>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Mandate details, sent as `mandate_data[...]`.
    pub mandate_data: Option<ParamMap>,
    /// Key-value metadata.
    pub metadata: HashMap<String, String>,
    /// Connected account the setup is on behalf of.
    pub on_behalf_of: Option<String>,
    /// Payment method to set up.
    pub payment_method: Option<PaymentMethodId>,
    /// Method-specific options, sent as `payment_method_options[...]`.
    pub payment_method_options: Option<ParamMap>,
    /// Allowed payment method types (defaults to card on Stripe's side).
    pub payment_method_types: Vec<String>,
    /// Where to send the customer after authentication.
    pub return_url: Option<String>,
    /// Single-use mandate details, sent as `single_use[...]`.
    pub single_use: Option<ParamMap>,
    /// Intended usage.
    pub usage: Option<SetupIntentUsage>,
}

impl CreateSetupIntent {
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params
            .insert_opt("confirm", self.confirm)
            .insert_opt("customer", self.customer.as_ref().map(CustomerId::as_str))
            .insert_opt("description", self.description.as_deref())
            .insert_opt("mandate_data", self.mandate_data.clone());
        insert_metadata(&mut params, &self.metadata);
        params
            .insert_opt("on_behalf_of", self.on_behalf_of.as_deref())
            .insert_opt(
                "payment_method",
                self.payment_method.as_ref().map(PaymentMethodId::as_str),
            )
            .insert_opt("payment_method_options", self.payment_method_options.clone());
        if !self.payment_method_types.is_empty() {
            params.insert("payment_method_types", self.payment_method_types.clone());
        }
        params
            .insert_opt("return_url", self.return_url.as_deref())
            .insert_opt("single_use", self.single_use.clone())
            .insert_opt("usage", self.usage.map(SetupIntentUsage::as_str));
        params
    }
}

/// Parameters for updating a setup intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSetupIntent {
    /// Customer the payment method will be attached to.
    pub customer: Option<CustomerId>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Metadata keys to set.
    pub metadata: HashMap<String, String>,
    /// Payment method to set up.
    pub payment_method: Option<PaymentMethodId>,
    /// Allowed payment method types.
    pub payment_method_types: Vec<String>,
}

impl UpdateSetupIntent {
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params
            .insert_opt("customer", self.customer.as_ref().map(CustomerId::as_str))
            .insert_opt("description", self.description.as_deref());
        insert_metadata(&mut params, &self.metadata);
        params.insert_opt(
            "payment_method",
            self.payment_method.as_ref().map(PaymentMethodId::as_str),
        );
        if !self.payment_method_types.is_empty() {
            params.insert("payment_method_types", self.payment_method_types.clone());
        }
        params
    }
}

/// Parameters for confirming a setup intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfirmSetupIntent {
    /// Mandate details, sent as `mandate_data[...]`.
    pub mandate_data: Option<ParamMap>,
    /// Payment method to confirm with.
    pub payment_method: Option<PaymentMethodId>,
    /// Method-specific options, sent as `payment_method_options[...]`.
    pub payment_method_options: Option<ParamMap>,
    /// Where to send the customer after authentication.
    pub return_url: Option<String>,
}

impl ConfirmSetupIntent {
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params
            .insert_opt("mandate_data", self.mandate_data.clone())
            .insert_opt(
                "payment_method",
                self.payment_method.as_ref().map(PaymentMethodId::as_str),
            )
            .insert_opt("payment_method_options", self.payment_method_options.clone())
            .insert_opt("return_url", self.return_url.as_deref());
        params
    }
}

/// Filters for listing setup intents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSetupIntents {
    /// Only intents for this customer.
    pub customer: Option<CustomerId>,
    /// Only intents for this payment method.
    pub payment_method: Option<PaymentMethodId>,
    /// Pagination.
    pub page: Page,
}

impl ListSetupIntents {
    fn to_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params
            .insert_opt("customer", self.customer.as_ref().map(CustomerId::as_str))
            .insert_opt(
                "payment_method",
                self.payment_method.as_ref().map(PaymentMethodId::as_str),
            );
        self.page.apply(&mut params);
        params
    }
}

/// Setup intent routes. Obtain with [`StripeClient::setup_intents`].
#[derive(Debug, Clone, Copy)]
pub struct SetupIntents<'a> {
    client: &'a StripeClient,
}

impl<'a> SetupIntents<'a> {
    pub(crate) const fn new(client: &'a StripeClient) -> Self {
        Self { client }
    }

    /// Create a setup intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn create(&self, params: &CreateSetupIntent) -> Result<SetupIntent> {
        self.client
            .send(RequestSpec::post("/v1/setup_intents").body(params.to_params()))
            .await
    }

    /// Retrieve a setup intent.
    ///
    /// With a publishable key, the client secret must be passed as well.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn retrieve(
        &self,
        intent: &SetupIntentId,
        client_secret: Option<&str>,
    ) -> Result<SetupIntent> {
        let mut request = RequestSpec::get(format!("/v1/setup_intents/{intent}"));
        if let Some(secret) = client_secret {
            request = request.raw_query(encode_form(&[WireParam::new("client_secret", secret)]));
        }
        self.client.send(request).await
    }

    /// Update a setup intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn update(
        &self,
        intent: &SetupIntentId,
        params: &UpdateSetupIntent,
    ) -> Result<SetupIntent> {
        self.client
            .send(
                RequestSpec::post(format!("/v1/setup_intents/{intent}")).body(params.to_params()),
            )
            .await
    }

    /// Confirm a setup intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn confirm(
        &self,
        intent: &SetupIntentId,
        params: &ConfirmSetupIntent,
    ) -> Result<SetupIntent> {
        self.client
            .send(
                RequestSpec::post(format!("/v1/setup_intents/{intent}/confirm"))
                    .body(params.to_params()),
            )
            .await
    }

    /// Cancel a setup intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn cancel(
        &self,
        intent: &SetupIntentId,
        reason: Option<CancellationReason>,
    ) -> Result<SetupIntent> {
        let mut params = ParamMap::new();
        params.insert_opt("cancellation_reason", reason.map(CancellationReason::as_str));
        self.client
            .send(RequestSpec::post(format!("/v1/setup_intents/{intent}/cancel")).body(params))
            .await
    }

    /// List setup intents.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not decode.
    pub async fn list(&self, filter: &ListSetupIntents) -> Result<List<SetupIntent>> {
        self.client
            .send(RequestSpec::get("/v1/setup_intents").query(&filter.to_params()))
            .await
    }
}
