//! Resource routes.
//!
//! Each route maps an options struct onto a [`RequestSpec`](crate::RequestSpec)
//! and calls [`StripeClient::send`]. Routes hold no state of their own.

pub mod customers;
pub mod payment_methods;
pub mod setup_intents;

use std::collections::HashMap;

use stripe_core::ParamMap;

use crate::dispatch::StripeClient;

pub use customers::{CreateCustomer, Customers, ListCustomers, SourceParam, UpdateCustomer};
pub use payment_methods::{
    CreatePaymentMethod, ListPaymentMethods, PaymentMethods, UpdatePaymentMethod,
};
pub use setup_intents::{
    ConfirmSetupIntent, CreateSetupIntent, ListSetupIntents, SetupIntents, UpdateSetupIntent,
};

/// Cursor pagination shared by list routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of objects to return (1-100).
    pub limit: Option<u32>,
    /// Return objects after this id.
    pub starting_after: Option<String>,
    /// Return objects before this id.
    pub ending_before: Option<String>,
}

impl Page {
    /// First page of at most `limit` objects.
    #[must_use]
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn apply(&self, params: &mut ParamMap) {
        params
            .insert_opt("limit", self.limit)
            .insert_opt("starting_after", self.starting_after.as_deref())
            .insert_opt("ending_before", self.ending_before.as_deref());
    }
}

fn insert_metadata(params: &mut ParamMap, metadata: &HashMap<String, String>) {
    if !metadata.is_empty() {
        params.insert("metadata", metadata.clone());
    }
}

impl StripeClient {
    /// Customer routes.
    #[must_use]
    pub const fn customers(&self) -> Customers<'_> {
        Customers::new(self)
    }

    /// Payment method routes.
    #[must_use]
    pub const fn payment_methods(&self) -> PaymentMethods<'_> {
        PaymentMethods::new(self)
    }

    /// Setup intent routes.
    #[must_use]
    pub const fn setup_intents(&self) -> SetupIntents<'_> {
        SetupIntents::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params() {
        let mut params = ParamMap::new();
        Page {
            limit: Some(3),
            starting_after: Some("cus_9".into()),
            ending_before: None,
        }
        .apply(&mut params);

        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["limit", "starting_after"]);
    }

    #[test]
    fn empty_metadata_is_omitted() {
        let mut params = ParamMap::new();
        insert_metadata(&mut params, &HashMap::new());
        assert!(params.is_empty());
    }
}
