//! Customer types for Autumn.
//!
//! These mirror the JSON the Autumn API returns for a customer and the
//! bodies it accepts when creating or updating one. Unknown response fields
//! are ignored so newer API versions keep decoding.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::CustomerId;

// ============================================================================
// Constants
// ============================================================================

/// Largest page size the list endpoint accepts.
pub const MAX_LIST_LIMIT: u32 = 100;

// ============================================================================
// Responses
// ============================================================================

/// A customer record as returned by the Autumn API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// The customer ID chosen by the integrating application.
    /// `None` for anonymous customers.
    ///
    /// Kept as the server sent it; parse with [`CustomerId::new`] before
    /// using it in a request.
    pub id: Option<String>,

    /// Autumn's internal ID, only present when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autumn_id: Option<String>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Device fingerprint used to detect duplicate sign-ups.
    #[serde(default)]
    pub fingerprint: Option<String>,

    /// Linked Stripe customer ID.
    #[serde(default)]
    pub stripe_id: Option<String>,

    /// Environment the customer lives in.
    #[serde(default)]
    pub env: Environment,

    /// Creation time in epoch milliseconds.
    pub created_at: i64,

    /// Arbitrary metadata attached by the integrating application.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Products attached to the customer.
    #[serde(default)]
    pub products: Vec<CustomerProduct>,

    /// Feature balances keyed by feature ID.
    #[serde(default)]
    pub features: BTreeMap<String, CustomerFeature>,
}

impl Customer {
    /// Decode a customer from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid customer record.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Creation time as a UTC timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    /// Best human-readable label: name, then email, then id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.is_empty()))
            .or_else(|| self.id.as_deref())
            .unwrap_or("<anonymous>")
    }

    /// Check whether a product is attached (in any status).
    #[must_use]
    pub fn has_product(&self, product_id: &str) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }

    /// Look up a feature balance.
    #[must_use]
    pub fn feature(&self, feature_id: &str) -> Option<&CustomerFeature> {
        self.features.get(feature_id)
    }
}

/// Autumn environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Test mode.
    #[default]
    Sandbox,
    /// Production.
    Live,
}

/// A product attached to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProduct {
    /// Product ID.
    pub id: String,
    /// Product name.
    #[serde(default)]
    pub name: Option<String>,
    /// Attachment status.
    pub status: ProductStatus,
    /// When the product started (epoch ms).
    #[serde(default)]
    pub started_at: Option<i64>,
    /// When the product was canceled (epoch ms).
    #[serde(default)]
    pub canceled_at: Option<i64>,
}

/// Status of a customer's product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Active and billing.
    Active,
    /// In a trial period.
    Trialing,
    /// Will start at a later date.
    Scheduled,
    /// No longer active.
    Expired,
    /// Payment overdue.
    PastDue,
    /// A status this client does not know about.
    #[serde(other)]
    Other,
}

impl ProductStatus {
    /// Whether the product currently grants access.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active | Self::Trialing | Self::PastDue)
    }
}

/// Balance of a metered or boolean feature for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFeature {
    /// Feature ID.
    pub id: String,
    /// Remaining balance.
    #[serde(default)]
    pub balance: Option<f64>,
    /// Usage in the current period.
    #[serde(default)]
    pub usage: Option<f64>,
    /// Usage included in the plan.
    #[serde(default)]
    pub included_usage: Option<f64>,
    /// Whether the feature is unlimited.
    #[serde(default)]
    pub unlimited: bool,
    /// Next balance reset (epoch ms).
    #[serde(default)]
    pub next_reset_at: Option<i64>,
}

/// A page of customers.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerList {
    /// Customers on this page.
    pub list: Vec<Customer>,
    /// Total number of customers.
    #[serde(default)]
    pub total: u64,
    /// Page size used.
    #[serde(default)]
    pub limit: u32,
    /// Offset of this page.
    #[serde(default)]
    pub offset: u32,
}

impl CustomerList {
    /// Whether more customers exist after this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        u64::from(self.offset) + (self.list.len() as u64) < self.total
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Data used to populate a customer when it has to be created.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerData {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Device fingerprint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Arbitrary metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl CustomerData {
    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the device fingerprint.
    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Set the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Body of a create-customer request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateCustomerParams {
    /// Customer ID. `None` creates an anonymous customer.
    pub id: Option<CustomerId>,
    /// Customer fields.
    #[serde(flatten)]
    pub data: CustomerData,
}

impl CreateCustomerParams {
    /// Create params for a customer with the given ID.
    #[must_use]
    pub fn new(id: CustomerId, data: CustomerData) -> Self {
        Self { id: Some(id), data }
    }
}

/// Body of an update-customer request. Only set fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateCustomerParams {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New device fingerprint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Replacement metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl UpdateCustomerParams {
    /// Fields of `data` that would fill in a blank name or email on `customer`.
    ///
    /// Fields the customer already has are never overwritten.
    #[must_use]
    pub fn fill_missing(customer: &Customer, data: &CustomerData) -> Self {
        let blank = |field: &Option<String>| field.as_deref().map_or(true, str::is_empty);
        let supplied = |field: &Option<String>| field.clone().filter(|v| !v.is_empty());

        Self {
            name: if blank(&customer.name) { supplied(&data.name) } else { None },
            email: if blank(&customer.email) { supplied(&data.email) } else { None },
            ..Self::default()
        }
    }

    /// Whether no field would be changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.fingerprint.is_none()
            && self.metadata.is_none()
    }
}

/// Optional related data to include in a customer response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerExpand {
    /// Recent invoices.
    Invoices,
    /// Rewards and coupons.
    Rewards,
    /// Products whose trial the customer has used.
    TrialsUsed,
    /// Sub-entities (seats, workspaces).
    Entities,
    /// Referral codes and redemptions.
    Referrals,
    /// Default payment method.
    PaymentMethod,
}

impl CustomerExpand {
    /// Wire name used in the `expand` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoices => "invoices",
            Self::Rewards => "rewards",
            Self::TrialsUsed => "trials_used",
            Self::Entities => "entities",
            Self::Referrals => "referrals",
            Self::PaymentMethod => "payment_method",
        }
    }

    /// Join expansions into a single `expand` query value.
    /// Returns `None` when there is nothing to expand.
    #[must_use]
    pub fn join(expand: &[Self]) -> Option<String> {
        if expand.is_empty() {
            return None;
        }
        Some(
            expand
                .iter()
                .map(|e| e.as_str())
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

impl fmt::Display for CustomerExpand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CustomerExpand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "invoices" => Ok(Self::Invoices),
            "rewards" => Ok(Self::Rewards),
            "trials_used" => Ok(Self::TrialsUsed),
            "entities" => Ok(Self::Entities),
            "referrals" => Ok(Self::Referrals),
            "payment_method" => Ok(Self::PaymentMethod),
            other => Err(format!("unknown expand option: {other}")),
        }
    }
}

/// Pagination for the list endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCustomersParams {
    /// Page size (clamped to [`MAX_LIST_LIMIT`]).
    pub limit: Option<u32>,
    /// Number of customers to skip.
    pub offset: Option<u32>,
}

impl ListCustomersParams {
    /// Query pairs for this page, with the limit clamped to the API maximum.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(2);
        if let Some(limit) = self.limit {
            query.push(("limit", limit.min(MAX_LIST_LIMIT).to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> serde_json::Value {
        json!({
            "id": "user_123",
            "name": "Ada",
            "email": "ada@example.com",
            "fingerprint": null,
            "stripe_id": "cus_Q1",
            "env": "live",
            "created_at": 1_700_000_000_000_i64,
            "metadata": { "plan_hint": "pro" },
            "products": [
                { "id": "pro", "name": "Pro", "status": "active", "started_at": 1_700_000_000_000_i64 },
                { "id": "legacy", "status": "some_future_status" }
            ],
            "features": {
                "messages": { "id": "messages", "balance": 42.0, "usage": 8.0, "included_usage": 50.0 }
            },
            "invoices": []
        })
    }

    #[test]
    fn customer_decodes_full_record() {
        let customer: Customer = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(customer.id.as_deref(), Some("user_123"));
        assert_eq!(customer.env, Environment::Live);
        assert_eq!(customer.products.len(), 2);
        assert_eq!(customer.products[1].status, ProductStatus::Other);
        assert!(customer.has_product("pro"));
        assert!(!customer.has_product("enterprise"));
        assert_eq!(customer.feature("messages").unwrap().balance, Some(42.0));
        assert_eq!(customer.metadata["plan_hint"], "pro");
    }

    #[test]
    fn customer_decodes_minimal_record() {
        let customer = Customer::from_json(r#"{"id": null, "created_at": 0}"#).unwrap();
        assert!(customer.id.is_none());
        assert_eq!(customer.env, Environment::Sandbox);
        assert!(customer.products.is_empty());
        assert_eq!(customer.display_name(), "<anonymous>");
    }

    #[test]
    fn customer_keeps_ids_the_client_would_not_send() {
        let customer =
            Customer::from_json(r#"{"id": "legacy/user 7", "created_at": 0}"#).unwrap();
        assert_eq!(customer.id.as_deref(), Some("legacy/user 7"));
        assert!(CustomerId::new(customer.id.unwrap()).is_err());
    }

    #[test]
    fn customer_rejects_invalid_json() {
        assert!(Customer::from_json("{}").is_err());
    }

    #[test]
    fn created_at_converts_millis() {
        let customer: Customer = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(customer.created_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn display_name_falls_back() {
        let mut customer: Customer = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(customer.display_name(), "Ada");
        customer.name = Some(String::new());
        assert_eq!(customer.display_name(), "ada@example.com");
        customer.email = None;
        assert_eq!(customer.display_name(), "user_123");
    }

    #[test]
    fn create_params_omit_absent_fields() {
        let params = CreateCustomerParams::new(
            CustomerId::new("user_1").unwrap(),
            CustomerData::default().with_email("a@b.co"),
        );
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({ "id": "user_1", "email": "a@b.co" }));
    }

    #[test]
    fn update_params_is_empty() {
        assert!(UpdateCustomerParams::default().is_empty());
        let params = UpdateCustomerParams {
            name: Some("New".into()),
            ..Default::default()
        };
        assert!(!params.is_empty());
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({ "name": "New" }));
    }

    #[test]
    fn fill_missing_only_touches_blank_fields() {
        let mut customer: Customer = serde_json::from_value(sample_json()).unwrap();
        customer.name = None;
        let data = CustomerData::default()
            .with_name("Ada Lovelace")
            .with_email("other@example.com")
            .with_fingerprint("fp_1");

        let params = UpdateCustomerParams::fill_missing(&customer, &data);
        assert_eq!(params.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(params.email, None);
        assert_eq!(params.fingerprint, None);

        customer.name = Some(String::new());
        assert_eq!(
            UpdateCustomerParams::fill_missing(&customer, &data).name.as_deref(),
            Some("Ada Lovelace")
        );
    }

    #[test]
    fn fill_missing_ignores_empty_data() {
        let mut customer: Customer = serde_json::from_value(sample_json()).unwrap();
        customer.name = None;
        customer.email = None;
        let data = CustomerData::default().with_name("");
        assert!(UpdateCustomerParams::fill_missing(&customer, &data).is_empty());
        assert!(UpdateCustomerParams::fill_missing(&customer, &CustomerData::default()).is_empty());
    }

    #[test]
    fn product_status_access() {
        assert!(ProductStatus::Active.is_active());
        assert!(ProductStatus::Trialing.is_active());
        assert!(ProductStatus::PastDue.is_active());
        assert!(!ProductStatus::Expired.is_active());
        assert!(!ProductStatus::Scheduled.is_active());
        assert!(!ProductStatus::Other.is_active());
    }

    #[test]
    fn expand_join() {
        assert_eq!(CustomerExpand::join(&[]), None);
        assert_eq!(
            CustomerExpand::join(&[CustomerExpand::Invoices, CustomerExpand::TrialsUsed]),
            Some("invoices,trials_used".to_string())
        );
        assert_eq!(
            "payment_method".parse::<CustomerExpand>(),
            Ok(CustomerExpand::PaymentMethod)
        );
        assert!("bogus".parse::<CustomerExpand>().is_err());
    }

    #[test]
    fn list_params_clamp_limit() {
        let params = ListCustomersParams {
            limit: Some(500),
            offset: Some(20),
        };
        assert_eq!(
            params.to_query(),
            vec![("limit", "100".to_string()), ("offset", "20".to_string())]
        );
        assert!(ListCustomersParams::default().to_query().is_empty());
    }

    #[test]
    fn list_has_more() {
        let page: CustomerList = serde_json::from_value(json!({
            "list": [{ "id": "a", "created_at": 0 }],
            "total": 3,
            "limit": 1,
            "offset": 1
        }))
        .unwrap();
        assert!(page.has_more());
    }
}
