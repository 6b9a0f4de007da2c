//! The explain call seam.

use apexscan_sf_client::{ExplainPlan, SalesforceClient};

/// Something that can ask an org for a query plan.
///
/// [`SalesforceClient`] is the production implementation; tests substitute
/// canned responses.
#[allow(async_fn_in_trait)]
pub trait ExplainClient {
    async fn explain(&self, soql: &str) -> apexscan_sf_client::Result<ExplainPlan>;
}

impl ExplainClient for SalesforceClient {
    async fn explain(&self, soql: &str) -> apexscan_sf_client::Result<ExplainPlan> {
        SalesforceClient::explain(self, soql).await
    }
}

impl<T: ExplainClient> ExplainClient for &T {
    async fn explain(&self, soql: &str) -> apexscan_sf_client::Result<ExplainPlan> {
        (**self).explain(soql).await
    }
}
