use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DataResult;
use crate::models::{Customer, CustomerDetail, CustomerFilter, NewCustomer, Page};

/// Data access port for the customer book
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    /// Store the customer, its contact and its staff atomically.
    async fn create(&self, input: NewCustomer) -> DataResult<Customer>;

    async fn search(&self, filter: CustomerFilter) -> DataResult<Vec<Customer>>;

    async fn get_detail(&self, id: Uuid) -> DataResult<Option<CustomerDetail>>;

    async fn list_by_book(&self, book_id: Uuid, page: Page) -> DataResult<Vec<Customer>>;
}
